//! Notification command handlers.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chambaya_core::api::DEFAULT_CLEAN_DAYS;
use chambaya_core::interrupt;
use chambaya_core::notifications::{NotificationBadge, UnreadPoller, target_route};
use chambaya_types::Notification;
use chrono::Local;

use super::App;

pub async fn list(app: &App, limit: Option<u32>, unread_only: bool) -> Result<()> {
    app.require_user()?;
    let center = app.notifications();
    let notifications = if unread_only {
        center.unread().await.context("load unread notifications")?
    } else {
        let limit = limit.unwrap_or(app.config.notifications.list_limit);
        center
            .list(Some(limit))
            .await
            .context("load notifications")?
    };

    if notifications.is_empty() {
        println!("No notifications.");
        return Ok(());
    }
    for notification in &notifications {
        print_notification(notification);
    }
    Ok(())
}

pub async fn badge(app: &App) -> Result<()> {
    app.require_user()?;
    let count = app
        .notifications()
        .unread_count()
        .await
        .context("load unread notifications")?;
    println!("{}", NotificationBadge::new(count));
    Ok(())
}

/// Polls until Ctrl+C, printing the badge each time it changes.
pub async fn watch(app: &App, interval_secs: Option<u64>) -> Result<()> {
    app.require_user()?;
    let interval = interval_secs.map_or_else(
        || app.config.notifications.poll_interval(),
        |secs| Duration::from_secs(secs.max(1)),
    );

    let poller = UnreadPoller::spawn(Arc::new(app.notifications()), interval);
    let mut rx = poller.subscribe();
    let mut last_printed: Option<NotificationBadge> = None;
    eprintln!("Watching notifications every {}s (Ctrl+C to stop)", interval.as_secs());

    loop {
        tokio::select! {
            biased;
            () = interrupt::wait_for_interrupt() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let badge = *rx.borrow_and_update();
                if last_printed != Some(badge) {
                    println!("{badge}");
                    last_printed = Some(badge);
                }
            }
        }
    }

    poller.stop().await;
    Ok(())
}

pub async fn read(app: &App, id: &str) -> Result<()> {
    app.notifications()
        .mark_read(id)
        .await
        .with_context(|| format!("mark notification '{id}' as read"))?;
    println!("Marked {id} as read.");
    Ok(())
}

pub async fn read_all(app: &App) -> Result<()> {
    app.notifications()
        .mark_all_read()
        .await
        .context("mark all notifications as read")?;
    println!("Marked all notifications as read.");
    Ok(())
}

pub async fn delete(app: &App, id: &str) -> Result<()> {
    app.notifications()
        .delete(id)
        .await
        .with_context(|| format!("delete notification '{id}'"))?;
    println!("Deleted {id}.");
    Ok(())
}

pub async fn clean(app: &App, days: Option<u32>) -> Result<()> {
    app.notifications()
        .clean_old(days)
        .await
        .context("clean old notifications")?;
    println!(
        "Deleted notifications older than {} days.",
        days.unwrap_or(DEFAULT_CLEAN_DAYS)
    );
    Ok(())
}

pub async fn stats(app: &App) -> Result<()> {
    let stats = app
        .notifications()
        .stats()
        .await
        .context("load notification stats")?;
    println!("total: {}", stats.total);
    println!("unread: {}", stats.unread);
    for (kind, count) in &stats.by_type {
        println!("  {kind}: {count}");
    }
    for (priority, count) in &stats.by_priority {
        println!("  priority {priority}: {count}");
    }
    Ok(())
}

fn print_notification(notification: &Notification) {
    let marker = if notification.is_read { ' ' } else { '*' };
    let when = notification
        .created_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M");
    println!("{marker} {}  {when}  {}", notification.id, notification.title);
    println!("    {}", notification.message);
    if let Some(route) = target_route(notification) {
        println!("    -> {route}");
    }
}
