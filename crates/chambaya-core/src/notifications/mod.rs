//! Notification feed, unread badge and polling.
//!
//! [`NotificationCenter`] fronts the notification endpoints with a
//! stale-time cache. Reads are served from the cache while fresh; any
//! successful mutation invalidates the whole cache.

mod badge;
mod cache;
mod poller;

use std::time::Duration;

use async_trait::async_trait;
use chambaya_types::{Notification, NotificationStats, RelatedModel};

pub use badge::{BADGE_CAP, BellGlyph, NotificationBadge};
pub use cache::{Generation, NotificationCache};
pub use poller::{UnreadPoller, UnreadSource};

use crate::api::{ApiClient, ApiResult};
use crate::navigation::Route;

/// Cached access to the notification endpoints.
#[derive(Debug)]
pub struct NotificationCenter {
    client: ApiClient,
    cache: NotificationCache,
}

impl NotificationCenter {
    pub fn new(client: ApiClient, stale_time: Duration) -> Self {
        Self {
            client,
            cache: NotificationCache::new(stale_time),
        }
    }

    #[must_use]
    pub fn with_stats_stale_time(mut self, stats_stale_time: Duration) -> Self {
        self.cache = self.cache.with_stats_stale_time(stats_stale_time);
        self
    }

    /// # Errors
    /// Returns an error if the list must be fetched and the request fails.
    pub async fn list(&self, limit: Option<u32>) -> ApiResult<Vec<Notification>> {
        if let Some(cached) = self.cache.list(limit) {
            return Ok(cached);
        }
        let generation = self.cache.generation();
        let list = self.client.notifications(limit).await?;
        self.cache.store_list(generation, limit, list.clone());
        Ok(list)
    }

    /// # Errors
    /// Returns an error if the list must be fetched and the request fails.
    pub async fn unread(&self) -> ApiResult<Vec<Notification>> {
        if let Some(cached) = self.cache.unread() {
            return Ok(cached);
        }
        self.refresh_unread().await
    }

    /// Fetches the unread list regardless of freshness and caches it.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn refresh_unread(&self) -> ApiResult<Vec<Notification>> {
        let generation = self.cache.generation();
        let unread = self.client.unread_notifications().await?;
        self.cache.store_unread(generation, unread.clone());
        Ok(unread)
    }

    /// Unread count, derived from the unread list length.
    ///
    /// # Errors
    /// Returns an error if the unread list cannot be fetched.
    pub async fn unread_count(&self) -> ApiResult<usize> {
        Ok(self.unread().await?.len())
    }

    /// # Errors
    /// Returns an error if the stats must be fetched and the request fails.
    pub async fn stats(&self) -> ApiResult<NotificationStats> {
        if let Some(cached) = self.cache.stats() {
            return Ok(cached);
        }
        let generation = self.cache.generation();
        let stats = self.client.notification_stats().await?;
        self.cache.store_stats(generation, stats.clone());
        Ok(stats)
    }

    /// # Errors
    /// Returns an error if the request fails; the cache is kept in that case.
    pub async fn mark_read(&self, id: &str) -> ApiResult<()> {
        self.client.mark_read(id).await?;
        self.cache.invalidate();
        Ok(())
    }

    /// # Errors
    /// Returns an error if the request fails; the cache is kept in that case.
    pub async fn mark_all_read(&self) -> ApiResult<()> {
        self.client.mark_all_read().await?;
        self.cache.invalidate();
        Ok(())
    }

    /// # Errors
    /// Returns an error if the request fails; the cache is kept in that case.
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client.delete_notification(id).await?;
        self.cache.invalidate();
        Ok(())
    }

    /// # Errors
    /// Returns an error if the request fails; the cache is kept in that case.
    pub async fn clean_old(&self, days: Option<u32>) -> ApiResult<()> {
        self.client.clean_old_notifications(days).await?;
        self.cache.invalidate();
        Ok(())
    }

    /// Forces the next read of every kind to refetch.
    pub fn invalidate(&self) {
        self.cache.invalidate();
    }
}

/// Every poll refetches; the result also refreshes the cache.
#[async_trait]
impl UnreadSource for NotificationCenter {
    async fn unread_count(&self) -> ApiResult<usize> {
        Ok(self.refresh_unread().await?.len())
    }
}

/// Screen opened when a notification is pressed.
///
/// A server-provided `actionUrl` wins; otherwise only work-related
/// notifications with a target id lead anywhere.
pub fn target_route(notification: &Notification) -> Option<Route> {
    if let Some(url) = notification.action_url.as_ref().filter(|url| !url.is_empty()) {
        return Some(Route::Link { url: url.clone() });
    }
    match (notification.related_model, &notification.related_id) {
        (Some(RelatedModel::Work), Some(id)) if !id.is_empty() => {
            Some(Route::WorkDetail { id: id.clone() })
        }
        _ => None,
    }
}
