//! Work command handlers.

use anyhow::{Context, Result};
use chambaya_types::Work;

use super::App;

pub async fn list(app: &App) -> Result<()> {
    let works = app.client.works().await.context("list works")?;
    if works.is_empty() {
        println!("No works found.");
        return Ok(());
    }
    for work in works {
        println!("{}", summary(&work));
    }
    Ok(())
}

pub async fn show(app: &App, id: &str) -> Result<()> {
    let work = app
        .client
        .work_by_id(id)
        .await
        .with_context(|| format!("load work '{id}'"))?;

    println!("{}", summary(&work));
    if !work.description.is_empty() {
        println!();
        println!("{}", work.description);
    }
    if !work.requirements.is_empty() {
        println!();
        println!("Requirements:");
        for requirement in &work.requirements {
            println!("  - {requirement}");
        }
    }
    Ok(())
}

/// Prints the active-work snapshot the login routing is based on.
pub async fn active(app: &App) -> Result<()> {
    app.require_user()?;
    let snapshot = app.client.work_status().await.context("load work status")?;
    let pretty =
        serde_json::to_string_pretty(&snapshot).context("serialize work status")?;
    println!("{pretty}");
    Ok(())
}

pub async fn apply(app: &App, work_id: &str) -> Result<()> {
    let user = app.require_user()?;
    app.client
        .apply_to_work(&user.id, work_id)
        .await
        .with_context(|| format!("apply to work '{work_id}'"))?;
    println!("Applied to work {work_id}.");
    Ok(())
}

fn summary(work: &Work) -> String {
    let status = work.status.as_deref().unwrap_or("open");
    let location = if work.location.is_empty() {
        "-"
    } else {
        work.location.as_str()
    };
    format!(
        "{}  {}  {}  S/ {:.2}  [{}]",
        work.id, work.title, location, work.salary, status
    )
}
