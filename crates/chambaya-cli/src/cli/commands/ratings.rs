//! Rating command handler.

use anyhow::{Context, Result};
use chambaya_types::{NewRating, RatingTarget};

use super::App;

/// Role the rated user played in the work.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum RatedRole {
    Worker,
    Employer,
}

impl From<RatedRole> for RatingTarget {
    fn from(role: RatedRole) -> Self {
        match role {
            RatedRole::Worker => RatingTarget::Worker,
            RatedRole::Employer => RatingTarget::Employer,
        }
    }
}

pub async fn rate(
    app: &App,
    user_id: String,
    work_id: String,
    score: u8,
    comment: Option<String>,
    rated_as: RatedRole,
) -> Result<()> {
    app.require_user()?;
    let rating = NewRating {
        user_id,
        work_id,
        score,
        comment,
        target: rated_as.into(),
    };
    let ack = app
        .client
        .submit_rating(&rating)
        .await
        .context("submit rating")?;
    if ack.message.is_empty() {
        println!("Rating submitted.");
    } else {
        println!("{}", ack.message);
    }
    Ok(())
}
