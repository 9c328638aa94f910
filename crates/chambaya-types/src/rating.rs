//! Ratings exchanged after a work is completed.

use serde::{Deserialize, Serialize};

/// Role of the user being rated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingTarget {
    Worker,
    Employer,
}

/// Body for `POST /ratings/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRating {
    /// The user receiving the rating.
    pub user_id: String,
    pub work_id: String,
    pub score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "type")]
    pub target: RatingTarget,
}

impl NewRating {
    pub const MIN_SCORE: u8 = 1;
    pub const MAX_SCORE: u8 = 5;

    pub fn has_valid_score(&self) -> bool {
        (Self::MIN_SCORE..=Self::MAX_SCORE).contains(&self.score)
    }
}
