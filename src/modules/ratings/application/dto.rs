use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::modules::ratings::domain::{RatingOutcome, Score, ScoreDistribution, StoredRating};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitRatingResult {
    pub rating_id: Uuid,
    pub movie_id: Uuid,
    pub score: Score,
    pub outcome: RatingOutcome,
    pub timestamp: DateTime<Utc>,
}

impl From<StoredRating> for SubmitRatingResult {
    fn from(stored: StoredRating) -> Self {
        Self {
            rating_id: stored.rating.id,
            movie_id: stored.rating.movie_id,
            score: stored.rating.score,
            outcome: stored.outcome,
            timestamp: stored.rating.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoveRatingResult {
    pub movie_id: Uuid,
    pub deleted_at: DateTime<Utc>,
}

/// Public rating stats for one movie
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieRatingStats {
    pub movie_id: Uuid,
    pub average: f64,
    pub total: i64,
    pub distribution: ScoreDistribution,
}

/// The calling user's own rating, if any
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorRating {
    pub has_rating: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<Score>,
}

impl ActorRating {
    pub fn none() -> Self {
        Self {
            has_rating: false,
            score: None,
        }
    }

    pub fn rated(score: Score) -> Self {
        Self {
            has_rating: true,
            score: Some(score),
        }
    }
}
