use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::Score;

/// One user's score for one movie. At most one exists per (user_id, movie_id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: Uuid,
    pub user_id: Uuid,
    pub movie_id: Uuid,
    pub score: Score,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New rating to be stored (before insertion to database)
#[derive(Debug, Clone, PartialEq)]
pub struct NewRating {
    pub user_id: Uuid,
    pub movie_id: Uuid,
    pub score: Score,
}

impl NewRating {
    pub fn new(user_id: Uuid, movie_id: Uuid, score: Score) -> Self {
        Self {
            user_id,
            movie_id,
            score,
        }
    }
}

/// Which transition a submission took
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingOutcome {
    Created,
    Updated,
}

impl std::fmt::Display for RatingOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatingOutcome::Created => write!(f, "created"),
            RatingOutcome::Updated => write!(f, "updated"),
        }
    }
}

/// A rating as it stands after an upsert, with the path that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRating {
    pub rating: Rating,
    pub outcome: RatingOutcome,
}

impl StoredRating {
    pub fn created(rating: Rating) -> Self {
        Self {
            rating,
            outcome: RatingOutcome::Created,
        }
    }

    pub fn updated(rating: Rating) -> Self {
        Self {
            rating,
            outcome: RatingOutcome::Updated,
        }
    }
}
