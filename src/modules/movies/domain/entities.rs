use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cached rating summary stored on the movie row.
///
/// Derived from the movie's rating records; never authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MovieAggregate {
    pub average_rating: f64,
    pub total_ratings: i64,
}

impl MovieAggregate {
    pub fn new(average_rating: f64, total_ratings: i64) -> Self {
        Self {
            average_rating,
            total_ratings,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub is_active: bool,
    pub aggregate: MovieAggregate,
    pub updated_at: DateTime<Utc>,
}

impl Movie {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            is_active: true,
            aggregate: MovieAggregate::empty(),
            updated_at: Utc::now(),
        }
    }

    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }
}
