/// Repository trait for rating persistence
///
/// Implementations must enforce uniqueness of (user_id, movie_id) and report a
/// duplicate insert as `AppError::Conflict`.
use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{NewRating, Rating};
use super::value_objects::{RatingSummary, Score, ScoreDistribution};
use crate::shared::application::{PaginatedResult, PaginationParams};
use crate::shared::errors::AppResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingRepository: Send + Sync {
    async fn find(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<Option<Rating>>;

    /// Insert a new rating. Returns `Conflict` if the pair is already rated.
    async fn insert(&self, rating: NewRating) -> AppResult<Rating>;

    /// Change the score of an existing rating. Returns `None` if no rating exists for the pair.
    async fn update_score(
        &self,
        user_id: Uuid,
        movie_id: Uuid,
        score: Score,
    ) -> AppResult<Option<Rating>>;

    /// Returns true if a rating was removed
    async fn delete(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<bool>;

    /// Newest first
    async fn list_for_movie(
        &self,
        movie_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<PaginatedResult<Rating>>;

    /// Newest first
    async fn list_for_user(
        &self,
        user_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<PaginatedResult<Rating>>;

    /// Count and rounded mean over the stored records
    async fn summary_for_movie(&self, movie_id: Uuid) -> AppResult<RatingSummary>;

    async fn distribution_for_movie(&self, movie_id: Uuid) -> AppResult<ScoreDistribution>;
}
