use std::sync::Arc;

use uuid::Uuid;

use crate::modules::movies::domain::MovieRepository;
use crate::modules::ratings::domain::{
    NewRating, Rating, RatingRepository, RatingSummary, Score, ScoreDistribution, StoredRating,
};
use crate::shared::application::{PaginatedResult, PaginationParams};
use crate::shared::errors::{AppError, AppResult};
use crate::{log_debug, log_warn};

/// Insert/update attempts before a pair under constant contention is given up on
const MAX_WRITE_ATTEMPTS: usize = 3;

/// Persists rating records and answers queries over them.
///
/// The unique index on (user_id, movie_id) is the only serialization point;
/// a lost insert race surfaces here as `Conflict` and is turned into an update.
pub struct RatingStore {
    ratings: Arc<dyn RatingRepository>,
    movies: Arc<dyn MovieRepository>,
}

impl RatingStore {
    pub fn new(ratings: Arc<dyn RatingRepository>, movies: Arc<dyn MovieRepository>) -> Self {
        Self { ratings, movies }
    }

    pub async fn upsert_rating(
        &self,
        user_id: Uuid,
        movie_id: Uuid,
        score: Score,
    ) -> AppResult<StoredRating> {
        self.ensure_active_movie(movie_id).await?;

        let mut try_update = self.ratings.find(user_id, movie_id).await?.is_some();

        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            if try_update {
                match self.ratings.update_score(user_id, movie_id, score).await? {
                    Some(rating) => return Ok(StoredRating::updated(rating)),
                    None => {
                        // Deleted between find and update
                        log_debug!(
                            "Rating for user {} on movie {} vanished before update (attempt {})",
                            user_id,
                            movie_id,
                            attempt
                        );
                        try_update = false;
                    }
                }
            } else {
                match self
                    .ratings
                    .insert(NewRating::new(user_id, movie_id, score))
                    .await
                {
                    Ok(rating) => return Ok(StoredRating::created(rating)),
                    Err(AppError::Conflict(_)) => {
                        log_debug!(
                            "Concurrent create for user {} on movie {}, retrying as update (attempt {})",
                            user_id,
                            movie_id,
                            attempt
                        );
                        try_update = true;
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        log_warn!(
            "Giving up on rating write for user {} on movie {} after {} attempts",
            user_id,
            movie_id,
            MAX_WRITE_ATTEMPTS
        );
        Err(AppError::Conflict(format!(
            "Rating for movie {} is being modified concurrently, try again",
            movie_id
        )))
    }

    pub async fn delete_rating(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<()> {
        if !self.ratings.delete(user_id, movie_id).await? {
            return Err(AppError::NotFound(format!(
                "No rating by user {} for movie {}",
                user_id, movie_id
            )));
        }
        Ok(())
    }

    pub async fn find_rating(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<Option<Rating>> {
        self.ratings.find(user_id, movie_id).await
    }

    pub async fn list_ratings_for_movie(
        &self,
        movie_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<PaginatedResult<Rating>> {
        self.ratings.list_for_movie(movie_id, params).await
    }

    pub async fn list_ratings_for_user(
        &self,
        user_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<PaginatedResult<Rating>> {
        self.ratings.list_for_user(user_id, params).await
    }

    pub async fn count_and_average_for_movie(&self, movie_id: Uuid) -> AppResult<RatingSummary> {
        self.ratings.summary_for_movie(movie_id).await
    }

    pub async fn score_distribution_for_movie(
        &self,
        movie_id: Uuid,
    ) -> AppResult<ScoreDistribution> {
        self.ratings.distribution_for_movie(movie_id).await
    }

    /// Fails with `NotFound` unless the movie exists and is active
    pub async fn ensure_active_movie(&self, movie_id: Uuid) -> AppResult<()> {
        if !self.movies.is_active(movie_id).await? {
            return Err(AppError::NotFound(format!(
                "Movie with ID {} not found",
                movie_id
            )));
        }
        Ok(())
    }
}
