use std::sync::Arc;

use uuid::Uuid;

use super::rating_store::RatingStore;
use crate::log_debug;
use crate::modules::movies::domain::{MovieAggregate, MovieRepository};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::TimedOperation;

/// Rewrites a movie's cached aggregate from its rating records.
///
/// Each call overwrites unconditionally from a fresh read, so concurrent
/// recomputes for one movie converge on the last committed state.
pub struct AggregateRecomputer {
    store: Arc<RatingStore>,
    movies: Arc<dyn MovieRepository>,
}

impl AggregateRecomputer {
    pub fn new(store: Arc<RatingStore>, movies: Arc<dyn MovieRepository>) -> Self {
        Self { store, movies }
    }

    pub async fn recompute_movie_aggregate(&self, movie_id: Uuid) -> AppResult<MovieAggregate> {
        let timer = TimedOperation::new("recompute_movie_aggregate");

        let summary = self
            .store
            .count_and_average_for_movie(movie_id)
            .await
            .map_err(|e| {
                AppError::AggregateRecompute(format!(
                    "Failed to read ratings for movie {}: {}",
                    movie_id, e
                ))
            })?;

        let aggregate = MovieAggregate::new(summary.average, summary.count);

        self.movies
            .update_aggregate(movie_id, aggregate)
            .await
            .map_err(|e| {
                AppError::AggregateRecompute(format!(
                    "Failed to write aggregate for movie {}: {}",
                    movie_id, e
                ))
            })?;

        timer.finish_with_threshold(200);
        log_debug!(
            "Movie {} aggregate is now {} over {} ratings",
            movie_id,
            aggregate.average_rating,
            aggregate.total_ratings
        );

        Ok(aggregate)
    }
}
