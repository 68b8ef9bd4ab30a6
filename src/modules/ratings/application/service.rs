use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::aggregate_recomputer::AggregateRecomputer;
use super::dto::{ActorRating, MovieRatingStats, RemoveRatingResult, SubmitRatingResult};
use super::rating_store::RatingStore;
use crate::modules::movies::domain::MovieRepository;
use crate::modules::ratings::domain::{Rating, RatingRepository, Score};
use crate::shared::application::{PaginatedResult, PaginationParams};
use crate::shared::auth::Actor;
use crate::shared::errors::AppResult;
use crate::shared::utils::LogContext;
use crate::{log_debug, log_warn};

/// Entry point for rating operations.
///
/// Every committed mutation is followed by exactly one aggregate recompute,
/// awaited before the call returns. A failed recompute is logged and does not
/// fail the mutation.
pub struct RatingService {
    store: Arc<RatingStore>,
    recomputer: Arc<AggregateRecomputer>,
}

impl RatingService {
    pub fn new(store: Arc<RatingStore>, recomputer: Arc<AggregateRecomputer>) -> Self {
        Self { store, recomputer }
    }

    /// Wire store and recomputer over the same repositories
    pub fn from_repositories(
        ratings: Arc<dyn RatingRepository>,
        movies: Arc<dyn MovieRepository>,
    ) -> Self {
        let store = Arc::new(RatingStore::new(ratings, movies.clone()));
        let recomputer = Arc::new(AggregateRecomputer::new(store.clone(), movies));
        Self::new(store, recomputer)
    }

    pub fn recomputer(&self) -> Arc<AggregateRecomputer> {
        self.recomputer.clone()
    }

    pub async fn submit_rating(
        &self,
        actor: &Actor,
        movie_id: Uuid,
        score: Score,
    ) -> AppResult<SubmitRatingResult> {
        let stored = self
            .store
            .upsert_rating(actor.user_id, movie_id, score)
            .await?;

        LogContext::rating_mutation(
            &stored.outcome.to_string(),
            &actor.user_id,
            &movie_id,
        );

        self.refresh_aggregate(movie_id).await;

        Ok(SubmitRatingResult::from(stored))
    }

    pub async fn remove_rating(
        &self,
        actor: &Actor,
        movie_id: Uuid,
    ) -> AppResult<RemoveRatingResult> {
        self.store.delete_rating(actor.user_id, movie_id).await?;
        let deleted_at = Utc::now();

        LogContext::rating_mutation("deleted", &actor.user_id, &movie_id);

        self.refresh_aggregate(movie_id).await;

        Ok(RemoveRatingResult {
            movie_id,
            deleted_at,
        })
    }

    /// Stats straight from the rating records, not the cached movie columns
    pub async fn get_movie_rating_stats(&self, movie_id: Uuid) -> AppResult<MovieRatingStats> {
        self.store.ensure_active_movie(movie_id).await?;

        let summary = self.store.count_and_average_for_movie(movie_id).await?;
        let distribution = self.store.score_distribution_for_movie(movie_id).await?;

        Ok(MovieRatingStats {
            movie_id,
            average: summary.average,
            total: summary.count,
            distribution,
        })
    }

    pub async fn get_actor_rating_for_movie(
        &self,
        actor: &Actor,
        movie_id: Uuid,
    ) -> AppResult<ActorRating> {
        let rating = self.store.find_rating(actor.user_id, movie_id).await?;

        Ok(match rating {
            Some(rating) => ActorRating::rated(rating.score),
            None => ActorRating::none(),
        })
    }

    pub async fn list_ratings_for_movie(
        &self,
        movie_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<PaginatedResult<Rating>> {
        self.store.ensure_active_movie(movie_id).await?;
        self.store.list_ratings_for_movie(movie_id, params).await
    }

    pub async fn list_ratings_for_actor(
        &self,
        actor: &Actor,
        params: PaginationParams,
    ) -> AppResult<PaginatedResult<Rating>> {
        self.store.list_ratings_for_user(actor.user_id, params).await
    }

    async fn refresh_aggregate(&self, movie_id: Uuid) {
        match self.recomputer.recompute_movie_aggregate(movie_id).await {
            Ok(aggregate) => log_debug!(
                "Refreshed aggregate for movie {} ({} ratings)",
                movie_id,
                aggregate.total_ratings
            ),
            Err(e) => log_warn!("Aggregate left stale for movie {}: {}", movie_id, e),
        }
    }
}
