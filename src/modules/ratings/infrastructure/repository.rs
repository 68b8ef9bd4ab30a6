/// Diesel-based implementation of RatingRepository
///
/// Uniqueness of (user_id, movie_id) is left to the `ratings_user_movie_unique`
/// index; a duplicate insert comes back as `AppError::Conflict`.
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::dsl::{count_star, sum};
use diesel::prelude::*;
use uuid::Uuid;

use super::models::{NewRatingModel, RatingModel};
use crate::modules::ratings::domain::{
    NewRating, Rating, RatingRepository, RatingSummary, Score, ScoreDistribution,
};
use crate::schema::ratings;
use crate::shared::application::{PaginatedResult, PaginationParams};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::infrastructure::{Database, DbConnection};

pub struct RatingRepositoryImpl {
    db: Arc<Database>,
}

impl RatingRepositoryImpl {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

fn to_ratings(models: Vec<RatingModel>) -> AppResult<Vec<Rating>> {
    models.into_iter().map(Rating::try_from).collect()
}

fn page_for_movie(
    conn: &mut DbConnection,
    movie_id: Uuid,
    params: PaginationParams,
) -> AppResult<(Vec<RatingModel>, i64)> {
    let total = ratings::table
        .filter(ratings::movie_id.eq(movie_id))
        .count()
        .get_result::<i64>(conn)?;

    let models = ratings::table
        .filter(ratings::movie_id.eq(movie_id))
        .order((ratings::updated_at.desc(), ratings::id.desc()))
        .offset(params.offset())
        .limit(params.limit())
        .select(RatingModel::as_select())
        .load(conn)?;

    Ok((models, total))
}

fn page_for_user(
    conn: &mut DbConnection,
    user_id: Uuid,
    params: PaginationParams,
) -> AppResult<(Vec<RatingModel>, i64)> {
    let total = ratings::table
        .filter(ratings::user_id.eq(user_id))
        .count()
        .get_result::<i64>(conn)?;

    let models = ratings::table
        .filter(ratings::user_id.eq(user_id))
        .order((ratings::updated_at.desc(), ratings::id.desc()))
        .offset(params.offset())
        .limit(params.limit())
        .select(RatingModel::as_select())
        .load(conn)?;

    Ok((models, total))
}

#[async_trait]
impl RatingRepository for RatingRepositoryImpl {
    async fn find(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<Option<Rating>> {
        let model = self
            .db
            .with_connection(move |conn| {
                ratings::table
                    .filter(ratings::user_id.eq(user_id))
                    .filter(ratings::movie_id.eq(movie_id))
                    .select(RatingModel::as_select())
                    .first(conn)
                    .optional()
                    .map_err(AppError::from)
            })
            .await?;

        model.map(Rating::try_from).transpose()
    }

    async fn insert(&self, rating: NewRating) -> AppResult<Rating> {
        let new_rating = NewRatingModel::from(rating);

        let model = self
            .db
            .with_connection(move |conn| {
                diesel::insert_into(ratings::table)
                    .values(&new_rating)
                    .returning(RatingModel::as_returning())
                    .get_result(conn)
                    .map_err(AppError::from)
            })
            .await?;

        Rating::try_from(model)
    }

    async fn update_score(
        &self,
        user_id: Uuid,
        movie_id: Uuid,
        score: Score,
    ) -> AppResult<Option<Rating>> {
        let model = self
            .db
            .with_connection(move |conn| {
                diesel::update(
                    ratings::table
                        .filter(ratings::user_id.eq(user_id))
                        .filter(ratings::movie_id.eq(movie_id)),
                )
                .set((
                    ratings::score.eq(score.as_i16()),
                    ratings::updated_at.eq(Utc::now()),
                ))
                .returning(RatingModel::as_returning())
                .get_result(conn)
                .optional()
                .map_err(AppError::from)
            })
            .await?;

        model.map(Rating::try_from).transpose()
    }

    async fn delete(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<bool> {
        let deleted = self
            .db
            .with_connection(move |conn| {
                diesel::delete(
                    ratings::table
                        .filter(ratings::user_id.eq(user_id))
                        .filter(ratings::movie_id.eq(movie_id)),
                )
                .execute(conn)
                .map_err(AppError::from)
            })
            .await?;

        Ok(deleted > 0)
    }

    async fn list_for_movie(
        &self,
        movie_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<PaginatedResult<Rating>> {
        let (models, total) = self
            .db
            .with_connection(move |conn| page_for_movie(conn, movie_id, params))
            .await?;

        Ok(PaginatedResult::new(to_ratings(models)?, total as u64, &params))
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<PaginatedResult<Rating>> {
        let (models, total) = self
            .db
            .with_connection(move |conn| page_for_user(conn, user_id, params))
            .await?;

        Ok(PaginatedResult::new(to_ratings(models)?, total as u64, &params))
    }

    async fn summary_for_movie(&self, movie_id: Uuid) -> AppResult<RatingSummary> {
        let (count, total) = self
            .db
            .with_connection(move |conn| {
                ratings::table
                    .filter(ratings::movie_id.eq(movie_id))
                    .select((count_star(), sum(ratings::score)))
                    .first::<(i64, Option<i64>)>(conn)
                    .map_err(AppError::from)
            })
            .await?;

        Ok(RatingSummary::from_totals(count, total.unwrap_or(0)))
    }

    async fn distribution_for_movie(&self, movie_id: Uuid) -> AppResult<ScoreDistribution> {
        let rows = self
            .db
            .with_connection(move |conn| {
                ratings::table
                    .filter(ratings::movie_id.eq(movie_id))
                    .group_by(ratings::score)
                    .select((ratings::score, count_star()))
                    .load::<(i16, i64)>(conn)
                    .map_err(AppError::from)
            })
            .await?;

        let counts = rows
            .into_iter()
            .map(|(score, count)| Ok((Score::try_from(score)?, count)))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(ScoreDistribution::from_counts(counts))
    }
}
