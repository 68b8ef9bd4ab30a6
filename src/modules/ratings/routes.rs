//! HTTP handlers for the rating endpoints, mounted under `/api`.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::application::{ActorRating, MovieRatingStats, RemoveRatingResult, SubmitRatingResult};
use super::domain::{Rating, RatingOutcome, Score};
use crate::shared::application::{PageInfo, PaginatedResult, PaginationParams};
use crate::shared::auth::Actor;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::Validator;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitRatingRequest {
    // Kept untyped so 2.5 and "4" are reported as score errors, not body errors
    #[serde(default)]
    pub score: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    fn into_params(self) -> AppResult<PaginationParams> {
        PaginationParams::try_new(self.page, self.limit)
    }
}

#[derive(Debug, Serialize)]
pub struct RatingListResponse {
    pub ratings: Vec<Rating>,
    pub pagination: PageInfo,
}

impl From<PaginatedResult<Rating>> for RatingListResponse {
    fn from(result: PaginatedResult<Rating>) -> Self {
        Self {
            ratings: result.items,
            pagination: result.pagination,
        }
    }
}

pub fn rating_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/movies/:movie_id/ratings",
            post(submit_rating)
                .delete(remove_rating)
                .get(list_movie_ratings),
        )
        .route("/movies/:movie_id/ratings/stats", get(movie_rating_stats))
        .route("/movies/:movie_id/ratings/me", get(my_rating_for_movie))
        .route("/users/me/ratings", get(my_ratings))
}

fn page_params(query: Result<Query<PageQuery>, QueryRejection>) -> AppResult<PaginationParams> {
    let Query(query) =
        query.map_err(|e| AppError::ValidationError(format!("Invalid pagination: {}", e)))?;
    query.into_params()
}

async fn submit_rating(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(movie_id): Path<String>,
    payload: Result<Json<SubmitRatingRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<SubmitRatingResult>)> {
    let movie_id = Validator::parse_id(&movie_id, "movie")?;
    let Json(request) =
        payload.map_err(|e| AppError::ValidationError(format!("Invalid request body: {}", e)))?;
    let score = Score::from_json(&request.score)?;

    let result = state
        .rating_service
        .submit_rating(&actor, movie_id, score)
        .await?;

    let status = match result.outcome {
        RatingOutcome::Created => StatusCode::CREATED,
        RatingOutcome::Updated => StatusCode::OK,
    };

    Ok((status, Json(result)))
}

async fn remove_rating(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(movie_id): Path<String>,
) -> AppResult<Json<RemoveRatingResult>> {
    let movie_id = Validator::parse_id(&movie_id, "movie")?;
    let result = state.rating_service.remove_rating(&actor, movie_id).await?;
    Ok(Json(result))
}

async fn movie_rating_stats(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
) -> AppResult<Json<MovieRatingStats>> {
    let movie_id = Validator::parse_id(&movie_id, "movie")?;
    let stats = state.rating_service.get_movie_rating_stats(movie_id).await?;
    Ok(Json(stats))
}

async fn my_rating_for_movie(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(movie_id): Path<String>,
) -> AppResult<Json<ActorRating>> {
    let movie_id = Validator::parse_id(&movie_id, "movie")?;
    let rating = state
        .rating_service
        .get_actor_rating_for_movie(&actor, movie_id)
        .await?;
    Ok(Json(rating))
}

async fn list_movie_ratings(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> AppResult<Json<RatingListResponse>> {
    let movie_id = Validator::parse_id(&movie_id, "movie")?;
    let params = page_params(query)?;
    let page = state
        .rating_service
        .list_ratings_for_movie(movie_id, params)
        .await?;
    Ok(Json(page.into()))
}

async fn my_ratings(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> AppResult<Json<RatingListResponse>> {
    let params = page_params(query)?;
    let page = state
        .rating_service
        .list_ratings_for_actor(&actor, params)
        .await?;
    Ok(Json(page.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults() {
        let params = PageQuery::default().into_params().unwrap();
        assert_eq!(params, PaginationParams::default());
    }

    #[test]
    fn test_page_query_rejects_oversized_limit() {
        let query = PageQuery {
            page: Some(1),
            limit: Some(101),
        };
        assert!(matches!(
            query.into_params(),
            Err(AppError::ValidationError(_))
        ));
    }
}
