use std::sync::Arc;

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use uuid::Uuid;

use super::models::{MovieAggregateChangeset, MovieModel};
use crate::modules::movies::domain::{Movie, MovieAggregate, MovieRepository};
use crate::schema::movies;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::infrastructure::Database;

pub struct MovieRepositoryImpl {
    db: Arc<Database>,
}

impl MovieRepositoryImpl {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MovieRepository for MovieRepositoryImpl {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Movie>> {
        let model = self
            .db
            .with_connection(move |conn| {
                movies::table
                    .find(id)
                    .select(MovieModel::as_select())
                    .first(conn)
                    .optional()
                    .map_err(AppError::from)
            })
            .await?;

        Ok(model.map(Movie::from))
    }

    async fn is_active(&self, id: Uuid) -> AppResult<bool> {
        self.db
            .with_connection(move |conn| {
                diesel::select(exists(
                    movies::table
                        .filter(movies::id.eq(id))
                        .filter(movies::is_active.eq(true)),
                ))
                .get_result(conn)
                .map_err(AppError::from)
            })
            .await
    }

    async fn update_aggregate(&self, id: Uuid, aggregate: MovieAggregate) -> AppResult<()> {
        let changeset = MovieAggregateChangeset::from_aggregate(aggregate);

        let updated = self
            .db
            .with_connection(move |conn| {
                diesel::update(movies::table.find(id))
                    .set(&changeset)
                    .execute(conn)
                    .map_err(AppError::from)
            })
            .await?;

        if updated == 0 {
            return Err(AppError::NotFound(format!("Movie with ID {} not found", id)));
        }

        Ok(())
    }

    async fn active_ids(&self, offset: i64, limit: i64) -> AppResult<Vec<Uuid>> {
        self.db
            .with_connection(move |conn| {
                movies::table
                    .filter(movies::is_active.eq(true))
                    .order(movies::id.asc())
                    .offset(offset)
                    .limit(limit)
                    .select(movies::id)
                    .load::<Uuid>(conn)
                    .map_err(AppError::from)
            })
            .await
    }
}
