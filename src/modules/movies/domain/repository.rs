use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{Movie, MovieAggregate};
use crate::shared::errors::AppResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Movie>>;

    /// True when the movie exists and has not been soft-deleted
    async fn is_active(&self, id: Uuid) -> AppResult<bool>;

    /// Overwrite the cached aggregate. Fails with `NotFound` if the movie row is gone.
    async fn update_aggregate(&self, id: Uuid, aggregate: MovieAggregate) -> AppResult<()>;

    /// Active movie IDs in a stable order, for chunked sweeps
    async fn active_ids(&self, offset: i64, limit: i64) -> AppResult<Vec<Uuid>>;
}
