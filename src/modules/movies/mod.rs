//! Partial view of the catalog's movies: the activity flag consulted before
//! any rating write and the denormalized rating aggregate columns.
pub mod domain;
pub mod infrastructure;

// Re-exports for easy external access
pub use domain::{Movie, MovieAggregate, MovieRepository};
pub use infrastructure::MovieRepositoryImpl;
