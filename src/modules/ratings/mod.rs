//! User ratings for movies and the aggregates derived from them.
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod routes;

// Re-exports for easy external access
pub use application::{AggregateReconciler, AggregateRecomputer, RatingService, RatingStore};
pub use domain::{Rating, RatingOutcome, RatingRepository, Score};
pub use infrastructure::RatingRepositoryImpl;
pub use routes::rating_routes;
