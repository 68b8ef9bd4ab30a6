pub mod aggregate_recomputer;
pub mod dto;
pub mod rating_store;
pub mod reconciler;
pub mod service;

pub use aggregate_recomputer::AggregateRecomputer;
pub use dto::{ActorRating, MovieRatingStats, RemoveRatingResult, SubmitRatingResult};
pub use rating_store::RatingStore;
pub use reconciler::{AggregateReconciler, ReconcileReport};
pub use service::RatingService;
