pub mod entities;
pub mod repository;
pub mod value_objects;

pub use entities::{NewRating, Rating, RatingOutcome, StoredRating};
pub use repository::RatingRepository;
pub use value_objects::{RatingSummary, Score, ScoreDistribution};
