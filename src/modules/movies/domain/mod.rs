pub mod entities;
pub mod repository;

pub use entities::{Movie, MovieAggregate};
pub use repository::MovieRepository;
