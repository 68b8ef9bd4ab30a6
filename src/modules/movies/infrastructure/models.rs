use crate::modules::movies::domain::{Movie, MovieAggregate};
use crate::schema::movies;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

// For reading from database
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = movies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MovieModel {
    pub id: Uuid,
    pub title: String,
    pub is_active: bool,
    pub average_rating: f64,
    pub total_ratings: i64,
    pub updated_at: DateTime<Utc>,
}

impl From<MovieModel> for Movie {
    fn from(model: MovieModel) -> Self {
        Movie {
            id: model.id,
            title: model.title,
            is_active: model.is_active,
            aggregate: MovieAggregate::new(model.average_rating, model.total_ratings),
            updated_at: model.updated_at,
        }
    }
}

// Only the aggregate columns are ever written by this service
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = movies)]
pub struct MovieAggregateChangeset {
    pub average_rating: f64,
    pub total_ratings: i64,
    pub updated_at: DateTime<Utc>,
}

impl MovieAggregateChangeset {
    pub fn from_aggregate(aggregate: MovieAggregate) -> Self {
        Self {
            average_rating: aggregate.average_rating,
            total_ratings: aggregate.total_ratings,
            updated_at: Utc::now(),
        }
    }
}
