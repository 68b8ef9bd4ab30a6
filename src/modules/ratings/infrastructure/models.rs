use crate::modules::ratings::domain::{NewRating, Rating, Score};
use crate::schema::ratings;
use crate::shared::errors::AppError;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

// For reading from database
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = ratings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RatingModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub movie_id: Uuid,
    pub score: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<RatingModel> for Rating {
    type Error = AppError;

    fn try_from(model: RatingModel) -> Result<Self, Self::Error> {
        let score = Score::try_from(model.score).map_err(|_| {
            AppError::DatabaseError(format!(
                "Rating {} has out-of-range score {}",
                model.id, model.score
            ))
        })?;

        Ok(Rating {
            id: model.id,
            user_id: model.user_id,
            movie_id: model.movie_id,
            score,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

// For inserting into database
#[derive(Insertable, Debug)]
#[diesel(table_name = ratings)]
pub struct NewRatingModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub movie_id: Uuid,
    pub score: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<NewRating> for NewRatingModel {
    fn from(rating: NewRating) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: rating.user_id,
            movie_id: rating.movie_id,
            score: rating.score.as_i16(),
            created_at: now,
            updated_at: now,
        }
    }
}
