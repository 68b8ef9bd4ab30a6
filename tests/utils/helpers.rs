/// Test helper functions and service builders
use super::memory::{InMemoryMovieRepository, InMemoryRatingRepository};
use jsonwebtoken::{encode, EncodingKey, Header};
use marquee_lib::modules::ratings::RatingService;
use marquee_lib::shared::auth::{Actor, Claims};
use marquee_lib::state::AppState;
use std::sync::Arc;
use uuid::Uuid;

pub const TEST_SECRET: &[u8] = b"marquee-test-secret";

pub struct TestServices {
    pub ratings: Arc<InMemoryRatingRepository>,
    pub movies: Arc<InMemoryMovieRepository>,
    pub rating_service: Arc<RatingService>,
}

/// Build a rating service over fresh in-memory repositories
pub fn build_test_services() -> TestServices {
    let ratings = Arc::new(InMemoryRatingRepository::new());
    let movies = Arc::new(InMemoryMovieRepository::new());
    let rating_service = Arc::new(RatingService::from_repositories(
        ratings.clone(),
        movies.clone(),
    ));

    TestServices {
        ratings,
        movies,
        rating_service,
    }
}

/// Build app state sharing the in-memory repositories of `services`
pub fn build_test_state(services: &TestServices) -> Arc<AppState> {
    AppState::from_repositories(
        services.ratings.clone(),
        services.movies.clone(),
        TEST_SECRET,
    )
}

pub fn actor() -> Actor {
    let user_id = Uuid::new_v4();
    Actor {
        user_id,
        email: format!("{}@example.com", user_id.simple()),
    }
}

pub fn token_for(actor: &Actor) -> String {
    let claims = Claims::new(actor.user_id, actor.email.clone(), chrono::Duration::hours(1));
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET),
    )
    .unwrap()
}
