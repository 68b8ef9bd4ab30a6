use std::sync::Arc;

use crate::modules::movies::MovieRepository;
use crate::modules::ratings::{RatingRepository, RatingService};
use crate::shared::auth::JwtVerifier;

/// Shared handles passed to every request handler
pub struct AppState {
    pub rating_service: Arc<RatingService>,
    pub jwt: JwtVerifier,
}

impl AppState {
    pub fn new(rating_service: Arc<RatingService>, jwt: JwtVerifier) -> Arc<Self> {
        Arc::new(Self {
            rating_service,
            jwt,
        })
    }

    pub fn from_repositories(
        ratings: Arc<dyn RatingRepository>,
        movies: Arc<dyn MovieRepository>,
        jwt_secret: &[u8],
    ) -> Arc<Self> {
        Self::new(
            Arc::new(RatingService::from_repositories(ratings, movies)),
            JwtVerifier::new(jwt_secret),
        )
    }
}
