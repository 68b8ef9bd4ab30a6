/// In-memory repositories for exercising services and routes without Postgres
///
/// `InMemoryRatingRepository` enforces (user_id, movie_id) uniqueness the same
/// way the unique index does: a second insert for a pair returns `Conflict`.
use async_trait::async_trait;
use chrono::Utc;
use marquee_lib::modules::movies::{Movie, MovieAggregate, MovieRepository};
use marquee_lib::modules::ratings::domain::{
    NewRating, Rating, RatingRepository, RatingSummary, Score, ScoreDistribution,
};
use marquee_lib::shared::application::{PaginatedResult, PaginationParams};
use marquee_lib::shared::errors::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;
use uuid::Uuid;

fn newest_first(mut ratings: Vec<Rating>) -> Vec<Rating> {
    ratings.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    ratings
}

fn paginate(ratings: Vec<Rating>, params: PaginationParams) -> PaginatedResult<Rating> {
    let total = ratings.len() as u64;
    let items = newest_first(ratings)
        .into_iter()
        .skip(params.offset() as usize)
        .take(params.limit() as usize)
        .collect();
    PaginatedResult::new(items, total, &params)
}

#[derive(Default)]
pub struct InMemoryRatingRepository {
    rows: Mutex<HashMap<(Uuid, Uuid), Rating>>,
    find_gate: Mutex<Option<Arc<Barrier>>>,
    gated_finds: AtomicUsize,
}

impl InMemoryRatingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold the next `callers` lookups until all of them have read, so that
    /// every one of them sees the same (absent) row before writing.
    pub fn gate_next_finds(&self, callers: usize) {
        *self.find_gate.lock().unwrap() = Some(Arc::new(Barrier::new(callers)));
        self.gated_finds.store(callers, Ordering::SeqCst);
    }

    pub fn count_for(&self, user_id: Uuid, movie_id: Uuid) -> usize {
        self.rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.user_id == user_id && r.movie_id == movie_id)
            .count()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn take_gate(&self) -> Option<Arc<Barrier>> {
        let remaining = self.gated_finds.load(Ordering::SeqCst);
        if remaining == 0 {
            return None;
        }
        if self
            .gated_finds
            .compare_exchange(remaining, remaining - 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return self.take_gate();
        }
        self.find_gate.lock().unwrap().clone()
    }
}

#[async_trait]
impl RatingRepository for InMemoryRatingRepository {
    async fn find(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<Option<Rating>> {
        let found = self.rows.lock().unwrap().get(&(user_id, movie_id)).cloned();

        if let Some(gate) = self.take_gate() {
            gate.wait().await;
        }

        Ok(found)
    }

    async fn insert(&self, rating: NewRating) -> AppResult<Rating> {
        let mut rows = self.rows.lock().unwrap();
        let key = (rating.user_id, rating.movie_id);

        if rows.contains_key(&key) {
            return Err(AppError::Conflict(
                "duplicate key value violates unique constraint \"ratings_user_movie_unique\""
                    .to_string(),
            ));
        }

        let now = Utc::now();
        let stored = Rating {
            id: Uuid::new_v4(),
            user_id: rating.user_id,
            movie_id: rating.movie_id,
            score: rating.score,
            created_at: now,
            updated_at: now,
        };
        rows.insert(key, stored.clone());
        Ok(stored)
    }

    async fn update_score(
        &self,
        user_id: Uuid,
        movie_id: Uuid,
        score: Score,
    ) -> AppResult<Option<Rating>> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.get_mut(&(user_id, movie_id)).map(|rating| {
            rating.score = score;
            rating.updated_at = Utc::now();
            rating.clone()
        }))
    }

    async fn delete(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<bool> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .remove(&(user_id, movie_id))
            .is_some())
    }

    async fn list_for_movie(
        &self,
        movie_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<PaginatedResult<Rating>> {
        let ratings = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.movie_id == movie_id)
            .cloned()
            .collect();
        Ok(paginate(ratings, params))
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<PaginatedResult<Rating>> {
        let ratings = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        Ok(paginate(ratings, params))
    }

    async fn summary_for_movie(&self, movie_id: Uuid) -> AppResult<RatingSummary> {
        let scores: Vec<Score> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.movie_id == movie_id)
            .map(|r| r.score)
            .collect();
        Ok(RatingSummary::from_scores(scores))
    }

    async fn distribution_for_movie(&self, movie_id: Uuid) -> AppResult<ScoreDistribution> {
        let counts: Vec<(Score, i64)> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.movie_id == movie_id)
            .map(|r| (r.score, 1))
            .collect();
        Ok(ScoreDistribution::from_counts(counts))
    }
}

#[derive(Default)]
pub struct InMemoryMovieRepository {
    movies: Mutex<HashMap<Uuid, Movie>>,
    fail_aggregate_writes: AtomicBool,
    aggregate_writes: AtomicUsize,
}

impl InMemoryMovieRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, movie: Movie) -> Uuid {
        let id = movie.id;
        self.movies.lock().unwrap().insert(id, movie);
        id
    }

    pub fn add_active(&self, title: &str) -> Uuid {
        self.add(Movie::new(title))
    }

    pub fn aggregate_of(&self, id: Uuid) -> MovieAggregate {
        self.movies
            .lock()
            .unwrap()
            .get(&id)
            .map(|m| m.aggregate)
            .unwrap_or_default()
    }

    pub fn set_fail_aggregate_writes(&self, fail: bool) {
        self.fail_aggregate_writes.store(fail, Ordering::SeqCst);
    }

    pub fn aggregate_writes(&self) -> usize {
        self.aggregate_writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Movie>> {
        Ok(self.movies.lock().unwrap().get(&id).cloned())
    }

    async fn is_active(&self, id: Uuid) -> AppResult<bool> {
        Ok(self
            .movies
            .lock()
            .unwrap()
            .get(&id)
            .map(|m| m.is_active)
            .unwrap_or(false))
    }

    async fn update_aggregate(&self, id: Uuid, aggregate: MovieAggregate) -> AppResult<()> {
        self.aggregate_writes.fetch_add(1, Ordering::SeqCst);

        if self.fail_aggregate_writes.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError(
                "could not serialize access due to concurrent update".to_string(),
            ));
        }

        let mut movies = self.movies.lock().unwrap();
        let movie = movies
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Movie with ID {} not found", id)))?;
        movie.aggregate = aggregate;
        movie.updated_at = Utc::now();
        Ok(())
    }

    async fn active_ids(&self, offset: i64, limit: i64) -> AppResult<Vec<Uuid>> {
        let mut ids: Vec<Uuid> = self
            .movies
            .lock()
            .unwrap()
            .values()
            .filter(|m| m.is_active)
            .map(|m| m.id)
            .collect();
        ids.sort();
        Ok(ids
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }
}
