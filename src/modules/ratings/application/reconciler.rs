/// Periodic sweep that recomputes every active movie's aggregate
///
/// Repairs caches left stale when a post-mutation recompute failed. Pages
/// through active movies in fixed-size chunks and sleeps for the configured
/// interval between sweeps.
use std::sync::Arc;
use std::time::Duration;

use super::aggregate_recomputer::AggregateRecomputer;
use crate::modules::movies::domain::MovieRepository;
use crate::shared::config::ReconcileConfig;
use crate::shared::errors::AppResult;
use crate::shared::utils::TimedOperation;
use crate::{log_debug, log_error, log_info, log_warn};

/// Outcome of one full sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub recomputed: usize,
    pub failed: usize,
}

pub struct AggregateReconciler {
    movies: Arc<dyn MovieRepository>,
    recomputer: Arc<AggregateRecomputer>,
    interval: Duration,
    chunk_size: i64,
    is_running: Arc<tokio::sync::RwLock<bool>>,
}

impl AggregateReconciler {
    pub fn new(
        movies: Arc<dyn MovieRepository>,
        recomputer: Arc<AggregateRecomputer>,
        config: &ReconcileConfig,
    ) -> Self {
        Self {
            movies,
            recomputer,
            interval: config.interval,
            chunk_size: config.chunk_size.max(1),
            is_running: Arc::new(tokio::sync::RwLock::new(false)),
        }
    }

    /// Run sweeps until `stop` is called. Spawn with `tokio::spawn`.
    pub async fn run(self: Arc<Self>) {
        log_info!(
            "Aggregate reconciler started (every {}s, chunk {})",
            self.interval.as_secs(),
            self.chunk_size
        );

        {
            let mut running = self.is_running.write().await;
            *running = true;
        }

        loop {
            tokio::time::sleep(self.interval).await;

            {
                let running = self.is_running.read().await;
                if !*running {
                    log_info!("Aggregate reconciler stopped");
                    break;
                }
            }

            match self.reconcile_all().await {
                Ok(report) if report.failed > 0 => log_warn!(
                    "Reconcile sweep finished with {} failures ({} recomputed)",
                    report.failed,
                    report.recomputed
                ),
                Ok(report) => log_info!(
                    "Reconcile sweep recomputed {} movies",
                    report.recomputed
                ),
                Err(e) => log_error!("Reconcile sweep aborted: {}", e),
            }
        }
    }

    pub async fn stop(&self) {
        let mut running = self.is_running.write().await;
        *running = false;
        log_info!("Aggregate reconciler stop requested");
    }

    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    /// One full pass over every active movie.
    ///
    /// A failed recompute for one movie is counted and skipped. Failing to
    /// list movies aborts the sweep.
    pub async fn reconcile_all(&self) -> AppResult<ReconcileReport> {
        let timer = TimedOperation::new("reconcile_all");
        let mut report = ReconcileReport::default();
        let mut offset = 0i64;

        loop {
            let ids = self.movies.active_ids(offset, self.chunk_size).await?;
            if ids.is_empty() {
                break;
            }

            log_debug!("Reconciling {} movies from offset {}", ids.len(), offset);

            for movie_id in &ids {
                match self.recomputer.recompute_movie_aggregate(*movie_id).await {
                    Ok(_) => report.recomputed += 1,
                    Err(e) => {
                        log_warn!("Reconcile failed for movie {}: {}", movie_id, e);
                        report.failed += 1;
                    }
                }
            }

            if (ids.len() as i64) < self.chunk_size {
                break;
            }
            offset += self.chunk_size;
        }

        timer.finish_with_threshold(5_000);
        Ok(report)
    }
}
