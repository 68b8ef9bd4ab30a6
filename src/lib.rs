pub mod modules;
mod schema;
pub mod shared;
pub mod state;

use std::sync::Arc;

use axum::{http::Method, routing::get, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use modules::{
    movies::{MovieRepository, MovieRepositoryImpl},
    ratings::{rating_routes, AggregateReconciler, RatingRepository, RatingRepositoryImpl},
};
use shared::errors::{AppError, AppResult};
use shared::utils::init_logger;
use shared::{Config, Database};
use state::AppState;

/// Assemble the HTTP surface over an already wired state
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .nest("/api", rating_routes())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn run() -> AppResult<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    init_logger();

    let config = Config::load()?;

    let db = Arc::new(Database::connect(&config.database)?);
    {
        let db = db.clone();
        tokio::task::spawn_blocking(move || db.run_migrations()).await??;
    }

    let ratings: Arc<dyn RatingRepository> = Arc::new(RatingRepositoryImpl::new(db.clone()));
    let movies: Arc<dyn MovieRepository> = Arc::new(MovieRepositoryImpl::new(db.clone()));

    let state = AppState::from_repositories(ratings, movies.clone(), config.jwt_secret.as_bytes());

    let reconciler = if config.reconcile.is_enabled() {
        let reconciler = Arc::new(AggregateReconciler::new(
            movies,
            state.rating_service.recomputer(),
            &config.reconcile,
        ));
        let handle = tokio::spawn(reconciler.clone().run());
        Some((reconciler, handle))
    } else {
        crate::log_info!("Aggregate reconciler disabled");
        None
    };

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to bind {}: {}", addr, e)))?;

    crate::log_info!("Listening on {}", addr);

    let served = axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::InternalError(format!("Server error: {}", e)));

    if let Some((reconciler, handle)) = reconciler {
        reconciler.stop().await;
        // The sweep may be sleeping out its interval
        handle.abort();
    }

    crate::log_info!("Server shut down");
    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            crate::log_error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }

        crate::log_info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                crate::log_info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                crate::log_error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
