//! Documentation of a course review platform.
//!
//! # General Infrastructure
//! - Students submit a rating and a written review for a course, optionally with difficulty,
//!   workload and professor helpfulness ratings
//! - Course pages fetch every review of the course plus its averages on each visit
//! - Reviews can be marked helpful or reported, both are plain counters
//! - Recommendations come from a recommender behind a trait, currently a static catalog
//!
//!
//!
//! # Endpoints
//!
//! | Method | Path | Body | Response |
//! |---|---|---|---|
//! | GET | `/api/reviews?courseCode=..` | | `{reviews, averageRating, totalReviews}` |
//! | POST | `/api/reviews` | submission | `201 {success, reviewId}` |
//! | PUT | `/api/reviews/{id}/helpful` | | `{success, helpfulVotes, totalVotes}` |
//! | PUT | `/api/reviews/{id}/report` | | `{success, message}` |
//! | GET | `/api/courses/{courseCode}/stats` | | `{courseCode, totalReviews, averageRating, ..}` |
//! | POST | `/api/recommendations` | student profile | `{recommendations}` |
//!
//! Errors are `{error}` JSON bodies. Store failures add `{details}` with the underlying message.
//! Any other method on a known path answers `405 {"error": "Method not allowed"}`.
//!
//!
//!
//! # Notes
//!
//! ## Redis
//! Every operation is a single filter, insert or counter bump. Redis gives atomic increments
//! through Lua scripts and a sorted set per course keeps the most helpful reviews first, so
//! there is no need for a heavier document database. See [`database`] for the key layout.
//!
//! Stats are never cached. A read racing a vote may or may not see it, which is fine for
//! this use case.
//!
//! ## Shared rules
//! Validation, normalization and aggregation live in the `reviews` crate. The server and the
//! `client` crate both call into it so the two sides cannot drift apart.
//!
//!
//!
//! # Setup
//!
//! Run against an in-memory store.
//! ```sh
//! STORE_BACKEND=memory RUST_LOG=info cargo run -p courses
//! ```
//!
//! Run against Redis.
//! ```sh
//! REDIS_URL=redis://localhost:6379 RUST_LOG=info cargo run -p courses
//! ```
//!
//! Extra request logging.
//! ```sh
//! cargo run -p courses --features verbose
//! ```
//!
//! | Variable | Default |
//! |---|---|
//! | `RUST_PORT` | `1111` |
//! | `STORE_BACKEND` | `redis` |
//! | `REDIS_URL` | `redis://redis:6379` |
//! | `REDIS_KEY_PREFIX` | `courses` |
//! | `REDIS_RETRIES` | `1` |
//! | `REDIS_TIMEOUT_MS` | `100` |
//!
//! The Redis password, if any, is read from the `REDIS_PASSWORD` docker secret.
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post, put},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod memory;
pub mod recommend;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;

use routes::{
    helpful_handler, method_not_allowed, recommendations_handler, report_handler,
    reviews_handler, stats_handler, submit_handler,
};
use state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route(
            "/api/reviews",
            get(reviews_handler)
                .post(submit_handler)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/reviews/{id}/helpful",
            put(helpful_handler).fallback(method_not_allowed),
        )
        .route(
            "/api/reviews/{id}/report",
            put(report_handler).fallback(method_not_allowed),
        )
        .route(
            "/api/courses/{course_code}/stats",
            get(stats_handler).fallback(method_not_allowed),
        )
        .route(
            "/api/recommendations",
            post(recommendations_handler).fallback(method_not_allowed),
        )
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    let app = build_router(state);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to listen for Ctrl+C: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install terminate handler: {e}");
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
