//! caption-api - HTTP API layer for the caption relay
//!
//! Serves `POST /caption`: the uploaded `image` field is handed to a
//! `CaptionBackend` and the upstream JSON is relayed back unchanged.
//!
//! # Usage
//!
//! ```ignore
//! use caption_api::{create_router, AppState};
//! use caption_upstream::{UpstreamBackend, UpstreamConfig};
//!
//! let backend = UpstreamBackend::new(config)?;
//! let state = AppState::new(Arc::new(backend));
//! let router = create_router(state);
//! ```

pub mod error;
pub mod handlers;
pub mod state;
pub mod testing;

pub use error::ApiError;
pub use state::AppState;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the relay router with the given application state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = match state.max_upload_bytes() {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        // Health check
        .route("/health", get(|| async { "OK" }))
        .route("/caption", post(handlers::caption::caption))
        // Middleware
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
