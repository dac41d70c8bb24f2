//! captiond - Caption relay daemon
//!
//! Accepts `POST /caption` uploads and forwards the image bytes to a cloud
//! vision endpoint, relaying its JSON answer.

pub mod config;

use std::sync::Arc;

use anyhow::Context;
use caption_api::{create_router, AppState};
use caption_upstream::UpstreamBackend;

use crate::config::RelayConfig;

/// Build the relay router for a resolved configuration
pub fn build_app(config: &RelayConfig) -> anyhow::Result<axum::Router> {
    let backend =
        UpstreamBackend::new(config.upstream.clone()).context("Failed to create upstream backend")?;

    let mut state = AppState::new(Arc::new(backend));
    if let Some(limit) = config.max_upload_bytes {
        state = state.with_max_upload_bytes(limit);
    }

    Ok(create_router(state))
}
