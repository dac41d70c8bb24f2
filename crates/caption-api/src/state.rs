//! Application state for the relay API

use std::sync::Arc;

use caption_core::CaptionBackend;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    backend: Arc<dyn CaptionBackend>,
    /// Upload size cap; `None` leaves request bodies unbounded
    max_upload_bytes: Option<usize>,
}

impl AppState {
    /// Create a new AppState around a backend, without an upload limit
    pub fn new(backend: Arc<dyn CaptionBackend>) -> Self {
        Self {
            backend,
            max_upload_bytes: None,
        }
    }

    /// Cap inbound request bodies at `limit` bytes
    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.max_upload_bytes = Some(limit);
        self
    }

    pub fn backend(&self) -> &Arc<dyn CaptionBackend> {
        &self.backend
    }

    pub fn max_upload_bytes(&self) -> Option<usize> {
        self.max_upload_bytes
    }
}
