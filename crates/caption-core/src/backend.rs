//! CaptionBackend trait - the seam between the HTTP layer and the upstream

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::BackendResult;

/// A successful upstream answer.
///
/// `body` is the upstream response body exactly as received. Backends only
/// hand out replies whose body has been checked to be JSON.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    /// HTTP status returned by the upstream (always 2xx)
    pub status: u16,
    /// Raw JSON body
    pub body: Bytes,
}

impl UpstreamReply {
    /// Parse the body into a JSON value
    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_slice(&self.body)
    }
}

/// Something that can analyze an image and answer with vendor JSON.
///
/// Implementations must be safe to call concurrently: the HTTP layer shares
/// one backend across every in-flight request.
#[async_trait]
pub trait CaptionBackend: Send + Sync {
    /// Human-readable description of where images are sent (for logs)
    fn describe(&self) -> String;

    /// Forward `image` unmodified and return the upstream reply.
    ///
    /// Exactly one upstream request is made per call. No retries.
    async fn analyze(&self, image: Bytes) -> BackendResult<UpstreamReply>;
}
