//! UpstreamBackend - CaptionBackend that forwards images over HTTP

use async_trait::async_trait;
use bytes::Bytes;
use caption_core::{BackendError, BackendResult, CaptionBackend, UpstreamReply};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use url::Url;

use crate::config::{UpstreamConfig, SUBSCRIPTION_KEY_HEADER};

const OCTET_STREAM: &str = "application/octet-stream";

/// Forwards each image to the vision endpoint in a single POST.
///
/// The `reqwest::Client` is built once; its connection pool and the
/// subscription-key default header are shared by all concurrent calls.
pub struct UpstreamBackend {
    client: Client,
    url: Url,
}

impl UpstreamBackend {
    /// Build the backend and its HTTP client.
    ///
    /// Fails if the subscription key is not a valid header value.
    pub fn new(config: UpstreamConfig) -> BackendResult<Self> {
        let mut key = HeaderValue::from_str(&config.subscription_key).map_err(|e| {
            BackendError::Internal(format!("Invalid subscription key header value: {}", e))
        })?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("ocp-apim-subscription-key"), key);

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| BackendError::Internal(format!("Failed to create client: {}", e)))?;

        tracing::info!(
            url = %config.url,
            header = SUBSCRIPTION_KEY_HEADER,
            timeout = ?config.timeout,
            "Upstream backend ready"
        );

        Ok(Self {
            client,
            url: config.url,
        })
    }

    fn map_transport(e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout
        } else {
            BackendError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl CaptionBackend for UpstreamBackend {
    fn describe(&self) -> String {
        // Host and path only: the query string may carry deployment details.
        format!(
            "{}{}",
            self.url.host_str().unwrap_or("<no host>"),
            self.url.path()
        )
    }

    async fn analyze(&self, image: Bytes) -> BackendResult<UpstreamReply> {
        let size = image.len();
        tracing::debug!(upstream = %self.describe(), size, "Forwarding image");

        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, OCTET_STREAM)
            .body(image)
            .send()
            .await
            .map_err(Self::map_transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(Self::map_transport)?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), size, "Upstream rejected image");
            return Err(BackendError::Status {
                status: status.as_u16(),
                details: BackendError::details_from_body(&body),
            });
        }

        if let Err(e) = serde_json::from_slice::<serde::de::IgnoredAny>(&body) {
            return Err(BackendError::MalformedResponse {
                reason: e.to_string(),
                details: BackendError::details_from_body(&body),
            });
        }

        tracing::info!(
            status = status.as_u16(),
            size,
            response_size = body.len(),
            "Upstream analysis complete"
        );

        Ok(UpstreamReply {
            status: status.as_u16(),
            body,
        })
    }
}
