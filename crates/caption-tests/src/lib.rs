//! End-to-end tests for the caption relay
//!
//! Every test runs the real relay router and a mock vision upstream on
//! ephemeral local ports, then talks to the relay with a multipart client.
//!
//! ```bash
//! cargo test -p caption-tests
//! ```
//!
//! This module holds the shared fixtures; the tests live in `tests/`.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use caption_api::testing::TestServer;
use caption_api::{create_router, AppState};
use caption_upstream::{UpstreamBackend, UpstreamConfig};
use parking_lot::Mutex;
use url::Url;

/// Key the relay under test is configured with
pub const TEST_KEY: &str = "test-subscription-key";

/// Query the relay under test appends to the upstream URL
pub const ANALYZE_QUERY: &str = "api-version=2023-04-01&features=caption";

/// One request as seen by the mock upstream
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    pub subscription_key: Option<String>,
    pub query: Option<String>,
}

/// What the mock upstream answers with
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Fixed status and body
    Fixed { status: StatusCode, body: String },
    /// 200 with `{"captionResult":{"text":<request body as text>}}`
    Echo,
}

impl MockReply {
    pub fn ok(body: &str) -> Self {
        MockReply::Fixed {
            status: StatusCode::OK,
            body: body.to_string(),
        }
    }

    pub fn status(status: StatusCode, body: &str) -> Self {
        MockReply::Fixed {
            status,
            body: body.to_string(),
        }
    }
}

#[derive(Clone)]
struct MockState {
    reply: MockReply,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Stand-in for the vision API
pub struct MockUpstream {
    server: TestServer,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockUpstream {
    pub async fn start(reply: MockReply) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            reply,
            requests: requests.clone(),
        };

        let router = Router::new()
            .route("/vision/analyze", post(mock_analyze))
            .with_state(state);

        let server = TestServer::start(router)
            .await
            .expect("failed to start mock upstream");

        Self { server, requests }
    }

    /// Analyze endpoint, query string included
    pub fn analyze_url(&self) -> Url {
        Url::parse(&self.server.url(&format!("/vision/analyze?{}", ANALYZE_QUERY)))
            .expect("valid mock URL")
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }
}

async fn mock_analyze(
    State(state): State<MockState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    state.requests.lock().push(RecordedRequest {
        body: body.to_vec(),
        content_type: header("content-type"),
        subscription_key: header("ocp-apim-subscription-key"),
        query: uri.query().map(str::to_string),
    });

    match state.reply {
        MockReply::Fixed { status, body } => (status, body),
        MockReply::Echo => {
            // Stagger replies so concurrent requests complete out of order
            let delay = (body.len() % 5) as u64 * 15;
            tokio::time::sleep(Duration::from_millis(delay)).await;
            let text = String::from_utf8_lossy(&body).into_owned();
            (
                StatusCode::OK,
                serde_json::json!({ "captionResult": { "text": text } }).to_string(),
            )
        }
    }
}

/// Start the relay router pointed at `upstream`
pub async fn start_relay(upstream: Url) -> TestServer {
    let backend = UpstreamBackend::new(UpstreamConfig::new(upstream, TEST_KEY))
        .expect("failed to create upstream backend");
    TestServer::start(create_router(AppState::new(Arc::new(backend))))
        .await
        .expect("failed to start relay")
}

/// Multipart form carrying `data` in the `image` field
pub fn image_form(data: Vec<u8>) -> reqwest::multipart::Form {
    reqwest::multipart::Form::new().part(
        "image",
        reqwest::multipart::Part::bytes(data).file_name("upload.jpg"),
    )
}
