//! Integration tests for the Spark Canvas client.
//!
//! Each test starts a `wiremock` server standing in for the Spark Canvas API
//! and drives a real [`ApiClient`] against it.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p spark-canvas-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session` - Token injection, login/register, persistence
//! - `unauthorized` - 401 cleanup and login redirect
//! - `resources` - Endpoint paths, bodies, and decoding
//! - `transport` - Timeouts, network failures, error messages

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use spark_canvas_client::{ApiClient, ClientConfig, History, LoginRedirect, Session};
use wiremock::MockServer;

/// Login path used by every test client.
pub const LOGIN_PATH: &str = "/login";

/// A mock API server and a client wired to it the way the screens are.
pub struct TestApp {
    pub server: MockServer,
    pub client: ApiClient,
    pub session: Session,
    pub history: Arc<History>,
}

impl TestApp {
    /// Start with the user on `/`.
    pub async fn start() -> Self {
        Self::start_at("/").await
    }

    /// Start with the user on `path`, using an in-memory session.
    pub async fn start_at(path: &str) -> Self {
        Self::start_with(path, Session::in_memory(), |config| config).await
    }

    /// Start with a custom session and configuration.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    pub async fn start_with(
        path: &str,
        session: Session,
        configure: impl FnOnce(ClientConfig) -> ClientConfig,
    ) -> Self {
        let server = MockServer::start().await;
        let history = Arc::new(History::new(path));

        let client = ApiClient::builder(configure(config_for(&server)))
            .session(session.clone())
            .on_unauthorized(LoginRedirect::new(Arc::clone(&history), LOGIN_PATH))
            .build()
            .expect("client builds");

        Self {
            server,
            client,
            session,
            history,
        }
    }

    /// Store a token and profile as if the user had logged in.
    ///
    /// # Panics
    ///
    /// Panics if the session store rejects the write.
    pub fn log_in(&self, token: &str) {
        self.session
            .save(token, &json!({"id": 7, "username": "ada"}))
            .expect("session saves");
    }
}

/// Client configuration pointing at `server`.
///
/// # Panics
///
/// Panics if the mock server URI is not a valid base URL.
#[must_use]
pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::default()
        .with_base_url(&server.uri())
        .expect("mock server URI is a valid base URL")
        .with_timeout(Duration::from_secs(5))
}

/// An image record as the server sends it.
#[must_use]
pub fn image_json(id: i32, uploaded_by: i32) -> Value {
    json!({
        "id": id,
        "url": format!("https://ipfs.io/ipfs/bafy{id}"),
        "caption": format!("image {id}"),
        "tags": ["sunset", "beach"],
        "hearts": 3,
        "uploaded_by": uploaded_by,
        "uploaded_at": "2024-05-01T12:00:00Z"
    })
}
