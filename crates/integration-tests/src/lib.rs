//! Integration tests for Catalog Panel.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p catalog-panel-integration-tests
//! ```
//!
//! Everything runs in-process: the admin router is served on an ephemeral
//! local port over a [`MemoryContentStore`], and the Sanity client is pointed
//! at a local fake of the Sanity HTTP API. No external services are needed.
//!
//! # Test Categories
//!
//! - `admin_auth_gate` - login flag, redirects, logout
//! - `admin_product_editor` - load, validate and save through HTTP
//! - `sanity_client` - wire format of the Sanity client

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::Arc;

use catalog_panel_admin::{
    config::{AdminConfig, SanityConfig},
    content::{ContentStore, MemoryContentStore},
    routes,
    state::AppState,
    telemetry::LogFormat,
};
use reqwest::{Client, StatusCode, redirect};
use secrecy::SecretString;
use tokio::task::JoinHandle;
use url::Url;

/// Passphrase accepted by test servers.
pub const TEST_PASSPHRASE: &str = "kV9#qL2@wX7!mZ4$pR8&";

/// Sanity settings for a project served at `api_host`.
#[must_use]
pub fn sanity_config(api_host: &str) -> SanityConfig {
    SanityConfig {
        project_id: "test123".to_string(),
        dataset: "production".to_string(),
        api_version: "2024-01-01".to_string(),
        api_host: Url::parse(api_host).expect("valid api host"),
        token: SecretString::from("skTestToken"),
    }
}

/// Admin configuration for an in-process test server.
#[must_use]
pub fn test_config() -> AdminConfig {
    AdminConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        log_format: LogFormat::Text,
        base_url: "http://127.0.0.1".to_string(),
        passphrase: SecretString::from(TEST_PASSPHRASE),
        sanity: sanity_config("http://127.0.0.1:9"),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
        tls: None,
    }
}

/// Serve an axum router on an ephemeral local port.
pub async fn spawn_router(router: axum::Router) -> (SocketAddr, JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server error");
    });

    (addr, handle)
}

/// Admin panel running in-process.
pub struct TestServer {
    pub base_url: String,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start the admin panel over a given content store.
    pub async fn start(content: Arc<dyn ContentStore>) -> Self {
        let app = routes::app(AppState::new(test_config(), content));
        let (addr, handle) = spawn_router(app).await;

        Self {
            base_url: format!("http://{addr}"),
            handle,
        }
    }

    /// Start the admin panel over an in-memory store.
    pub async fn with_memory(store: &Arc<MemoryContentStore>) -> Self {
        let content: Arc<dyn ContentStore> = store.clone();
        Self::start(content).await
    }

    /// Absolute URL of a path on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// A fresh visitor: keeps cookies, does not follow redirects.
    #[must_use]
    pub fn visitor(&self) -> Client {
        Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client")
    }

    /// A visitor that has already logged in with the test passphrase.
    pub async fn logged_in_visitor(&self) -> Client {
        let client = self.visitor();
        let resp = client
            .post(self.url("/login"))
            .form(&[("passphrase", TEST_PASSPHRASE)])
            .send()
            .await
            .expect("Failed to log in");

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), Some("/dashboard"));
        client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// The `Location` header of a response, if any.
#[must_use]
pub fn location(resp: &reqwest::Response) -> Option<&str> {
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
}
