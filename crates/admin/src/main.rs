//! Catalog Panel admin binary.
//!
//! Loads configuration, starts logging and error tracking, connects the
//! Sanity content store and serves the panel (default port 3001) until
//! Ctrl+C or SIGTERM. Serves HTTPS when `ADMIN_TLS_CERT`/`ADMIN_TLS_KEY` are
//! set, plain HTTP otherwise.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum_server::{Handle, tls_rustls::RustlsConfig};
use secrecy::ExposeSecret;

use catalog_panel_admin::{
    config::{AdminConfig, TlsConfig},
    content::SanityClient,
    routes,
    state::AppState,
    telemetry,
};

/// Time in-flight requests get to finish after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    // Must run before anything touches TLS, including the Sanity client
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let config = AdminConfig::from_env().expect("Failed to load configuration");

    // Sentry before tracing: the tracing layer binds to the active client
    let sentry_guard = telemetry::init_sentry(&config);
    telemetry::init_tracing(config.log_format);

    let sanity = SanityClient::new(config.sanity()).expect("Failed to create Sanity client");
    tracing::info!(
        project_id = %config.sanity().project_id,
        dataset = %config.sanity().dataset,
        api_version = %config.sanity().api_version,
        error_tracking = sentry_guard.is_some(),
        "Catalog panel starting"
    );

    let addr = config.socket_addr();
    let tls = config.tls.clone();
    let app = telemetry::with_request_telemetry(routes::app(AppState::new(
        config,
        Arc::new(sanity),
    )));

    let served = match tls {
        Some(tls) => serve_https(app, addr, &tls).await,
        None => serve_http(app, addr).await,
    };
    served.expect("Server error");

    tracing::info!("Catalog panel stopped");
}

async fn serve_http(app: Router, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Serving on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn serve_https(app: Router, addr: SocketAddr, tls: &TlsConfig) -> std::io::Result<()> {
    let rustls_config = RustlsConfig::from_pem(
        tls.cert_pem.as_bytes().to_vec(),
        tls.key_pem.expose_secret().as_bytes().to_vec(),
    )
    .await?;

    // axum-server drains through a handle instead of a shutdown future
    let handle = Handle::new();
    tokio::spawn({
        let handle = handle.clone();
        async move {
            shutdown_signal().await;
            handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        }
    });

    tracing::info!("Serving on https://{addr}");
    axum_server::bind_rustls(addr, rustls_config)
        .handle(handle)
        .serve(app.into_make_service())
        .await
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
///
/// A signal that cannot be listened for is logged and never fires.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => tracing::info!("Interrupted, draining requests"),
        () = terminate => tracing::info!("Terminated, draining requests"),
    }
}
