//! Logging and error tracking for the admin binary.
//!
//! Logs go to stdout through `tracing-subscriber`, as text or JSON lines
//! (`ADMIN_LOG_FORMAT`). With a Sentry DSN configured, `error` events are
//! sent to Sentry and `warn`/`info` events ride along as breadcrumbs.
//!
//! Request bodies and cookies never leave the process: the body of
//! `POST /login` is the passphrase, and the cookie is the login session.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use sentry::integrations::tracing::{self as sentry_tracing, EventFilter};
use sentry::protocol::Event;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::{Level, Span};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AdminConfig;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "catalog_panel_admin=info,tower_http=info";

/// Output format of the stdout log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One flattened JSON object per event.
    Json,
}

impl LogFormat {
    /// Parse `text` or `json` (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Start the Sentry client when a DSN is configured.
///
/// The returned guard flushes pending events on drop; keep it alive for the
/// lifetime of the process.
#[must_use]
pub fn init_sentry(config: &AdminConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_deref()?;

    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config.sentry_environment.clone().map(Into::into),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            send_default_pii: false,
            before_send: Some(Arc::new(scrub_request)),
            ..Default::default()
        },
    )))
}

/// Install the global tracing subscriber.
///
/// Call after [`init_sentry`] so the Sentry layer finds the client.
pub fn init_tracing(format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let (json_layer, text_layer) = match format {
        LogFormat::Json => (
            Some(tracing_subscriber::fmt::layer().json().flatten_event(true)),
            None,
        ),
        LogFormat::Text => (None, Some(tracing_subscriber::fmt::layer())),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(
            sentry_tracing::layer().event_filter(|metadata: &tracing::Metadata<'_>| {
                sentry_event_filter(metadata.level())
            }),
        )
        .init();
}

/// Wrap the app with a span per request and the Sentry layers.
///
/// The Sentry layers are outermost so panics and slow requests anywhere in
/// the stack are attributed to the right transaction.
pub fn with_request_telemetry(app: Router) -> Router {
    app.layer(
        TraceLayer::new_for_http()
            .make_span_with(request_span)
            .on_response(record_response),
    )
    .layer(sentry_tower::NewSentryLayer::new_from_top())
    .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Which tracing levels reach Sentry, and how.
fn sentry_event_filter(level: &Level) -> EventFilter {
    match *level {
        Level::ERROR => EventFilter::Event,
        Level::WARN | Level::INFO => EventFilter::Breadcrumb,
        _ => EventFilter::Ignore,
    }
}

/// Drop request bodies and cookies from outgoing Sentry events.
fn scrub_request(mut event: Event<'static>) -> Option<Event<'static>> {
    if let Some(request) = event.request.as_mut() {
        request.data = None;
        request.cookies = None;
        request
            .headers
            .retain(|name, _| !name.eq_ignore_ascii_case("cookie"));
    }
    Some(event)
}

/// Span for one request. The path is logged without the query string.
fn request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "admin_request",
        method = %request.method(),
        path = %request.uri().path(),
        htmx = request.headers().contains_key("hx-request"),
        status = tracing::field::Empty,
        latency_ms = tracing::field::Empty,
    )
}

fn record_response(response: &Response<Body>, latency: Duration, span: &Span) {
    span.record("status", response.status().as_u16());
    span.record(
        "latency_ms",
        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
    );
    DefaultOnResponse::default().on_response(response, latency, span);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{http::StatusCode, routing::get};
    use sentry::protocol::Request as SentryRequest;
    use tower::ServiceExt;

    use super::*;

    #[test]
    fn test_log_format_names() {
        assert_eq!(LogFormat::from_name("json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::from_name(" TEXT "), Some(LogFormat::Text));
        assert_eq!(LogFormat::from_name("yaml"), None);
        assert_eq!(LogFormat::default(), LogFormat::Text);
    }

    #[test]
    fn test_only_errors_become_sentry_events() {
        assert_eq!(
            sentry_event_filter(&Level::ERROR).bits(),
            EventFilter::Event.bits()
        );
        assert_eq!(
            sentry_event_filter(&Level::WARN).bits(),
            EventFilter::Breadcrumb.bits()
        );
        assert_eq!(
            sentry_event_filter(&Level::INFO).bits(),
            EventFilter::Breadcrumb.bits()
        );
        assert_eq!(
            sentry_event_filter(&Level::DEBUG).bits(),
            EventFilter::Ignore.bits()
        );
    }

    #[test]
    fn test_scrub_request_drops_body_and_cookies() {
        let mut request = SentryRequest {
            data: Some("passphrase=kV9%23qL2".to_string()),
            cookies: Some("catalog_panel_session=abc".to_string()),
            method: Some("POST".to_string()),
            ..SentryRequest::default()
        };
        request
            .headers
            .insert("Cookie".to_string(), "catalog_panel_session=abc".to_string());
        request
            .headers
            .insert("HX-Request".to_string(), "true".to_string());

        let event = Event {
            request: Some(request),
            ..Event::default()
        };
        let request = scrub_request(event).unwrap().request.unwrap();

        assert_eq!(request.data, None);
        assert_eq!(request.cookies, None);
        assert_eq!(request.method.as_deref(), Some("POST"));
        assert!(!request.headers.contains_key("Cookie"));
        assert!(request.headers.contains_key("HX-Request"));
    }

    #[tokio::test]
    async fn test_request_telemetry_passes_responses_through() {
        let app = with_request_telemetry(Router::new().route("/ping", get(|| async { "pong" })));

        let response = app
            .oneshot(Request::get("/ping?x=1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
