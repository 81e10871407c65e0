//! Integration tests for the admin auth gate.
//!
//! Covers the public entry page, login, logout and the redirects every
//! protected route applies when the login flag is missing.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use catalog_panel_admin::content::MemoryContentStore;
use catalog_panel_integration_tests::{TEST_PASSPHRASE, TestServer, location};
use reqwest::StatusCode;

const PROTECTED_PAGES: [&str; 4] = [
    "/dashboard",
    "/product",
    "/product/edit/p1",
    "/product/edit/p1/form",
];

async fn server() -> (TestServer, Arc<MemoryContentStore>) {
    let store = Arc::new(MemoryContentStore::new());
    (TestServer::with_memory(&store).await, store)
}

// ============================================================================
// Unauthenticated Access
// ============================================================================

#[tokio::test]
async fn test_protected_pages_redirect_to_entry() {
    let (server, store) = server().await;
    let client = server.visitor();

    for path in PROTECTED_PAGES {
        let resp = client.get(server.url(path)).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&resp), Some("/"), "{path}");
        assert!(resp.text().await.unwrap().is_empty(), "{path} rendered content");
    }

    // The editor never loaded anything
    assert_eq!(store.find_calls(), 0);
    assert_eq!(store.list_calls(), 0);
}

#[tokio::test]
async fn test_htmx_fragment_gets_hx_redirect() {
    let (server, store) = server().await;

    let resp = server
        .visitor()
        .get(server.url("/product/edit/p1/form"))
        .header("HX-Request", "true")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("hx-redirect").and_then(|v| v.to_str().ok()),
        Some("/")
    );
    assert!(resp.text().await.unwrap().is_empty());
    assert_eq!(store.find_calls(), 0);
}

#[tokio::test]
async fn test_unauthenticated_submit_writes_nothing() {
    let (server, store) = server().await;

    let resp = server
        .visitor()
        .post(server.url("/product/edit/p1"))
        .form(&[
            ("name", "Widget"),
            ("title", "Widget Pro"),
            ("slug", "widget-pro"),
            ("price", "10"),
            ("category", "tools"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));
    assert_eq!(store.upsert_calls(), 0);
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_entry_page_renders_login_form() {
    let (server, _store) = server().await;

    let resp = server.visitor().get(server.url("/")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.unwrap();
    assert!(body.contains(r#"name="passphrase""#));
    assert!(body.contains(r#"action="/login""#));
}

#[tokio::test]
async fn test_wrong_passphrase_is_rejected() {
    let (server, _store) = server().await;
    let client = server.visitor();

    let resp = client
        .post(server.url("/login"))
        .form(&[("passphrase", "not the passphrase")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.text().await.unwrap().contains("Invalid passphrase."));

    // Still locked out
    let resp = client.get(server.url("/dashboard")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_login_unlocks_protected_pages() {
    let (server, _store) = server().await;
    let client = server.logged_in_visitor().await;

    let resp = client.get(server.url("/dashboard")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.unwrap();
    assert!(body.contains(r#"href="/dashboard""#));
    assert!(body.contains(r#"href="/product""#));
    assert!(body.contains("Logout"));
    assert!(body.contains("card-grid"));
}

#[tokio::test]
async fn test_entry_skips_form_when_logged_in() {
    let (server, _store) = server().await;
    let client = server.logged_in_visitor().await;

    let resp = client.get(server.url("/")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/dashboard"));
}

#[tokio::test]
async fn test_login_is_per_visitor() {
    let (server, _store) = server().await;
    let _logged_in = server.logged_in_visitor().await;

    let resp = server
        .visitor()
        .get(server.url("/dashboard"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn test_logout_clears_flag() {
    let (server, _store) = server().await;
    let client = server.logged_in_visitor().await;

    let resp = client.post(server.url("/logout")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));

    let resp = client.get(server.url("/dashboard")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));
}

#[tokio::test]
async fn test_logout_without_login_redirects() {
    let (server, _store) = server().await;

    let resp = server
        .visitor()
        .post(server.url("/logout"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));
}

#[tokio::test]
async fn test_login_after_logout() {
    let (server, _store) = server().await;
    let client = server.logged_in_visitor().await;
    client.post(server.url("/logout")).send().await.unwrap();

    let resp = client
        .post(server.url("/login"))
        .form(&[("passphrase", TEST_PASSPHRASE)])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = client.get(server.url("/product")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Public Endpoints
// ============================================================================

#[tokio::test]
async fn test_health_and_security_headers() {
    let (server, _store) = server().await;

    let resp = server
        .visitor()
        .get(server.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-frame-options"], "DENY");
    assert_eq!(resp.headers()["x-content-type-options"], "nosniff");
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_stylesheet_is_public() {
    let (server, _store) = server().await;

    let resp = server
        .visitor()
        .get(server.url("/static/admin.css"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
