//! Integration tests for the product editor and product list.
//!
//! Drives the editor through HTTP the way a browser does: load the
//! placeholder, fetch the form fragment, post the form.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use catalog_panel_admin::content::MemoryContentStore;
use catalog_panel_core::{Document, DocumentId, PRODUCT_DOCUMENT_TYPE};
use catalog_panel_integration_tests::{TestServer, location};
use reqwest::{Client, StatusCode};
use serde_json::json;

fn widget() -> Document {
    Document::new(DocumentId::new("p1"), PRODUCT_DOCUMENT_TYPE)
        .with_field("name", "Widget")
        .with_field("title", "Widget Pro")
        .with_field("slug", "widget-pro")
        .with_field("price", 19.99)
        .with_field("description", "A fine widget")
        .with_field("category", "tools")
}

fn valid_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Widget"),
        ("title", "Widget Max"),
        ("slug", "widget-max"),
        ("price", "24.5"),
        ("category", "tools"),
        ("description", "Bigger"),
    ]
}

async fn logged_in(store: &Arc<MemoryContentStore>) -> (TestServer, Client) {
    let server = TestServer::with_memory(store).await;
    let client = server.logged_in_visitor().await;
    (server, client)
}

async fn get_text(client: &Client, url: String) -> (StatusCode, String) {
    let resp = client.get(url).send().await.unwrap();
    (resp.status(), resp.text().await.unwrap())
}

// ============================================================================
// Load
// ============================================================================

#[tokio::test]
async fn test_edit_page_shows_loading_placeholder() {
    let store = Arc::new(MemoryContentStore::with_documents([widget()]));
    let (server, client) = logged_in(&store).await;

    let (status, body) = get_text(&client, server.url("/product/edit/p1")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Please Wait, Product is Loading..."));
    assert!(body.contains(r#"hx-get="/product/edit/p1/form""#));

    // The placeholder does not touch the store
    assert_eq!(store.find_calls(), 0);
}

#[tokio::test]
async fn test_form_fragment_loads_product() {
    let store = Arc::new(MemoryContentStore::with_documents([widget()]));
    let (server, client) = logged_in(&store).await;

    let (status, body) = get_text(&client, server.url("/product/edit/p1/form")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Edit Product"));
    assert!(body.contains(r#"value="Widget Pro""#));
    assert!(body.contains(r#"value="19.99""#));
    assert!(body.contains("A fine widget"));
    assert!(body.contains(r#"placeholder="Product Slug""#));
    assert!(body.contains("Update Product"));
    assert_eq!(store.find_calls(), 1);
}

#[tokio::test]
async fn test_form_fragment_defaults_missing_fields() {
    let store = Arc::new(MemoryContentStore::with_documents([Document::new(
        DocumentId::new("p2"),
        PRODUCT_DOCUMENT_TYPE,
    )
    .with_field("name", "Bare")
    .with_field("price", "19.99")]));
    let (server, client) = logged_in(&store).await;

    let (status, body) = get_text(&client, server.url("/product/edit/p2/form")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"value="Bare""#));
    assert!(body.contains(r#"name="title" value="""#));
    // String price loads as a number
    assert!(body.contains(r#"value="19.99""#));
}

#[tokio::test]
async fn test_missing_product_shows_only_message() {
    let store = Arc::new(MemoryContentStore::new());
    let (server, client) = logged_in(&store).await;

    let (status, body) = get_text(&client, server.url("/product/edit/nope/form")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Product not found."));
    assert!(!body.contains("<form"));
    assert!(!body.contains("Logout"));
}

#[tokio::test]
async fn test_store_failure_messages() {
    let store = Arc::new(MemoryContentStore::with_documents([widget()]));
    let (server, client) = logged_in(&store).await;

    store.fail_with(500, Some("Dataset not found")).await;
    let (_, body) = get_text(&client, server.url("/product/edit/p1/form")).await;
    assert!(body.contains("Error fetching product data: Dataset not found"));
    assert!(!body.contains("<form"));

    store.fail_with(500, None).await;
    let (_, body) = get_text(&client, server.url("/product/edit/p1/form")).await;
    assert!(body.contains("An unknown error occurred while fetching product data."));
}

// ============================================================================
// Submit
// ============================================================================

#[tokio::test]
async fn test_valid_submit_saves_and_redirects() {
    let store = Arc::new(MemoryContentStore::with_documents([widget()]));
    let (server, client) = logged_in(&store).await;

    let resp = client
        .post(server.url("/product/edit/p1"))
        .form(&valid_form())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/product"));
    assert_eq!(store.find_calls(), 1);
    assert_eq!(store.upsert_calls(), 1);

    let stored = store.get(&DocumentId::new("p1")).await.unwrap();
    assert_eq!(stored.doc_type, "products");
    assert_eq!(stored.text("title"), "Widget Max");
    assert_eq!(stored.get("price"), Some(&json!(24.5)));
    assert_eq!(stored.text("description"), "Bigger");
}

#[tokio::test]
async fn test_notice_shown_once_after_save() {
    let store = Arc::new(MemoryContentStore::with_documents([widget()]));
    let (server, client) = logged_in(&store).await;

    client
        .post(server.url("/product/edit/p1"))
        .form(&valid_form())
        .send()
        .await
        .unwrap();

    let (status, body) = get_text(&client, server.url("/product")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Product updated successfully!"));
    assert!(body.contains("Widget Max"));
    assert!(body.contains("$24.50"));

    let (_, body) = get_text(&client, server.url("/product")).await;
    assert!(!body.contains("Product updated successfully!"));
}

#[tokio::test]
async fn test_only_price_missing() {
    let store = Arc::new(MemoryContentStore::with_documents([widget()]));
    let (server, client) = logged_in(&store).await;

    let mut form = valid_form();
    form[3] = ("price", "abc");

    let resp = client
        .post(server.url("/product/edit/p1"))
        .form(&form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    assert_eq!(body.matches("is required.").count(), 1);
    assert!(body.contains("Price is required."));
    // The rest of the form is kept
    assert!(body.contains(r#"value="Widget Max""#));
    assert_eq!(store.upsert_calls(), 0);
}

#[tokio::test]
async fn test_empty_submit_lists_every_required_field() {
    let store = Arc::new(MemoryContentStore::with_documents([widget()]));
    let (server, client) = logged_in(&store).await;

    let resp = client
        .post(server.url("/product/edit/p1"))
        .form(&[("description", "only this")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    for message in [
        "Name is required.",
        "Title is required.",
        "Slug is required.",
        "Price is required.",
        "Category is required.",
    ] {
        assert!(body.contains(message), "missing {message}");
    }
    assert!(!body.contains("Description is required."));
    assert_eq!(store.upsert_calls(), 0);

    // Stored record untouched
    let stored = store.get(&DocumentId::new("p1")).await.unwrap();
    assert_eq!(stored.text("name"), "Widget");
}

#[tokio::test]
async fn test_failed_submit_keeps_form() {
    let store = Arc::new(MemoryContentStore::with_documents([widget()]));
    let (server, client) = logged_in(&store).await;
    store.fail_writes_with(503, Some("Service unavailable")).await;

    let resp = client
        .post(server.url("/product/edit/p1"))
        .form(&valid_form())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Error updating the product."));
    assert!(body.contains(r#"value="Widget Max""#));
    assert!(body.contains(r#"value="24.5""#));
    assert_eq!(store.upsert_calls(), 1);
}

#[tokio::test]
async fn test_submit_for_unknown_product_writes_nothing() {
    let store = Arc::new(MemoryContentStore::with_documents([widget()]));
    let (server, client) = logged_in(&store).await;

    let (_, body) = get_text(&client, server.url("/product/edit/ghost/form")).await;
    assert!(body.contains("Product not found."));

    let resp = client
        .post(server.url("/product/edit/ghost"))
        .form(&valid_form())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Product not found."));
    assert!(!body.contains("<form"));
    assert_eq!(store.upsert_calls(), 0);
    assert!(store.get(&DocumentId::new("ghost")).await.is_none());
}

#[tokio::test]
async fn test_submit_when_reload_fails_writes_nothing() {
    let store = Arc::new(MemoryContentStore::with_documents([widget()]));
    let (server, client) = logged_in(&store).await;
    store.fail_with(500, Some("Dataset not found")).await;

    let resp = client
        .post(server.url("/product/edit/p1"))
        .form(&valid_form())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Error fetching product data: Dataset not found"));
    assert_eq!(store.upsert_calls(), 0);
}

// ============================================================================
// Product List
// ============================================================================

#[tokio::test]
async fn test_product_list() {
    let store = Arc::new(MemoryContentStore::with_documents([
        widget(),
        Document::new(DocumentId::new("post1"), "posts").with_field("name", "Not a product"),
    ]));
    let (server, client) = logged_in(&store).await;

    let (status, body) = get_text(&client, server.url("/product")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Widget Pro"));
    assert!(body.contains("$19.99"));
    assert!(body.contains(r#"href="/product/edit/p1""#));
    assert!(!body.contains("Not a product"));
}

#[tokio::test]
async fn test_product_list_store_failure() {
    let store = Arc::new(MemoryContentStore::with_documents([widget()]));
    let (server, client) = logged_in(&store).await;
    store.fail_with(500, None).await;

    let (status, body) = get_text(&client, server.url("/product")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("Error fetching products."));
}
