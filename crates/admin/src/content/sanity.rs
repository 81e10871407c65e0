//! Sanity HTTP API client.
//!
//! Talks to the two Sanity endpoints the admin needs:
//!
//! - `GET  /v{version}/data/query/{dataset}` - GROQ queries, parameters
//!   passed as `$name` query-string entries holding JSON values
//! - `POST /v{version}/data/mutate/{dataset}` - transactions; the admin only
//!   ever sends a single `createOrReplace` mutation

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::instrument;
use url::Url;

use catalog_panel_core::{Document, DocumentId};

use super::{ContentStore, ContentStoreError};
use crate::config::SanityConfig;

/// Point query: the first document of a type with a given ID.
const FIND_BY_ID_QUERY: &str = "*[_type == $type && _id == $id][0]";

/// All documents of a type, most recently edited first.
const LIST_BY_TYPE_QUERY: &str = "*[_type == $type] | order(_updatedAt desc)";

/// Sanity content store client.
///
/// Cheaply cloneable; all clones share one connection pool.
#[derive(Clone)]
pub struct SanityClient {
    inner: Arc<SanityClientInner>,
}

struct SanityClientInner {
    client: reqwest::Client,
    query_url: Url,
    mutate_url: Url,
    token: SecretString,
}

/// Response body of the query endpoint.
#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: Option<T>,
}

/// Response body of the mutate endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MutationResponse {
    transaction_id: String,
    #[serde(default)]
    results: Vec<MutationResult>,
}

#[derive(Debug, Deserialize)]
struct MutationResult {
    id: String,
    #[serde(default)]
    operation: Option<String>,
    #[serde(default)]
    document: Option<Document>,
}

impl SanityClient {
    /// Create a new client for the configured project and dataset.
    ///
    /// # Errors
    ///
    /// Returns `ContentStoreError::Url` if the endpoint URLs cannot be built
    /// and `ContentStoreError::Http` if the HTTP client cannot be created.
    pub fn new(config: &SanityConfig) -> Result<Self, ContentStoreError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("catalog-panel-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let data_root =
            directory_url(&config.api_host).join(&format!("v{}/data/", config.api_version))?;
        let query_url = data_root.join(&format!("query/{}", config.dataset))?;
        let mut mutate_url = data_root.join(&format!("mutate/{}", config.dataset))?;
        mutate_url
            .query_pairs_mut()
            .append_pair("returnDocuments", "true")
            .append_pair("visibility", "sync");

        Ok(Self {
            inner: Arc::new(SanityClientInner {
                client,
                query_url,
                mutate_url,
                token: config.token.clone(),
            }),
        })
    }

    /// Run a GROQ query and return its result.
    ///
    /// Each parameter is sent as `$name` with a JSON-encoded value. A `null`
    /// result (e.g. a `[0]` slice over no matches) comes back as `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `ContentStoreError::Api` for non-success statuses, and
    /// `Http`/`Parse` for transport and decoding failures.
    #[instrument(skip(self, params))]
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        query: &str,
        params: &[(&str, Value)],
    ) -> Result<Option<T>, ContentStoreError> {
        let mut url = self.inner.query_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", query);
            for (name, value) in params {
                pairs.append_pair(&format!("${name}"), &value.to_string());
            }
        }

        let response = self
            .inner
            .client
            .get(url)
            .bearer_auth(self.inner.token.expose_secret())
            .send()
            .await?;

        let body: QueryResponse<T> = read_json(response).await?;
        Ok(body.result)
    }

    /// Create the document, or replace it if a document with its ID exists.
    ///
    /// Returns the stored document as echoed by Sanity, falling back to the
    /// submitted document when the response omits it.
    ///
    /// # Errors
    ///
    /// Returns `ContentStoreError::Api` for non-success statuses, and
    /// `Http`/`Parse` for transport and decoding failures.
    #[instrument(skip(self, document), fields(document_id = %document.id))]
    pub async fn create_or_replace(&self, document: &Document) -> Result<Document, ContentStoreError> {
        let body = json!({
            "mutations": [{ "createOrReplace": document }],
        });

        let response = self
            .inner
            .client
            .post(self.inner.mutate_url.clone())
            .bearer_auth(self.inner.token.expose_secret())
            .json(&body)
            .send()
            .await?;

        let body: MutationResponse = read_json(response).await?;
        let result = body.results.into_iter().next();

        tracing::info!(
            transaction_id = %body.transaction_id,
            operation = result.as_ref().and_then(|r| r.operation.as_deref()).unwrap_or("unknown"),
            "Document written"
        );

        Ok(result
            .and_then(|r| {
                if r.id != document.id.as_str() {
                    tracing::warn!(expected = %document.id, actual = %r.id, "Mutation result ID mismatch");
                }
                r.document
            })
            .unwrap_or_else(|| document.clone()))
    }
}

#[async_trait]
impl ContentStore for SanityClient {
    async fn find_by_id(
        &self,
        doc_type: &str,
        id: &DocumentId,
    ) -> Result<Option<Document>, ContentStoreError> {
        self.fetch(
            FIND_BY_ID_QUERY,
            &[("type", json!(doc_type)), ("id", json!(id.as_str()))],
        )
        .await
    }

    async fn upsert(&self, document: Document) -> Result<Document, ContentStoreError> {
        self.create_or_replace(&document).await
    }

    async fn list(&self, doc_type: &str) -> Result<Vec<Document>, ContentStoreError> {
        let documents: Option<Vec<Document>> = self
            .fetch(LIST_BY_TYPE_QUERY, &[("type", json!(doc_type))])
            .await?;
        Ok(documents.unwrap_or_default())
    }
}

/// Read a JSON body, turning error statuses into `ContentStoreError::Api`.
async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ContentStoreError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        return Err(ContentStoreError::Api {
            status: status.as_u16(),
            message: error_message(&bytes),
        });
    }

    Ok(serde_json::from_slice(&bytes)?)
}

/// Extract the error description from a Sanity error body.
///
/// Sanity uses both `{"error": {"description": ...}}` and
/// `{"error": "...", "message": "..."}` shapes depending on the endpoint.
fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .pointer("/error/description")
        .and_then(Value::as_str)
        .or_else(|| value.get("message").and_then(Value::as_str))
        .or_else(|| value.get("error").and_then(Value::as_str))
        .map(str::to_string)
}

/// Ensure a trailing slash so relative joins keep the host's path prefix.
fn directory_url(url: &Url) -> Url {
    let mut url = url.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(api_host: &str) -> SanityConfig {
        SanityConfig {
            project_id: "abc123".to_string(),
            dataset: "production".to_string(),
            api_version: "2024-01-01".to_string(),
            api_host: Url::parse(api_host).unwrap(),
            token: SecretString::from("skTestToken"),
        }
    }

    #[test]
    fn test_endpoint_urls() {
        let client = SanityClient::new(&config("https://abc123.api.sanity.io")).unwrap();
        assert_eq!(
            client.inner.query_url.as_str(),
            "https://abc123.api.sanity.io/v2024-01-01/data/query/production"
        );
        assert_eq!(
            client.inner.mutate_url.as_str(),
            "https://abc123.api.sanity.io/v2024-01-01/data/mutate/production?returnDocuments=true&visibility=sync"
        );
    }

    #[test]
    fn test_endpoint_urls_keep_host_path() {
        for host in ["https://proxy.example.com/sanity", "https://proxy.example.com/sanity/"] {
            let client = SanityClient::new(&config(host)).unwrap();
            assert_eq!(
                client.inner.query_url.as_str(),
                "https://proxy.example.com/sanity/v2024-01-01/data/query/production"
            );
        }
    }

    #[test]
    fn test_error_message_shapes() {
        let nested = br#"{"error":{"description":"Query is invalid","type":"queryParseError"}}"#;
        assert_eq!(error_message(nested).as_deref(), Some("Query is invalid"));

        let flat = br#"{"statusCode":401,"error":"Unauthorized","message":"Session not found"}"#;
        assert_eq!(error_message(flat).as_deref(), Some("Session not found"));

        let bare = br#"{"error":"Not Found"}"#;
        assert_eq!(error_message(bare).as_deref(), Some("Not Found"));

        assert_eq!(error_message(b"<html>Bad gateway</html>"), None);
        assert_eq!(error_message(br#"{"error":{}}"#), None);
    }

    #[test]
    fn test_mutation_response_parsing() {
        let body: MutationResponse = serde_json::from_str(
            r#"{
                "transactionId": "tx1",
                "results": [{
                    "id": "p1",
                    "operation": "update",
                    "document": {"_id": "p1", "_type": "products", "name": "Widget"}
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(body.transaction_id, "tx1");
        let result = body.results.into_iter().next().unwrap();
        assert_eq!(result.id, "p1");
        assert_eq!(result.operation.as_deref(), Some("update"));
        assert_eq!(result.document.unwrap().text("name"), "Widget");
    }
}
