//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_BASE_URL` - Public URL for the admin panel
//! - `ADMIN_PASSPHRASE` - Passphrase accepted by the entry page (high entropy)
//! - `SANITY_PROJECT_ID` - Sanity project ID
//! - `SANITY_API_TOKEN` - Sanity API token with write access to the dataset
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_LOG_FORMAT` - `text` or `json` (default: text)
//! - `SANITY_DATASET` - Dataset name (default: production)
//! - `SANITY_API_VERSION` - Dated API version (default: 2024-01-01)
//! - `SANITY_API_HOST` - API origin, optionally with a path prefix
//!   (default: `https://{project}.api.sanity.io`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 1.0)
//!
//! ## Optional (TLS)
//! - `ADMIN_TLS_CERT` - PEM-encoded certificate chain
//! - `ADMIN_TLS_KEY` - PEM-encoded private key

use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::telemetry::LogFormat;

const MIN_PASSPHRASE_LENGTH: usize = 16;
const MIN_PASSPHRASE_DISTINCT_CHARS: usize = 10;
const MIN_SANITY_TOKEN_LENGTH: usize = 32;
const DEFAULT_SANITY_DATASET: &str = "production";
const DEFAULT_SANITY_API_VERSION: &str = "2024-01-01";

/// Fragments of sample passphrases from docs and `.env` templates
/// (case-insensitive).
const PASSPHRASE_PLACEHOLDERS: &[&str] = &[
    "changeme",
    "passphrase",
    "password",
    "letmein",
    "admin",
    "catalog",
    "your-",
    "example",
];

/// Fragments of sample Sanity tokens (case-insensitive). Real tokens are
/// long random alphanumerics.
const SANITY_TOKEN_PLACEHOLDERS: &[&str] = &["your-", "sanity", "token", "replace", "example", "<"];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Stdout log format
    pub log_format: LogFormat,
    /// Public base URL for the admin panel
    pub base_url: String,
    /// Passphrase accepted by the entry page
    pub passphrase: SecretString,
    /// Sanity content store configuration
    pub sanity: SanityConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// TLS configuration for HTTPS (optional)
    pub tls: Option<TlsConfig>,
}

/// Sanity content store configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct SanityConfig {
    /// Sanity project ID
    pub project_id: String,
    /// Dataset holding the product documents
    pub dataset: String,
    /// Dated API version (e.g., 2024-01-01)
    pub api_version: String,
    /// API origin; queries and mutations are sent below this URL
    pub api_host: Url,
    /// API token (write access to the dataset)
    pub token: SecretString,
}

impl std::fmt::Debug for SanityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanityConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .field("api_host", &self.api_host.as_str())
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl SanityConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let project_id = get_required_env("SANITY_PROJECT_ID")?;
        if project_id.is_empty()
            || !project_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(ConfigError::InvalidEnvVar(
                "SANITY_PROJECT_ID".to_string(),
                "must contain only letters, digits and dashes".to_string(),
            ));
        }

        let api_host = get_optional_env("SANITY_API_HOST")
            .unwrap_or_else(|| format!("https://{project_id}.api.sanity.io"));
        let api_host = Url::parse(&api_host)
            .map_err(|e| ConfigError::InvalidEnvVar("SANITY_API_HOST".to_string(), e.to_string()))?;

        let api_version = get_env_or_default("SANITY_API_VERSION", DEFAULT_SANITY_API_VERSION);
        validate_api_version(&api_version)?;

        Ok(Self {
            project_id,
            dataset: get_env_or_default("SANITY_DATASET", DEFAULT_SANITY_DATASET),
            api_version,
            api_host,
            token: get_secret("SANITY_API_TOKEN", SecretKind::SanityToken)?,
        })
    }
}

/// TLS configuration for HTTPS.
#[derive(Clone)]
pub struct TlsConfig {
    /// PEM-encoded certificate chain
    pub cert_pem: String,
    /// PEM-encoded private key
    pub key_pem: SecretString,
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("cert_pem", &"[CERTIFICATE]")
            .field("key_pem", &"[REDACTED]")
            .finish()
    }
}

impl TlsConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let cert_pem = get_optional_env("ADMIN_TLS_CERT");
        let key_pem = get_optional_env("ADMIN_TLS_KEY");

        match (cert_pem, key_pem) {
            (Some(cert), Some(key)) => Ok(Some(Self {
                cert_pem: cert,
                key_pem: SecretString::from(key),
            })),
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "ADMIN_TLS_*".to_string(),
                "Both ADMIN_TLS_CERT and ADMIN_TLS_KEY must be set together".to_string(),
            )),
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the passphrase or API token looks like a sample value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;
        let log_format = match get_optional_env("ADMIN_LOG_FORMAT") {
            Some(name) => LogFormat::from_name(&name).ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "ADMIN_LOG_FORMAT".to_string(),
                    format!("expected 'text' or 'json', got '{name}'"),
                )
            })?,
            None => LogFormat::default(),
        };
        let base_url = get_required_env("ADMIN_BASE_URL")?;
        let passphrase = get_secret("ADMIN_PASSPHRASE", SecretKind::Passphrase)?;

        let sanity = SanityConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let tls = TlsConfig::from_env()?;

        Ok(Self {
            host,
            port,
            log_format,
            base_url,
            passphrase,
            sanity,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
            tls,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns `true` when the panel is served over HTTPS.
    ///
    /// Controls the `Secure` attribute of the session cookie.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// Returns a reference to the Sanity configuration.
    #[must_use]
    pub const fn sanity(&self) -> &SanityConfig {
        &self.sanity
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate a dated Sanity API version (`YYYY-MM-DD`).
fn validate_api_version(version: &str) -> Result<(), ConfigError> {
    chrono::NaiveDate::parse_from_str(version, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidEnvVar("SANITY_API_VERSION".to_string(), e.to_string()))
}

/// Secrets read from the environment, each with its own rules.
#[derive(Debug, Clone, Copy)]
enum SecretKind {
    /// Shared passphrase typed on the entry page.
    Passphrase,
    /// Sanity API token with write access.
    SanityToken,
}

impl SecretKind {
    const fn placeholders(self) -> &'static [&'static str] {
        match self {
            Self::Passphrase => PASSPHRASE_PLACEHOLDERS,
            Self::SanityToken => SANITY_TOKEN_PLACEHOLDERS,
        }
    }

    /// Returns the reason the value is rejected, if any.
    fn check(self, value: &str) -> Result<(), String> {
        let lower = value.to_lowercase();
        if let Some(pattern) = self
            .placeholders()
            .iter()
            .copied()
            .find(|pattern| lower.contains(*pattern))
        {
            return Err(format!("looks like a sample value (contains '{pattern}')"));
        }

        match self {
            Self::Passphrase => {
                let length = value.chars().count();
                if length < MIN_PASSPHRASE_LENGTH {
                    return Err(format!(
                        "must be at least {MIN_PASSPHRASE_LENGTH} characters (got {length})"
                    ));
                }
                let distinct = value.chars().collect::<HashSet<_>>().len();
                if distinct < MIN_PASSPHRASE_DISTINCT_CHARS {
                    return Err(format!(
                        "uses only {distinct} distinct characters, need {MIN_PASSPHRASE_DISTINCT_CHARS}"
                    ));
                }
            }
            Self::SanityToken => {
                if value.chars().any(char::is_whitespace) {
                    return Err("must not contain whitespace".to_string());
                }
                if value.len() < MIN_SANITY_TOKEN_LENGTH {
                    return Err(format!(
                        "must be at least {MIN_SANITY_TOKEN_LENGTH} characters (got {})",
                        value.len()
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Load a secret from the environment and check it against its kind.
fn get_secret(key: &str, kind: SecretKind) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    kind.check(&value)
        .map_err(|reason| ConfigError::InsecureSecret(key.to_string(), reason))?;
    Ok(SecretString::from(value))
}
