use thiserror::Error;

/// Errors returned by the ranking-provider client for a single query.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The provider envelope or task carried a non-success status code.
    #[error("provider error {status_code}: {message}")]
    Api { status_code: i64, message: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid provider base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

/// Scan-level failures. When one of these is returned no summary exists.
///
/// Per-point query failures never surface here; they are recorded in the
/// summary as unranked points.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan center missing: supply coordinates or a business name and location")]
    MissingCenter,

    #[error("no business matching '{business_name}' found near '{location}'")]
    BusinessNotFound {
        business_name: String,
        location: String,
    },

    #[error("invalid scan options: {0}")]
    InvalidOptions(String),

    #[error("business lookup failed: {0}")]
    Lookup(#[source] ProviderError),
}
