//! Entur client error types.

/// Errors from talking to the Entur APIs.
#[derive(Debug, thiserror::Error)]
pub enum EnturError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected schema
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Client identity could not be encoded as a header
    #[error("invalid client header value: {0}")]
    InvalidHeader(String),

    /// Mock data could not be loaded
    #[error("mock data error: {0}")]
    Mock(String),
}

/// Errors while turning a stop document into departures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    /// Timestamp not in `%Y-%m-%dT%H:%M:%S%z` format
    #[error("invalid timestamp {value:?}: {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
