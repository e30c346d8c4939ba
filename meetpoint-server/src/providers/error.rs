//! Provider client error types.

/// Errors from the HTTP provider clients.
///
/// Transport errors are stored as text so the error stays `Clone` and can be
/// shared between cache waiters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Missing, invalid or revoked access token
    #[error("unauthorized: check the provider access token")]
    Unauthorized,

    /// Rate limited by the provider
    #[error("rate limited by provider")]
    RateLimited,

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Response geometry is not a usable polygon
    #[error("unusable geometry: {0}")]
    Geometry(String),

    /// Client lacks a token or has a bad base URL
    #[error("not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Http(err.to_string())
    }
}
