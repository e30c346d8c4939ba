//! Share token rejection reasons.

/// Why a share token could not be produced or read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShareError {
    /// Token is not base64 (either alphabet)
    #[error("invalid base64: {0}")]
    Base64(String),

    /// Decoded bytes are not UTF-8 text
    #[error("token is not UTF-8 text")]
    Utf8,

    /// Payload is not a well-formed snapshot
    #[error("invalid share payload: {0}")]
    Json(String),

    /// Version this decoder does not implement
    #[error("unsupported share version {0}")]
    UnsupportedVersion(u32),

    /// Coordinates that JSON cannot carry
    #[error("traveler {0} has a non-finite position")]
    NonFinitePosition(usize),
}
