//! # API Error Types
//!
//! Error taxonomy for the REST collaborator boundary.
//!
//! ## Classification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      What Went Wrong Where                              │
//! │                                                                         │
//! │  Transport   network refused / timed out / connection dropped           │
//! │              ──► retryable, the sale was (probably) not recorded        │
//! │                                                                         │
//! │  Decode      server answered 2xx but the body does not match the        │
//! │              wire contract ──► caught HERE, never propagates            │
//! │              undefined/null into cart arithmetic                        │
//! │                                                                         │
//! │  Rejected    server explicitly refused (stock raced out, validation)   │
//! │              ──► message passed through verbatim for display           │
//! │                                                                         │
//! │  A timeout is a Transport failure, never a stock/cash error.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Api Error
// =============================================================================

/// Failure talking to the remote POS API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure: connect error, timeout, dropped connection.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered, but the body does not match the wire contract.
    #[error("malformed response from server: {reason}")]
    Decode { reason: String },

    /// The server explicitly refused the request with a business reason.
    ///
    /// `message` is the server-provided reason, verbatim, for display
    /// (e.g. "Stok tidak mencukupi" when stock raced out under the client).
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The configured base URL is not usable.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// Creates a decode error from any displayable reason.
    pub fn decode(reason: impl Into<String>) -> Self {
        ApiError::Decode {
            reason: reason.into(),
        }
    }

    /// True when the server itself refused the request (business rule),
    /// as opposed to the request never arriving or coming back mangled.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiError::Rejected { .. })
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with ApiError.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================
