//! # Engine Error Type
//!
//! What the presentation shell sees when a session operation fails.
//!
//! ## Recovery Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Nothing Here Is Fatal                                │
//! │                                                                         │
//! │  Cart(..)                state unchanged, cashier corrects the input   │
//! │  CheckoutInProgress      wait for the in-flight checkout to resolve    │
//! │  CartLockedDuringCheckout  same - UI should disable mutations anyway   │
//! │  ServerRejected          cart + tender preserved, adjust and retry     │
//! │  Transport               cart + tender preserved, retry as-is          │
//! │                                                                         │
//! │  Worst case the operator retries or manually adjusts the cart.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use kasir_api::ApiError;
use kasir_core::{CartError, ProductId};

// =============================================================================
// Engine Error
// =============================================================================

/// Failure of a [`crate::SaleSession`] operation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A cart invariant or checkout precondition failed (state unchanged).
    #[error(transparent)]
    Cart(#[from] CartError),

    /// A second checkout was attempted while one is in flight.
    #[error("a checkout is already in progress")]
    CheckoutInProgress,

    /// A cart mutation was attempted while a checkout is in flight.
    ///
    /// The presentation layer should disable mutations during checkout,
    /// but the engine rejects them regardless so the eventual success or
    /// failure stays consistent with what was submitted.
    #[error("the cart is locked while a checkout is in progress")]
    CartLockedDuringCheckout,

    /// The server explicitly refused the sale (e.g. stock raced out
    /// between catalog fetch and submission). Message shown verbatim.
    #[error("{message}")]
    ServerRejected { message: String },

    /// Network failure, timeout, or an unexpected response shape.
    #[error("could not reach the server: {reason}")]
    Transport { reason: String },

    /// add_to_cart addressed an id that is not in the loaded catalog.
    #[error("product {product_id} is not in the catalog")]
    UnknownProduct { product_id: ProductId },

    /// The operator entered a negative cash amount.
    #[error("cash tendered cannot be negative")]
    NegativeCashTender,
}

impl EngineError {
    /// Folds an API failure into the engine taxonomy: explicit server
    /// rejections keep their message, everything else (network, timeout,
    /// malformed body) is a transport failure.
    pub(crate) fn from_api(err: ApiError) -> Self {
        match err {
            ApiError::Rejected { message, .. } => EngineError::ServerRejected { message },
            other => EngineError::Transport {
                reason: other.to_string(),
            },
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Unit Tests
// =============================================================================
