//! # Error Types
//!
//! Domain-specific error types for kasir-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kasir-core errors (this file)                                         │
//! │  └── CartError        - Cart invariant / checkout precondition         │
//! │                                                                         │
//! │  kasir-api errors (separate crate)                                     │
//! │  └── ApiError         - Transport / decode / server rejection          │
//! │                                                                         │
//! │  kasir-engine errors (separate crate)                                  │
//! │  └── EngineError      - What the presentation shell sees               │
//! │                                                                         │
//! │  Flow: CartError ──► EngineError ──► Frontend                          │
//! │        ApiError  ──►                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, amounts)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message
//! 5. Never silently clamp - the cashier must be told why nothing happened

use thiserror::Error;

use crate::money::Money;
use crate::types::ProductId;

// =============================================================================
// Cart Error
// =============================================================================

/// Cart invariant violations and checkout precondition failures.
///
/// Every variant leaves the cart exactly as it was: these errors are
/// recoverable in place, the cashier corrects the input and retries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// addItem on a product whose catalog snapshot shows zero stock.
    #[error("{name} is out of stock")]
    OutOfStock { name: String },

    /// Increment would pass the known stock ceiling.
    ///
    /// ## User Workflow
    /// ```text
    /// Click [+] on Teh Botol (qty 1, stock 1)
    ///      │
    ///      ▼
    /// StockExceeded { name: "Teh Botol", stock: 1 }
    ///      │
    ///      ▼
    /// UI shows: "Only 1 Teh Botol in stock" - quantity stays 1
    /// ```
    #[error("only {stock} of {name} in stock")]
    StockExceeded { name: String, stock: i64 },

    /// Increment/decrement addressed a product with no line in the cart.
    #[error("product {product_id} is not in the cart")]
    LineNotFound { product_id: ProductId },

    /// Checkout attempted with no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// Checkout attempted with less cash than the bill.
    #[error("insufficient cash: bill is {required}, tendered {tendered}")]
    InsufficientCash { required: Money, tendered: Money },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CartError.
pub type CartResult<T> = Result<T, CartError>;

// =============================================================================
// Unit Tests
// =============================================================================
