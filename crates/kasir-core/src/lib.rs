//! # kasir-core: Pure Business Logic for Kasir POS
//!
//! This crate is the **heart** of Kasir POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Presentation Shell (any toolkit)               │   │
//! │  │    Catalog UI ──► Cart UI ──► Cash Input ──► Receipt UI        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kasir-engine (SaleSession)                   │   │
//! │  │    add_to_cart, increment, tender_cash, checkout, reset        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kasir-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │   error   │  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │ CartError │  │   │
//! │  │   │  Receipt  │  │  (Rupiah) │  │ CartLine  │  │  variants │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kasir-api (REST boundary)                    │   │
//! │  │          GET /api/products, POST /api/transactions              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Receipt, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The shopping cart and its stock-bound invariants
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are whole Rupiah (i64) - IDR has
//!    no fractional display unit, so there is nothing to round, ever
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use kasir_core::{Cart, Money, Product, ProductId};
//!
//! let kopi = Product {
//!     id: ProductId::new(1),
//!     name: "Kopi Sachet".to_string(),
//!     unit_price: Money::from_rupiah(2_500),
//!     stock: 12,
//!     image: None,
//! };
//!
//! let mut cart = Cart::new();
//! cart.add_item(&kopi).unwrap();
//! cart.add_item(&kopi).unwrap(); // same product: quantity becomes 2
//!
//! assert_eq!(cart.totals().grand_total, Money::from_rupiah(5_000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use kasir_core::Money` instead of
// `use kasir_core::money::Money`

pub use cart::{Cart, CartLine, CartTotals};
pub use error::CartError;
pub use money::Money;
pub use types::{Product, ProductId, Receipt, ReceiptLine};
