//! # kasir-api: REST Collaborator Boundary
//!
//! Typed client for the remote POS API that Kasir POS fronts. All
//! persistence, authentication, and business authority (atomic stock
//! decrement, invoice numbering) live server-side; this crate is the
//! only place the application talks to it.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Remote POS API                                   │
//! │                                                                         │
//! │  GET  /api/products          read-only catalog fetch (no side effects) │
//! │       ──► Vec<ProductDto> ──validated──► Vec<kasir_core::Product>      │
//! │                                                                         │
//! │  POST /api/transactions      finalize one sale (atomic on the server)  │
//! │       SaleRequest { items: [{id, qty}], uang_diberikan }               │
//! │       ──► SaleConfirmation | { message } rejection                     │
//! │                                                                         │
//! │  Both carry `Authorization: Bearer <token>` from an explicit Session.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`client`] - collaborator traits + the reqwest implementation
//! - [`dto`] - wire shapes and their validating mapping into core types
//! - [`session`] - the injected auth session (never ambient global state)
//! - [`error`] - transport/decode/rejection taxonomy

pub mod client;
pub mod dto;
pub mod error;
pub mod session;

pub use client::{CheckoutSubmitter, HttpApiClient, ProductCatalog};
pub use dto::{ProductDto, SaleConfirmation, SaleItem, SaleRequest};
pub use error::{ApiError, ApiResult};
pub use session::Session;
