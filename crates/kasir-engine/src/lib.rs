//! # kasir-engine: Sale Session Orchestration
//!
//! One [`SaleSession`] per operator: it owns the cart and cash tender for
//! the sale in progress, guards against overlapping checkouts, and talks to
//! the remote POS API through the `kasir-api` collaborator traits.
//!
//! ## Checkout State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Checkout State Machine                              │
//! │                                                                         │
//! │            mutations allowed                 mutations REJECTED         │
//! │  ┌──────────────────────────┐      ┌──────────────────────────┐        │
//! │  │          Idle            │      │       InFlight           │        │
//! │  │  add / inc / dec / rm    │      │  (awaiting the server)   │        │
//! │  │  tender_cash / reset     │      │                          │        │
//! │  └────────────┬─────────────┘      └──────┬──────────┬────────┘        │
//! │               │  checkout()               │          │                 │
//! │               └───────────────────────────┘          │                 │
//! │                      ▲                    success    │  failure        │
//! │                      │                  cart+tender  │  cart+tender    │
//! │                      │                   CLEARED     │  PRESERVED      │
//! │                      └───────────────────────────────┘                 │
//! │                                                                         │
//! │  A second checkout() while InFlight fails fast with CheckoutInProgress │
//! │  (no queueing, no dropping). The first call's outcome is unaffected.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`session`] - the SaleSession and its view types
//! - [`error`] - what the presentation shell sees when an operation fails

pub mod error;
pub mod session;

pub use error::EngineError;
pub use session::{CartView, SaleSession};
