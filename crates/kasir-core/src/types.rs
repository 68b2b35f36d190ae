//! # Domain Types
//!
//! Core domain types used throughout Kasir POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Receipt      │   │  ReceiptLine    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  invoice_code   │   │  name (frozen)  │       │
//! │  │  name           │   │  timestamp      │   │  quantity       │       │
//! │  │  unit_price     │   │  total          │   │  unit_price     │       │
//! │  │  stock          │   │  cash_tendered  │   │  line_total     │       │
//! │  │  image          │   │  change         │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Product is a READ-ONLY catalog snapshot sourced from the server.      │
//! │  Receipt is IMMUTABLE once produced - display/print only.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Semantics
//! `Product.stock` is the sellable quantity at the moment the catalog was
//! fetched. The cart treats it as a ceiling hint; the server remains the
//! source of truth at submission time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product Id
// =============================================================================

/// Server-assigned product identifier.
///
/// ## Why a Newtype?
/// The catalog API hands out plain integer ids. Wrapping them keeps product
/// ids from being confused with quantities or amounts in call sites.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct ProductId(i64);

impl ProductId {
    #[inline]
    pub const fn new(id: i64) -> Self {
        ProductId(id)
    }

    #[inline]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale, as last fetched from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier (stable, comparable for equality).
    pub id: ProductId,

    /// Display name shown to the cashier and on the receipt.
    pub name: String,

    /// Selling price per unit, whole Rupiah.
    pub unit_price: Money,

    /// Sellable quantity at the moment the catalog was fetched.
    pub stock: i64,

    /// Optional image reference (server storage path).
    pub image: Option<String>,
}

impl Product {
    /// Checks if at least one unit can be added to a cart.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// A finalized sale, produced once checkout succeeds.
///
/// Uses the snapshot pattern: names and unit prices are the cart's frozen
/// copies from the time of sale, not live catalog lookups. The server
/// confirmation may only echo identifiers and totals, so the local snapshot
/// is what makes the receipt printable.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Receipt {
    /// Invoice/transaction code assigned by the server.
    pub invoice_code: String,

    /// When the sale was recorded.
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,

    /// What was sold, with prices at sale time.
    pub lines: Vec<ReceiptLine>,

    /// Grand total of all line totals.
    pub total: Money,

    /// Cash the customer handed over.
    pub cash_tendered: Money,

    /// Cash returned to the customer (`cash_tendered - total`, >= 0).
    pub change: Money,
}

/// A line item on a receipt.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReceiptLine {
    /// Product name at time of sale (frozen).
    pub name: String,
    /// Quantity sold.
    pub quantity: i64,
    /// Unit price at time of sale (frozen).
    pub unit_price: Money,
    /// `quantity × unit_price`.
    pub line_total: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_display() {
        assert_eq!(ProductId::new(42).to_string(), "42");
        assert_eq!(ProductId::new(42).value(), 42);
    }

    #[test]
    fn test_in_stock() {
        let mut product = Product {
            id: ProductId::new(1),
            name: "Teh Botol".to_string(),
            unit_price: Money::from_rupiah(5_000),
            stock: 3,
            image: None,
        };
        assert!(product.in_stock());

        product.stock = 0;
        assert!(!product.in_stock());
    }
}
