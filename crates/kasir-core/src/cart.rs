//! # Cart Module
//!
//! The in-memory shopping cart and its stock-bound invariants.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│   Cash   │────►│ Receipt  │       │
//! │  │  Cart    │     │          │     │  Tender  │     │          │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │        ▲               │                 │                              │
//! │        │          add_item          validate_checkout                   │
//! │        │          increment         (engine submits)                    │
//! │        │          decrement                                             │
//! │        │          remove                                                │
//! │        │               │                                                │
//! │        └────────── clear() ◄──── after success, or explicit cancel     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by product id (adding the same product increments)
//! - Every line's quantity is within `1..=stock` (the snapshot ceiling)
//! - A line is removed explicitly, never by decrementing to zero
//! - Bound violations are reported, NEVER silently clamped

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CartError, CartResult};
use crate::money::Money;
use crate::types::{Product, ProductId, ReceiptLine};

// =============================================================================
// Cart Line
// =============================================================================

/// One product entry within a cart.
///
/// ## Design Notes
/// - `name`, `unit_price`, `stock` are frozen copies of the product at the
///   moment the line was created. The cart displays consistent data and
///   enforces the same ceiling even if the catalog is refetched afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    /// Product this line refers to.
    pub product_id: ProductId,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Unit price at time of adding (frozen).
    /// Critical: the price is locked in when the line is created.
    pub unit_price: Money,

    /// Stock ceiling at time of adding (frozen snapshot, not live).
    pub stock: i64,

    /// Quantity in cart. Invariant: `1 <= quantity <= stock`.
    pub quantity: i64,

    /// When this line was added to the cart.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a new line from a catalog product with quantity 1.
    fn from_product(product: &Product) -> Self {
        CartLine {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.unit_price,
            stock: product.stock,
            quantity: 1,
            added_at: Utc::now(),
        }
    }

    /// Calculates the line total (unit price × quantity). Exact.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Converts this line into a receipt line (the frozen sale record).
    pub fn to_receipt_line(&self) -> ReceiptLine {
        ReceiptLine {
            name: self.name.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price,
            line_total: self.line_total(),
        }
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart totals summary handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    /// Number of distinct lines.
    pub line_count: usize,
    /// Total quantity across all lines.
    pub total_quantity: i64,
    /// Σ(quantity × unit_price) over all lines. Zero for an empty cart.
    pub grand_total: Money,
}

// =============================================================================
// Cart
// =============================================================================

/// The operator's in-progress, unconfirmed selection for one sale.
///
/// An ordered collection of [`CartLine`]s, unique by product id. Created
/// empty when the sales screen opens; cleared after a successful checkout
/// or on explicit cancel.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    /// Lines in insertion order.
    pub lines: Vec<CartLine>,

    /// When the cart was created/last cleared.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds one unit of a product, or increments the existing line.
    ///
    /// ## Behavior
    /// - `stock <= 0`: fails with [`CartError::OutOfStock`], cart unchanged
    /// - already in cart: behaves exactly like [`Cart::increment`]
    /// - otherwise: inserts a new line with quantity 1
    pub fn add_item(&mut self, product: &Product) -> CartResult<()> {
        if !product.in_stock() {
            return Err(CartError::OutOfStock {
                name: product.name.clone(),
            });
        }

        if self.lines.iter().any(|l| l.product_id == product.id) {
            return self.increment(product.id);
        }

        self.lines.push(CartLine::from_product(product));
        Ok(())
    }

    /// Increments a line's quantity by one.
    ///
    /// Fails with [`CartError::StockExceeded`] when the next unit would pass
    /// the stock ceiling - the quantity is left unchanged, not clamped, so
    /// the caller can tell the cashier why nothing happened.
    pub fn increment(&mut self, product_id: ProductId) -> CartResult<()> {
        let line = self.line_mut(product_id)?;
        if line.quantity + 1 > line.stock {
            return Err(CartError::StockExceeded {
                name: line.name.clone(),
                stock: line.stock,
            });
        }
        line.quantity += 1;
        Ok(())
    }

    /// Decrements a line's quantity by one.
    ///
    /// A no-op at quantity 1: the minimum is 1, and removal is a distinct
    /// explicit action ([`Cart::remove`]), not reached by decrementing.
    pub fn decrement(&mut self, product_id: ProductId) -> CartResult<()> {
        let line = self.line_mut(product_id)?;
        if line.quantity > 1 {
            line.quantity -= 1;
        }
        Ok(())
    }

    /// Removes a line unconditionally. An absent id is not an error.
    pub fn remove(&mut self, product_id: ProductId) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.created_at = Utc::now();
    }

    /// Checks if the cart is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Computes the totals summary. Pure; an empty cart yields zeros.
    pub fn totals(&self) -> CartTotals {
        CartTotals {
            line_count: self.lines.len(),
            total_quantity: self.lines.iter().map(|l| l.quantity).sum(),
            grand_total: self.lines.iter().map(|l| l.line_total()).sum(),
        }
    }

    /// Computes `cash - grand_total`.
    ///
    /// A negative result is a valid *computed* value - the UI shows the
    /// cashier how much more cash is needed - but it is never payable:
    /// [`Cart::validate_checkout`] rejects it.
    pub fn change_for(&self, cash: Money) -> Money {
        cash - self.totals().grand_total
    }

    /// Validates the checkout preconditions, in order.
    ///
    /// Short-circuits with a distinct reason for each:
    /// 1. cart is non-empty - else [`CartError::EmptyCart`]
    /// 2. `cash >= grand_total` - else [`CartError::InsufficientCash`]
    pub fn validate_checkout(&self, cash: Money) -> CartResult<()> {
        if self.is_empty() {
            return Err(CartError::EmptyCart);
        }
        let required = self.totals().grand_total;
        if cash < required {
            return Err(CartError::InsufficientCash {
                required,
                tendered: cash,
            });
        }
        Ok(())
    }

    /// Snapshots the current lines as receipt lines.
    pub fn receipt_lines(&self) -> Vec<ReceiptLine> {
        self.lines.iter().map(CartLine::to_receipt_line).collect()
    }

    fn line_mut(&mut self, product_id: ProductId) -> CartResult<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or(CartError::LineNotFound { product_id })
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, price: i64, stock: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {}", id),
            unit_price: Money::from_rupiah(price),
            stock,
            image: None,
        }
    }

    #[test]
    fn test_add_item_out_of_stock_leaves_cart_unchanged() {
        let mut cart = Cart::new();
        let sold_out = product(1, 10_000, 0);

        let err = cart.add_item(&sold_out).unwrap_err();
        assert!(matches!(err, CartError::OutOfStock { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_same_product_increments_single_line() {
        let mut cart = Cart::new();
        let p = product(1, 10_000, 5);

        cart.add_item(&p).unwrap();
        cart.add_item(&p).unwrap();

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 2);
    }

    #[test]
    fn test_quantity_never_exceeds_stock() {
        let mut cart = Cart::new();
        let p = product(1, 10_000, 3);

        // Any sequence of add/increment on one product stays within stock.
        for _ in 0..10 {
            let _ = cart.add_item(&p);
        }
        for _ in 0..10 {
            let _ = cart.increment(p.id);
        }

        assert_eq!(cart.lines[0].quantity, 3);
    }

    #[test]
    fn test_increment_at_ceiling_reports_and_preserves() {
        let mut cart = Cart::new();
        let p = product(2, 5_000, 1);
        cart.add_item(&p).unwrap();

        let err = cart.increment(p.id).unwrap_err();
        assert_eq!(
            err,
            CartError::StockExceeded {
                name: "Product 2".to_string(),
                stock: 1
            }
        );
        assert_eq!(cart.lines[0].quantity, 1);
    }

    #[test]
    fn test_decrement_is_noop_at_one() {
        let mut cart = Cart::new();
        let p = product(1, 10_000, 5);
        cart.add_item(&p).unwrap();
        cart.add_item(&p).unwrap();

        cart.decrement(p.id).unwrap();
        assert_eq!(cart.lines[0].quantity, 1);

        // At quantity 1, decrement does nothing - removal is explicit.
        cart.decrement(p.id).unwrap();
        assert_eq!(cart.lines[0].quantity, 1);
        assert_eq!(cart.lines.len(), 1);
    }

    #[test]
    fn test_increment_missing_line() {
        let mut cart = Cart::new();
        let err = cart.increment(ProductId::new(99)).unwrap_err();
        assert!(matches!(err, CartError::LineNotFound { .. }));
    }

    #[test]
    fn test_remove_is_unconditional() {
        let mut cart = Cart::new();
        let p = product(1, 10_000, 5);
        cart.add_item(&p).unwrap();

        cart.remove(p.id);
        assert!(cart.is_empty());

        // Removing an absent id is not an error.
        cart.remove(ProductId::new(42));
    }

    #[test]
    fn test_empty_cart_totals_are_zero() {
        let cart = Cart::new();
        let totals = cart.totals();
        assert_eq!(totals.line_count, 0);
        assert_eq!(totals.total_quantity, 0);
        assert_eq!(totals.grand_total, Money::zero());
    }

    #[test]
    fn test_grand_total_is_exact_integer_sum() {
        let mut cart = Cart::new();
        let a = product(1, 10_000, 3);
        let b = product(2, 5_000, 10);
        let c = product(3, 1_500, 100);

        cart.add_item(&a).unwrap();
        cart.add_item(&a).unwrap();
        cart.add_item(&b).unwrap();
        for _ in 0..7 {
            cart.add_item(&c).unwrap();
        }

        assert_eq!(
            cart.totals().grand_total,
            Money::from_rupiah(2 * 10_000 + 5_000 + 7 * 1_500)
        );
    }

    #[test]
    fn test_validate_checkout_order() {
        let mut cart = Cart::new();

        // Empty cart wins over cash, regardless of the amount.
        assert_eq!(
            cart.validate_checkout(Money::zero()).unwrap_err(),
            CartError::EmptyCart
        );
        assert_eq!(
            cart.validate_checkout(Money::from_rupiah(1_000_000))
                .unwrap_err(),
            CartError::EmptyCart
        );

        cart.add_item(&product(1, 10_000, 3)).unwrap();
        let err = cart.validate_checkout(Money::from_rupiah(9_999)).unwrap_err();
        assert_eq!(
            err,
            CartError::InsufficientCash {
                required: Money::from_rupiah(10_000),
                tendered: Money::from_rupiah(9_999),
            }
        );

        // Exact cash is payable.
        cart.validate_checkout(Money::from_rupiah(10_000)).unwrap();
    }

    /// The concrete sales-screen scenario:
    /// A (Rp10.000, stock 3) and B (Rp5.000, stock 1).
    #[test]
    fn test_two_product_sale_scenario() {
        let a = product(1, 10_000, 3);
        let b = product(2, 5_000, 1);
        let mut cart = Cart::new();

        cart.add_item(&a).unwrap(); // {A×1}
        cart.add_item(&a).unwrap(); // {A×2}
        cart.add_item(&b).unwrap(); // {A×2, B×1}

        // B is at its stock ceiling.
        assert!(matches!(
            cart.increment(b.id).unwrap_err(),
            CartError::StockExceeded { .. }
        ));

        let totals = cart.totals();
        assert_eq!(totals.grand_total, Money::from_rupiah(25_000));
        assert_eq!(totals.total_quantity, 3);

        assert!(matches!(
            cart.validate_checkout(Money::from_rupiah(20_000)).unwrap_err(),
            CartError::InsufficientCash { .. }
        ));

        cart.validate_checkout(Money::from_rupiah(30_000)).unwrap();
        assert_eq!(
            cart.change_for(Money::from_rupiah(30_000)),
            Money::from_rupiah(5_000)
        );
    }

    #[test]
    fn test_change_for_negative_shortfall() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 25_000, 2)).unwrap();

        let change = cart.change_for(Money::from_rupiah(20_000));
        assert_eq!(change, Money::from_rupiah(-5_000));
        assert!(change.is_negative());
    }

    #[test]
    fn test_price_frozen_at_add_time() {
        let mut cart = Cart::new();
        let mut p = product(1, 10_000, 5);
        cart.add_item(&p).unwrap();

        // Catalog refetch changed the price; the line keeps its snapshot.
        p.unit_price = Money::from_rupiah(12_000);
        assert_eq!(cart.lines[0].unit_price, Money::from_rupiah(10_000));
    }

    #[test]
    fn test_receipt_lines_snapshot() {
        let mut cart = Cart::new();
        let a = product(1, 10_000, 3);
        cart.add_item(&a).unwrap();
        cart.add_item(&a).unwrap();

        let lines = cart.receipt_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].line_total, Money::from_rupiah(20_000));
    }
}
