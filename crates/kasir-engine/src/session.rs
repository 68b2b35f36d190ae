//! # Sale Session
//!
//! The live-sale state machine: cart mutations, cash tender, checkout.
//!
//! ## Thread Safety
//! The session is shared between a presentation shell and an in-flight
//! checkout, so its state sits behind interior mutability:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    SaleSession Internals                                │
//! │                                                                         │
//! │  Mutex<SaleState>          catalog snapshot + cart + cash tender.       │
//! │                            Held only for synchronous bookkeeping,       │
//! │                            NEVER across an await point.                 │
//! │                                                                         │
//! │  AtomicBool (in-flight)    the checkout busy flag. Set with swap()      │
//! │                            so exactly one caller wins; released by a    │
//! │                            drop guard on every exit path.               │
//! │                                                                         │
//! │  Mutations read the flag WHILE HOLDING the state mutex (locked_state).  │
//! │  checkout() sets the flag before taking the mutex to snapshot, so a    │
//! │  mutation either completes before the snapshot or observes the flag    │
//! │  and is rejected - there is no window where a mutation is accepted     │
//! │  against a cart that was already submitted.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ts_rs::TS;

use kasir_api::{CheckoutSubmitter, ProductCatalog, SaleItem, SaleRequest};
use kasir_core::{Cart, CartLine, CartTotals, Money, Product, ProductId, Receipt};

use crate::error::{EngineError, EngineResult};

// =============================================================================
// View Types
// =============================================================================

/// Cart snapshot handed to the presentation layer after every operation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
    /// Cash entered so far, if any.
    pub cash_tendered: Option<Money>,
    /// `cash - grand_total`; negative means the customer still owes cash.
    pub change: Money,
}

// =============================================================================
// Session State
// =============================================================================

/// Everything a sale in progress owns. Lives behind the session mutex.
#[derive(Debug, Default)]
struct SaleState {
    /// Catalog snapshot from the last `load_catalog` call.
    products: Vec<Product>,
    cart: Cart,
    cash_tendered: Option<Money>,
}

impl SaleState {
    fn view(&self) -> CartView {
        let cash = self.cash_tendered.unwrap_or(Money::zero());
        CartView {
            lines: self.cart.lines.clone(),
            totals: self.cart.totals(),
            cash_tendered: self.cash_tendered,
            change: self.cart.change_for(cash),
        }
    }
}

// =============================================================================
// In-Flight Guard
// =============================================================================

/// Releases the checkout busy flag when dropped, so every exit path of
/// `checkout()` - success, validation error, server failure - unlocks.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

// =============================================================================
// Sale Session
// =============================================================================

/// One operator's sale in progress.
///
/// Generic over the two collaborators so tests can drop in in-memory
/// fakes; production wires in `kasir_api::HttpApiClient` for both.
#[derive(Debug)]
pub struct SaleSession<C, S> {
    catalog: C,
    submitter: S,
    state: Mutex<SaleState>,
    checkout_in_flight: AtomicBool,
}

impl<C, S> SaleSession<C, S>
where
    C: ProductCatalog,
    S: CheckoutSubmitter,
{
    /// Creates a session with an empty cart and no catalog loaded yet.
    pub fn new(catalog: C, submitter: S) -> Self {
        SaleSession {
            catalog,
            submitter,
            state: Mutex::new(SaleState::default()),
            checkout_in_flight: AtomicBool::new(false),
        }
    }

    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------

    /// Refreshes the catalog snapshot from the server.
    ///
    /// Called when the sales screen opens and again after a completed sale,
    /// so stock hints stay current. Existing cart lines keep their frozen
    /// snapshots; staleness beyond that is accepted.
    pub async fn load_catalog(&self) -> EngineResult<usize> {
        // Fail fast before the network round-trip; the store below
        // rechecks under the lock.
        if self.checkout_in_flight() {
            return Err(EngineError::CartLockedDuringCheckout);
        }

        let products = self
            .catalog
            .list_products()
            .await
            .map_err(EngineError::from_api)?;
        let count = products.len();

        self.locked_state()?.products = products;
        debug!(count, "catalog refreshed");
        Ok(count)
    }

    /// The current catalog snapshot.
    pub fn products(&self) -> Vec<Product> {
        self.lock_state().products.clone()
    }

    /// Case-insensitive name filter over the catalog snapshot, as the
    /// sales screen's search box does it.
    pub fn search_products(&self, term: &str) -> Vec<Product> {
        let needle = term.to_lowercase();
        self.lock_state()
            .products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    // -------------------------------------------------------------------------
    // Cart Mutations
    // -------------------------------------------------------------------------

    /// Adds one unit of a catalog product to the cart (or increments the
    /// existing line).
    pub fn add_to_cart(&self, product_id: ProductId) -> EngineResult<CartView> {
        let mut state = self.locked_state()?;

        let product = state
            .products
            .iter()
            .find(|p| p.id == product_id)
            .cloned()
            .ok_or(EngineError::UnknownProduct { product_id })?;

        state.cart.add_item(&product)?;
        debug!(%product_id, "added to cart");
        Ok(state.view())
    }

    /// Increments a cart line by one, bounded by the stock snapshot.
    pub fn increment(&self, product_id: ProductId) -> EngineResult<CartView> {
        let mut state = self.locked_state()?;
        state.cart.increment(product_id)?;
        Ok(state.view())
    }

    /// Decrements a cart line by one; a no-op at quantity 1.
    pub fn decrement(&self, product_id: ProductId) -> EngineResult<CartView> {
        let mut state = self.locked_state()?;
        state.cart.decrement(product_id)?;
        Ok(state.view())
    }

    /// Removes a cart line unconditionally.
    pub fn remove(&self, product_id: ProductId) -> EngineResult<CartView> {
        let mut state = self.locked_state()?;
        state.cart.remove(product_id);
        Ok(state.view())
    }

    /// Records the cash amount the customer handed over.
    pub fn tender_cash(&self, amount: Money) -> EngineResult<CartView> {
        let mut state = self.locked_state()?;
        if amount.is_negative() {
            return Err(EngineError::NegativeCashTender);
        }
        state.cash_tendered = Some(amount);
        Ok(state.view())
    }

    /// Clears cart and cash tender unconditionally (explicit cancel, or
    /// after the receipt has been acknowledged).
    pub fn reset(&self) -> EngineResult<CartView> {
        let mut state = self.locked_state()?;
        state.cart.clear();
        state.cash_tendered = None;
        info!("sale session reset");
        Ok(state.view())
    }

    // -------------------------------------------------------------------------
    // Read Access
    // -------------------------------------------------------------------------

    /// The current cart, totals, tender, and change.
    pub fn cart_view(&self) -> CartView {
        self.lock_state().view()
    }

    /// `cash - grand_total`: negative while the customer still owes cash.
    pub fn change_due(&self) -> Money {
        self.cart_view().change
    }

    /// Whether a checkout is currently awaiting the server.
    /// The presentation layer uses this to disable cart controls.
    pub fn checkout_in_flight(&self) -> bool {
        self.checkout_in_flight.load(Ordering::SeqCst)
    }

    // -------------------------------------------------------------------------
    // Checkout
    // -------------------------------------------------------------------------

    /// Finalizes the sale: validates, submits to the server, and builds
    /// the receipt from the confirmation plus the local cart snapshot.
    ///
    /// ## Outcome Contract
    /// - Success: cart and cash tender are cleared; the returned
    ///   [`Receipt`] is immutable and ready for display/print.
    /// - Any failure: cart and cash tender are left exactly as they were,
    ///   so the operator can retry without re-entering the sale.
    /// - Only one checkout may be in flight per session; a concurrent call
    ///   fails fast with [`EngineError::CheckoutInProgress`].
    pub async fn checkout(&self) -> EngineResult<Receipt> {
        // swap() makes exactly one caller the winner; everyone else sees
        // true and bounces. The guard releases the flag on every exit.
        if self.checkout_in_flight.swap(true, Ordering::SeqCst) {
            return Err(EngineError::CheckoutInProgress);
        }
        let _guard = InFlightGuard(&self.checkout_in_flight);

        // Snapshot under the lock; the lock is NOT held across the await.
        let (request, lines, total, cash) = {
            let state = self.lock_state();
            let cash = state.cash_tendered.unwrap_or(Money::zero());
            state.cart.validate_checkout(cash)?;

            let request = SaleRequest {
                items: state
                    .cart
                    .lines
                    .iter()
                    .map(|l| SaleItem {
                        id: l.product_id.value(),
                        qty: l.quantity,
                    })
                    .collect(),
                uang_diberikan: cash.rupiah(),
            };
            let total = state.cart.totals().grand_total;
            (request, state.cart.receipt_lines(), total, cash)
        };

        debug!(items = request.items.len(), total = total.rupiah(), "checkout submitting");

        let confirmation = self
            .submitter
            .submit_sale(&request)
            .await
            .map_err(EngineError::from_api)?;

        // The server prices the sale from its own records; the local
        // snapshot wins for display, a mismatch is only logged.
        if confirmation.total_harga != total.rupiah() {
            warn!(
                local = total.rupiah(),
                server = confirmation.total_harga,
                invoice = %confirmation.kode_transaksi,
                "server total differs from local cart total"
            );
        }

        let receipt = Receipt {
            invoice_code: confirmation.kode_transaksi,
            timestamp: confirmation.created_at.unwrap_or_else(Utc::now),
            lines,
            total,
            cash_tendered: cash,
            change: cash - total,
        };

        {
            let mut state = self.lock_state();
            state.cart.clear();
            state.cash_tendered = None;
        }

        info!(invoice = %receipt.invoice_code, total = total.rupiah(), "sale completed");
        Ok(receipt)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Locks the state for a mutation.
    ///
    /// The busy flag is read while the mutex is held: checkout() sets the
    /// flag before taking this same mutex to snapshot the cart, so any
    /// mutation that gets the lock first completes before the snapshot,
    /// and any that gets it later sees the flag and is rejected.
    fn locked_state(&self) -> EngineResult<std::sync::MutexGuard<'_, SaleState>> {
        let state = self.lock_state();
        if self.checkout_in_flight() {
            return Err(EngineError::CartLockedDuringCheckout);
        }
        Ok(state)
    }

    /// Locks the state without the busy-flag check (reads, and the
    /// checkout path itself). A poisoned lock is recovered: the state
    /// only holds plain data, and one panicked holder must not take the
    /// whole session down with it.
    fn lock_state(&self) -> std::sync::MutexGuard<'_, SaleState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kasir_api::{ApiError, ApiResult, SaleConfirmation};
    use kasir_core::CartError;
    use std::sync::Arc;
    use tokio::sync::oneshot;

    fn product(id: i64, price: i64, stock: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {}", id),
            unit_price: Money::from_rupiah(price),
            stock,
            image: None,
        }
    }

    fn confirmation(code: &str, total: i64) -> SaleConfirmation {
        SaleConfirmation {
            kode_transaksi: code.to_string(),
            total_harga: total,
            uang_diberikan: None,
            kembalian: None,
            created_at: None,
        }
    }

    struct FakeCatalog {
        products: Vec<Product>,
    }

    #[async_trait]
    impl ProductCatalog for FakeCatalog {
        async fn list_products(&self) -> ApiResult<Vec<Product>> {
            Ok(self.products.clone())
        }
    }

    /// Scripted submitter: succeeds, rejects, or fails transport-style,
    /// and records every request it saw.
    struct FakeSubmitter {
        outcome: Mutex<Outcome>,
        seen: Mutex<Vec<SaleRequest>>,
    }

    enum Outcome {
        Succeed { code: String, total: i64 },
        Reject(String),
        Transport,
    }

    impl FakeSubmitter {
        fn succeeding(code: &str, total: i64) -> Self {
            FakeSubmitter {
                outcome: Mutex::new(Outcome::Succeed {
                    code: code.to_string(),
                    total,
                }),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn rejecting(message: &str) -> Self {
            FakeSubmitter {
                outcome: Mutex::new(Outcome::Reject(message.to_string())),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            FakeSubmitter {
                outcome: Mutex::new(Outcome::Transport),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<SaleRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CheckoutSubmitter for FakeSubmitter {
        async fn submit_sale(&self, request: &SaleRequest) -> ApiResult<SaleConfirmation> {
            self.seen.lock().unwrap().push(request.clone());
            match &*self.outcome.lock().unwrap() {
                Outcome::Succeed { code, total } => Ok(confirmation(code, *total)),
                Outcome::Reject(message) => Err(ApiError::Rejected {
                    status: 422,
                    message: message.clone(),
                }),
                Outcome::Transport => Err(ApiError::decode("connection reset by peer")),
            }
        }
    }

    /// Submitter that parks until the test releases it, then succeeds.
    struct ParkedSubmitter {
        release: tokio::sync::Mutex<Option<oneshot::Receiver<()>>>,
        total: i64,
    }

    #[async_trait]
    impl CheckoutSubmitter for ParkedSubmitter {
        async fn submit_sale(&self, _request: &SaleRequest) -> ApiResult<SaleConfirmation> {
            if let Some(rx) = self.release.lock().await.take() {
                let _ = rx.await;
            }
            Ok(confirmation("TRX-PARKED", self.total))
        }
    }

    async fn loaded_session<S: CheckoutSubmitter>(
        products: Vec<Product>,
        submitter: S,
    ) -> SaleSession<FakeCatalog, S> {
        let session = SaleSession::new(FakeCatalog { products }, submitter);
        session.load_catalog().await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_load_catalog_and_search() {
        let session = loaded_session(
            vec![
                Product {
                    name: "Teh Botol".to_string(),
                    ..product(1, 5_000, 10)
                },
                Product {
                    name: "Teh Pucuk".to_string(),
                    ..product(2, 4_000, 10)
                },
                Product {
                    name: "Kopi Sachet".to_string(),
                    ..product(3, 2_500, 10)
                },
            ],
            FakeSubmitter::succeeding("TRX-1", 0),
        )
        .await;

        assert_eq!(session.products().len(), 3);
        assert_eq!(session.search_products("teh").len(), 2);
        assert_eq!(session.search_products("KOPI").len(), 1);
        assert!(session.search_products("bakso").is_empty());
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let session = loaded_session(
            vec![product(1, 5_000, 10)],
            FakeSubmitter::succeeding("TRX-1", 0),
        )
        .await;

        let err = session.add_to_cart(ProductId::new(99)).unwrap_err();
        assert!(matches!(err, EngineError::UnknownProduct { .. }));
    }

    #[tokio::test]
    async fn test_out_of_stock_product_is_not_addable() {
        let session = loaded_session(
            vec![product(1, 5_000, 0)],
            FakeSubmitter::succeeding("TRX-1", 0),
        )
        .await;

        let err = session.add_to_cart(ProductId::new(1)).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Cart(CartError::OutOfStock { .. })
        ));
        assert!(session.cart_view().lines.is_empty());
    }

    #[tokio::test]
    async fn test_negative_tender_rejected() {
        let session = loaded_session(
            vec![product(1, 5_000, 10)],
            FakeSubmitter::succeeding("TRX-1", 0),
        )
        .await;

        let err = session.tender_cash(Money::from_rupiah(-1)).unwrap_err();
        assert!(matches!(err, EngineError::NegativeCashTender));
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_regardless_of_cash() {
        let session = loaded_session(
            vec![product(1, 5_000, 10)],
            FakeSubmitter::succeeding("TRX-1", 0),
        )
        .await;
        session.tender_cash(Money::from_rupiah(1_000_000)).unwrap();

        let err = session.checkout().await.unwrap_err();
        assert!(matches!(err, EngineError::Cart(CartError::EmptyCart)));

        // The busy flag was released: the next call hits the same
        // validation, not CheckoutInProgress.
        let err = session.checkout().await.unwrap_err();
        assert!(matches!(err, EngineError::Cart(CartError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_checkout_insufficient_cash_preserves_cart() {
        let session = loaded_session(
            vec![product(1, 10_000, 3)],
            FakeSubmitter::succeeding("TRX-1", 20_000),
        )
        .await;
        session.add_to_cart(ProductId::new(1)).unwrap();
        session.add_to_cart(ProductId::new(1)).unwrap();
        session.tender_cash(Money::from_rupiah(15_000)).unwrap();

        let err = session.checkout().await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Cart(CartError::InsufficientCash { .. })
        ));

        let view = session.cart_view();
        assert_eq!(view.totals.total_quantity, 2);
        assert_eq!(view.cash_tendered, Some(Money::from_rupiah(15_000)));
    }

    /// The full sales-screen scenario against a succeeding server:
    /// A (Rp10.000, stock 3) ×2 and B (Rp5.000, stock 1) ×1.
    #[tokio::test]
    async fn test_checkout_success_clears_state_and_builds_receipt() {
        let submitter = FakeSubmitter::succeeding("TRX-0007", 25_000);
        let session = loaded_session(
            vec![product(1, 10_000, 3), product(2, 5_000, 1)],
            submitter,
        )
        .await;

        session.add_to_cart(ProductId::new(1)).unwrap();
        session.add_to_cart(ProductId::new(1)).unwrap();
        session.add_to_cart(ProductId::new(2)).unwrap();
        assert!(matches!(
            session.increment(ProductId::new(2)).unwrap_err(),
            EngineError::Cart(CartError::StockExceeded { .. })
        ));
        session.tender_cash(Money::from_rupiah(30_000)).unwrap();

        let receipt = session.checkout().await.unwrap();

        assert_eq!(receipt.invoice_code, "TRX-0007");
        assert_eq!(receipt.total, Money::from_rupiah(25_000));
        assert_eq!(receipt.cash_tendered, Money::from_rupiah(30_000));
        assert_eq!(receipt.change, Money::from_rupiah(5_000));
        assert_eq!(receipt.lines.len(), 2);
        assert_eq!(receipt.lines[0].quantity, 2);

        // Cart and tender cleared, session ready for the next sale.
        let view = session.cart_view();
        assert!(view.lines.is_empty());
        assert!(view.cash_tendered.is_none());

        // The submitted payload matched the cart.
        let seen = session.submitter.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0],
            SaleRequest {
                items: vec![SaleItem { id: 1, qty: 2 }, SaleItem { id: 2, qty: 1 }],
                uang_diberikan: 30_000,
            }
        );
    }

    #[tokio::test]
    async fn test_server_rejection_preserves_cart_and_tender() {
        let session = loaded_session(
            vec![product(1, 10_000, 3)],
            FakeSubmitter::rejecting("Stok tidak mencukupi"),
        )
        .await;
        session.add_to_cart(ProductId::new(1)).unwrap();
        session.tender_cash(Money::from_rupiah(10_000)).unwrap();

        let err = session.checkout().await.unwrap_err();
        match err {
            EngineError::ServerRejected { message } => {
                assert_eq!(message, "Stok tidak mencukupi")
            }
            other => panic!("expected ServerRejected, got {other:?}"),
        }

        // No data loss: the operator may adjust and retry.
        let view = session.cart_view();
        assert_eq!(view.totals.total_quantity, 1);
        assert_eq!(view.cash_tendered, Some(Money::from_rupiah(10_000)));
        assert!(!session.checkout_in_flight());
    }

    #[tokio::test]
    async fn test_transport_failure_preserves_cart_and_allows_retry() {
        let session = loaded_session(
            vec![product(1, 10_000, 3)],
            FakeSubmitter::failing(),
        )
        .await;
        session.add_to_cart(ProductId::new(1)).unwrap();
        session.tender_cash(Money::from_rupiah(10_000)).unwrap();

        let err = session.checkout().await.unwrap_err();
        assert!(matches!(err, EngineError::Transport { .. }));
        assert_eq!(session.cart_view().totals.total_quantity, 1);

        // Flip the server to healthy and retry the exact same sale.
        *session.submitter.outcome.lock().unwrap() = Outcome::Succeed {
            code: "TRX-RETRY".to_string(),
            total: 10_000,
        };
        let receipt = session.checkout().await.unwrap();
        assert_eq!(receipt.invoice_code, "TRX-RETRY");
        assert_eq!(session.submitter.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_second_checkout_fails_fast_and_first_is_unaffected() {
        let (tx, rx) = oneshot::channel();
        let submitter = ParkedSubmitter {
            release: tokio::sync::Mutex::new(Some(rx)),
            total: 10_000,
        };
        let session = Arc::new(
            loaded_session(vec![product(1, 10_000, 3)], submitter).await,
        );
        session.add_to_cart(ProductId::new(1)).unwrap();
        session.tender_cash(Money::from_rupiah(10_000)).unwrap();

        let first = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.checkout().await })
        };

        // Wait for the first checkout to take the busy flag.
        while !session.checkout_in_flight() {
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
        }

        // Second checkout fails fast - not queued, not dropped silently.
        let err = session.checkout().await.unwrap_err();
        assert!(matches!(err, EngineError::CheckoutInProgress));

        // Every mutation is rejected while the submitted cart is in
        // flight - none may touch what the server is pricing.
        assert!(matches!(
            session.add_to_cart(ProductId::new(1)).unwrap_err(),
            EngineError::CartLockedDuringCheckout
        ));
        assert!(matches!(
            session.increment(ProductId::new(1)).unwrap_err(),
            EngineError::CartLockedDuringCheckout
        ));
        assert!(matches!(
            session.decrement(ProductId::new(1)).unwrap_err(),
            EngineError::CartLockedDuringCheckout
        ));
        assert!(matches!(
            session.remove(ProductId::new(1)).unwrap_err(),
            EngineError::CartLockedDuringCheckout
        ));
        assert!(matches!(
            session.tender_cash(Money::from_rupiah(50_000)).unwrap_err(),
            EngineError::CartLockedDuringCheckout
        ));
        assert!(matches!(
            session.reset().unwrap_err(),
            EngineError::CartLockedDuringCheckout
        ));
        assert!(matches!(
            session.load_catalog().await.unwrap_err(),
            EngineError::CartLockedDuringCheckout
        ));

        // Release the server; the first checkout completes untouched.
        tx.send(()).unwrap();
        let receipt = first.await.unwrap().unwrap();
        assert_eq!(receipt.invoice_code, "TRX-PARKED");
        assert_eq!(receipt.change, Money::zero());
        assert!(!session.checkout_in_flight());
        assert!(session.cart_view().lines.is_empty());
    }

    #[tokio::test]
    async fn test_reset_clears_cart_and_tender() {
        let session = loaded_session(
            vec![product(1, 10_000, 3)],
            FakeSubmitter::succeeding("TRX-1", 0),
        )
        .await;
        session.add_to_cart(ProductId::new(1)).unwrap();
        session.tender_cash(Money::from_rupiah(50_000)).unwrap();

        let view = session.reset().unwrap();
        assert!(view.lines.is_empty());
        assert!(view.cash_tendered.is_none());
        assert_eq!(view.totals.grand_total, Money::zero());
    }

    #[tokio::test]
    async fn test_session_survives_a_poisoned_state_lock() {
        let session = Arc::new(
            loaded_session(
                vec![product(1, 5_000, 10)],
                FakeSubmitter::succeeding("TRX-1", 0),
            )
            .await,
        );
        session.add_to_cart(ProductId::new(1)).unwrap();

        // A holder dying with the lock poisons the mutex. The session
        // recovers the guard instead of propagating the panic.
        let poisoner = Arc::clone(&session);
        let holder = std::thread::spawn(move || {
            let _guard = poisoner.state.lock().unwrap();
            panic!("holder died with the lock");
        });
        assert!(holder.join().is_err());

        assert_eq!(session.cart_view().totals.total_quantity, 1);
        session.add_to_cart(ProductId::new(1)).unwrap();
        assert_eq!(session.cart_view().totals.total_quantity, 2);
    }

    #[tokio::test]
    async fn test_change_due_shows_shortfall() {
        let session = loaded_session(
            vec![product(1, 25_000, 2)],
            FakeSubmitter::succeeding("TRX-1", 0),
        )
        .await;
        session.add_to_cart(ProductId::new(1)).unwrap();
        session.tender_cash(Money::from_rupiah(20_000)).unwrap();

        assert_eq!(session.change_due(), Money::from_rupiah(-5_000));
    }
}
