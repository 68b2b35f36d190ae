//! # API Client
//!
//! Collaborator contracts and their HTTP implementation.
//!
//! ## Contracts
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Collaborator Contracts                                │
//! │                                                                         │
//! │  ProductCatalog       read-only fetch, no side effects. Called to      │
//! │  ──────────────       open a sale session and to refresh stock hints   │
//! │                       after a completed sale. Staleness is accepted -  │
//! │                       the client never revalidates live.               │
//! │                                                                         │
//! │  CheckoutSubmitter    the single state-changing call. Stock decrement  │
//! │  ─────────────────    and invoice numbering happen atomically on the   │
//! │                       server; the client treats its own stock counts   │
//! │                       as hints and handles races via Rejected.         │
//! │                                                                         │
//! │  Production: HttpApiClient (this file, reqwest)                        │
//! │  Tests: in-memory fakes in kasir-engine                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use kasir_core::Product;

use crate::dto::{ApiErrorBody, ProductDto, SaleConfirmation, SaleRequest};
use crate::error::{ApiError, ApiResult};
use crate::session::Session;

/// Applied when the caller does not supply a network timeout.
/// A timeout surfaces as `ApiError::Transport`, never a stock/cash error.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// Collaborator Traits
// =============================================================================

/// Read-only product catalog provider.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetches the full catalog with current stock counts.
    async fn list_products(&self) -> ApiResult<Vec<Product>>;
}

/// Submits a finalized sale to the server.
#[async_trait]
pub trait CheckoutSubmitter: Send + Sync {
    /// Records one sale. The server performs the atomic stock decrement
    /// and assigns the invoice code.
    async fn submit_sale(&self, request: &SaleRequest) -> ApiResult<SaleConfirmation>;
}

// =============================================================================
// HTTP Implementation
// =============================================================================

/// Reqwest-backed client for the remote POS API.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl HttpApiClient {
    /// Creates a client with the default network timeout.
    pub fn new(base_url: impl Into<String>, session: Session) -> ApiResult<Self> {
        Self::with_timeout(base_url, session, DEFAULT_TIMEOUT)
    }

    /// Creates a client with a caller-supplied network timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        session: Session,
        timeout: Duration,
    ) -> ApiResult<Self> {
        let base_url = base_url.into();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ApiError::InvalidBaseUrl(base_url));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(HttpApiClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decodes a 2xx body, or folds a non-2xx response into `Rejected`
    /// with the server's `{message}` when it sent one.
    async fn read_response<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await?;
            return serde_json::from_slice(&bytes)
                .map_err(|e| ApiError::decode(e.to_string()));
        }

        let message = match response.json::<ApiErrorBody>().await {
            Ok(body) => body.message,
            // No structured body; fall back to the status line.
            Err(_) => status_fallback(status),
        };

        Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

fn status_fallback(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("server error")
        .to_string()
}

#[async_trait]
impl ProductCatalog for HttpApiClient {
    async fn list_products(&self) -> ApiResult<Vec<Product>> {
        debug!(base_url = %self.base_url, "fetching product catalog");

        let response = self
            .http
            .get(self.endpoint("/api/products"))
            .bearer_auth(self.session.token())
            .send()
            .await?;

        let dtos: Vec<ProductDto> = Self::read_response(response).await?;
        let products = dtos
            .into_iter()
            .map(ProductDto::into_product)
            .collect::<ApiResult<Vec<_>>>()?;

        debug!(count = products.len(), "catalog fetched");
        Ok(products)
    }
}

#[async_trait]
impl CheckoutSubmitter for HttpApiClient {
    async fn submit_sale(&self, request: &SaleRequest) -> ApiResult<SaleConfirmation> {
        debug!(
            items = request.items.len(),
            tendered = request.uang_diberikan,
            "submitting sale"
        );

        let response = self
            .http
            .post(self.endpoint("/api/transactions"))
            .bearer_auth(self.session.token())
            .json(request)
            .send()
            .await?;

        let confirmation: SaleConfirmation = Self::read_response(response).await?;
        if confirmation.total_harga < 0 {
            warn!(total = confirmation.total_harga, "server sent negative sale total");
            return Err(ApiError::decode("negative sale total from server"));
        }

        debug!(invoice = %confirmation.kode_transaksi, "sale recorded");
        Ok(confirmation)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
