//! # Wire DTOs
//!
//! Request/response shapes for the remote POS API, with a validating
//! mapping step into `kasir-core` types.
//!
//! ## Field Naming
//! The server is the original Indonesian POS backend; its JSON keys are
//! Bahasa Indonesia snake_case (`nama_produk`, `harga_jual`, `stok`,
//! `uang_diberikan`, `kode_transaksi`, `kembalian`). DTOs mirror the wire
//! exactly; core types use the domain vocabulary. The mapping between the
//! two is fallible on purpose:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   Wire JSON ──serde──► ProductDto ──into_product()──► Product           │
//! │                                          │                              │
//! │              negative price/stock,       │                              │
//! │              unparsable amount ──────────┴──► ApiError::Decode          │
//! │                                                                         │
//! │   Nothing malformed ever reaches cart arithmetic.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use kasir_core::{Money, Product, ProductId};

use crate::error::{ApiError, ApiResult};

// =============================================================================
// Amount Deserialization
// =============================================================================

/// Deserializes a Rupiah amount that the server may emit as a JSON number
/// or as a numeric string ("10000.00" - the backend stores decimals as
/// strings). Fractional digits are dropped: Rupiah has no subunit.
fn de_rupiah<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(v) => Ok(v),
        Raw::Float(v) if v.is_finite() => Ok(v.trunc() as i64),
        Raw::Float(_) => Err(serde::de::Error::custom("non-finite amount")),
        Raw::Text(s) => {
            // "10000" or "10000.00" - integer part only.
            let integer_part = s.split('.').next().unwrap_or("");
            integer_part
                .trim()
                .parse::<i64>()
                .map_err(|_| serde::de::Error::custom(format!("unparsable amount: {s:?}")))
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Catalog sanity ceilings. A price or stock count past these is corrupt
/// data, rejected the same way a negative one is: every amount entering
/// cart arithmetic stays far inside the i64 range, so line totals and
/// grand totals are exact.
const MAX_UNIT_PRICE: i64 = 1_000_000_000_000; // Rp1 triliun per unit
const MAX_STOCK: i64 = 1_000_000;

/// One product as the catalog endpoint returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDto {
    pub id: i64,
    pub nama_produk: String,
    #[serde(deserialize_with = "de_rupiah")]
    pub harga_jual: i64,
    pub stok: i64,
    #[serde(default)]
    pub foto: Option<String>,
}

impl ProductDto {
    /// Validates and converts into the core domain type.
    pub fn into_product(self) -> ApiResult<Product> {
        if self.harga_jual < 0 {
            return Err(ApiError::decode(format!(
                "product {} has negative price {}",
                self.id, self.harga_jual
            )));
        }
        if self.stok < 0 {
            return Err(ApiError::decode(format!(
                "product {} has negative stock {}",
                self.id, self.stok
            )));
        }
        if self.harga_jual > MAX_UNIT_PRICE {
            return Err(ApiError::decode(format!(
                "product {} price {} exceeds the supported range",
                self.id, self.harga_jual
            )));
        }
        if self.stok > MAX_STOCK {
            return Err(ApiError::decode(format!(
                "product {} stock {} exceeds the supported range",
                self.id, self.stok
            )));
        }
        Ok(Product {
            id: ProductId::new(self.id),
            name: self.nama_produk,
            unit_price: Money::from_rupiah(self.harga_jual),
            stock: self.stok,
            image: self.foto,
        })
    }
}

// =============================================================================
// Sale Submission
// =============================================================================

/// The checkout request payload: `{ items: [{id, qty}], uang_diberikan }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaleRequest {
    pub items: Vec<SaleItem>,
    pub uang_diberikan: i64,
}

/// One sold line: product id and quantity. Prices are not sent - the
/// server prices the sale from its own records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaleItem {
    pub id: i64,
    pub qty: i64,
}

/// The server's confirmation of a recorded sale.
///
/// `kembalian` and `created_at` are optional: older backend versions omit
/// them, and the engine can derive both locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleConfirmation {
    pub kode_transaksi: String,
    #[serde(deserialize_with = "de_rupiah")]
    pub total_harga: i64,
    #[serde(default)]
    pub uang_diberikan: Option<i64>,
    #[serde(default)]
    pub kembalian: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Structured error body the server sends with non-2xx rejections.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_dto_maps_to_core() {
        let dto: ProductDto = serde_json::from_str(
            r#"{"id": 7, "nama_produk": "Indomie Goreng", "harga_jual": 3500, "stok": 40, "foto": "products/indomie.jpg"}"#,
        )
        .unwrap();

        let product = dto.into_product().unwrap();
        assert_eq!(product.id, ProductId::new(7));
        assert_eq!(product.unit_price, Money::from_rupiah(3_500));
        assert_eq!(product.stock, 40);
        assert_eq!(product.image.as_deref(), Some("products/indomie.jpg"));
    }

    #[test]
    fn test_string_price_is_tolerated() {
        // The backend serializes decimal columns as strings.
        let dto: ProductDto = serde_json::from_str(
            r#"{"id": 1, "nama_produk": "Teh Botol", "harga_jual": "5000.00", "stok": 12}"#,
        )
        .unwrap();
        assert_eq!(dto.harga_jual, 5_000);
        assert!(dto.foto.is_none());
    }

    #[test]
    fn test_unparsable_price_is_a_decode_failure() {
        let result: Result<ProductDto, _> = serde_json::from_str(
            r#"{"id": 1, "nama_produk": "Teh Botol", "harga_jual": "gratis", "stok": 12}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_values_rejected_at_the_boundary() {
        let dto = ProductDto {
            id: 3,
            nama_produk: "Rusak".to_string(),
            harga_jual: -100,
            stok: 5,
            foto: None,
        };
        assert!(matches!(
            dto.into_product().unwrap_err(),
            ApiError::Decode { .. }
        ));

        let dto = ProductDto {
            id: 3,
            nama_produk: "Rusak".to_string(),
            harga_jual: 100,
            stok: -5,
            foto: None,
        };
        assert!(matches!(
            dto.into_product().unwrap_err(),
            ApiError::Decode { .. }
        ));
    }

    #[test]
    fn test_implausible_values_rejected_at_the_boundary() {
        // Corrupt rows with absurd amounts must never reach cart math.
        let dto = ProductDto {
            id: 4,
            nama_produk: "Rusak".to_string(),
            harga_jual: MAX_UNIT_PRICE + 1,
            stok: 5,
            foto: None,
        };
        assert!(matches!(
            dto.into_product().unwrap_err(),
            ApiError::Decode { .. }
        ));

        let dto = ProductDto {
            id: 4,
            nama_produk: "Rusak".to_string(),
            harga_jual: 100,
            stok: MAX_STOCK + 1,
            foto: None,
        };
        assert!(matches!(
            dto.into_product().unwrap_err(),
            ApiError::Decode { .. }
        ));
    }

    #[test]
    fn test_sale_request_wire_shape() {
        let request = SaleRequest {
            items: vec![SaleItem { id: 1, qty: 2 }, SaleItem { id: 2, qty: 1 }],
            uang_diberikan: 30_000,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "items": [{"id": 1, "qty": 2}, {"id": 2, "qty": 1}],
                "uang_diberikan": 30000
            })
        );
    }

    #[test]
    fn test_sale_confirmation_minimal_body() {
        // Older backends confirm with just the code and total.
        let confirmation: SaleConfirmation = serde_json::from_str(
            r#"{"kode_transaksi": "TRX-20240101-0007", "total_harga": "25000.00"}"#,
        )
        .unwrap();
        assert_eq!(confirmation.kode_transaksi, "TRX-20240101-0007");
        assert_eq!(confirmation.total_harga, 25_000);
        assert!(confirmation.kembalian.is_none());
        assert!(confirmation.created_at.is_none());
    }
}
