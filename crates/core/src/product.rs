//! Canonical product schema shared by ingestion, persistence and export.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ── Constants ────────────────────────────────────────────────────────

/// Canonical column order used by the upload template and the export.
pub const CANONICAL_COLUMNS: [&str; 6] = ["sku", "name", "price", "quantity", "category", "tx_date"];

/// Maximum SKU length (matches the `products.sku` column).
pub const MAX_SKU_LENGTH: usize = 64;

/// Maximum product name length.
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum category length.
pub const MAX_CATEGORY_LENGTH: usize = 120;

/// Fractional digits stored for prices.
pub const PRICE_SCALE: u32 = 2;

/// Integer digits available for prices (`NUMERIC(12, 2)`).
pub const MAX_PRICE_INTEGER_DIGITS: u32 = 10;

// ── Types ────────────────────────────────────────────────────────────

/// A validated product record in canonical shape.
///
/// Produced by the row normalizer and consumed by the upsert step; also the
/// input to the spreadsheet export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRow {
    pub sku: String,
    pub name: String,
    pub category: Option<String>,
    pub price: Decimal,
    pub quantity: i32,
    pub tx_date: NaiveDate,
}

/// Fields written on upsert, keyed separately by SKU.
///
/// `category` is never null here: an absent category is the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFields {
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub category: String,
    pub tx_date: NaiveDate,
}

impl ProductRow {
    /// Revenue for this row: `price * quantity`.
    pub fn revenue(&self) -> Decimal {
        revenue(self.price, self.quantity)
    }

    /// Split into the upsert key and the persisted fields.
    pub fn into_upsert(self) -> (String, ProductFields) {
        (
            self.sku,
            ProductFields {
                name: self.name,
                price: self.price,
                quantity: self.quantity,
                category: self.category.unwrap_or_default(),
                tx_date: self.tx_date,
            },
        )
    }
}

/// Revenue for a price and quantity.
pub fn revenue(price: Decimal, quantity: i32) -> Decimal {
    price * Decimal::from(quantity)
}
