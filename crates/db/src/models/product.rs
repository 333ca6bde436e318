//! Product entity model.

use chrono::NaiveDate;
use datalab_core::product::{self, ProductRow};
use datalab_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub sku: String,
    pub name: String,
    /// Empty string when the upload had no category.
    pub category: String,
    pub price: Decimal,
    pub quantity: i32,
    pub tx_date: NaiveDate,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Product {
    pub fn revenue(&self) -> Decimal {
        product::revenue(self.price, self.quantity)
    }

    /// Canonical shape used by the spreadsheet export.
    pub fn to_row(&self) -> ProductRow {
        ProductRow {
            sku: self.sku.clone(),
            name: self.name.clone(),
            category: (!self.category.is_empty()).then(|| self.category.clone()),
            price: self.price,
            quantity: self.quantity,
            tx_date: self.tx_date,
        }
    }
}

/// Product plus its derived revenue, as returned by the detail endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithRevenue {
    #[serde(flatten)]
    pub product: Product,
    pub revenue: Decimal,
}

impl From<Product> for ProductWithRevenue {
    fn from(product: Product) -> Self {
        let revenue = product.revenue();
        Self { product, revenue }
    }
}
