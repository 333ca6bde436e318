//! Aggregate rows for the dashboard and statistics reports.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Headline numbers across all products.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DashboardKpis {
    pub product_count: i64,
    pub total_quantity: i64,
    /// `None` when there are no products.
    pub avg_price: Option<Decimal>,
}

/// Revenue summed per category.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue: Decimal,
    /// Products in the category.
    pub items: i64,
}

/// Dashboard payload.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub kpis: DashboardKpis,
    pub top_categories: Vec<CategoryRevenue>,
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Revenue and product count per calendar month (`month` is the first day).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MonthlyRevenue {
    pub month: NaiveDate,
    pub revenue: Decimal,
    /// Products whose transaction falls in the month.
    pub items: i64,
}

/// Revenue and average price per calendar quarter.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuarterlyRevenue {
    pub year: i32,
    pub quarter: i32,
    pub revenue: Decimal,
    pub avg_price: Decimal,
}

/// Mean price and total units per category.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryStats {
    pub category: String,
    pub mean_price: Decimal,
    pub total_qty: i64,
}

/// A SKU ranked by revenue.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TopSku {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub revenue: Decimal,
    pub qty: i64,
}

/// A product at or below the low-stock threshold.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LowStockItem {
    pub sku: String,
    pub name: String,
    pub quantity: i32,
}

/// Statistics payload.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub monthly: Vec<MonthlyRevenue>,
    pub quarterly: Vec<QuarterlyRevenue>,
    pub by_category: Vec<CategoryStats>,
    pub top_skus: Vec<TopSku>,
    pub low_stock: Vec<LowStockItem>,
}
