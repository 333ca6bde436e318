//! Reporting parameters and the product listing filter.
//!
//! The aggregates themselves are computed in SQL by the repository layer;
//! this module owns the limits they use and the validated filter shape.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Report limits
// ---------------------------------------------------------------------------

/// Products at or below this quantity are reported as low stock.
pub const LOW_STOCK_THRESHOLD: i32 = 5;

/// Maximum rows in the low-stock report.
pub const LOW_STOCK_LIMIT: i64 = 10;

/// Categories shown on the dashboard, ranked by revenue.
pub const TOP_CATEGORY_LIMIT: i64 = 5;

/// SKUs in the top-revenue report.
pub const TOP_SKU_LIMIT: i64 = 10;

// ---------------------------------------------------------------------------
// Listing pagination
// ---------------------------------------------------------------------------

/// Default page size for the product listing.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Maximum page size for the product listing.
pub const MAX_LIST_LIMIT: i64 = 1000;

/// Clamp a requested page size into `1..=MAX_LIST_LIMIT`.
pub fn clamp_list_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Filter for the product listing. All bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Case-insensitive substring of the category.
    pub category: Option<String>,
}

impl ProductFilter {
    /// Reject an inverted date range.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(CoreError::Validation(format!(
                    "date_from ({from}) is after date_to ({to})"
                )));
            }
        }
        Ok(())
    }

    /// `ILIKE` pattern for the category filter, or `None` when blank.
    ///
    /// `%`, `_` and `\` in the input match literally.
    pub fn category_pattern(&self) -> Option<String> {
        let needle = self.category.as_deref()?.trim();
        if needle.is_empty() {
            return None;
        }

        let mut pattern = String::with_capacity(needle.len() + 2);
        pattern.push('%');
        for ch in needle.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        Some(pattern)
    }
}
