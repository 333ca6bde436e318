//! Shared query parameter types for API handlers.

use chrono::NaiveDate;
use datalab_core::reporting::ProductFilter;
use serde::{Deserialize, Deserializer};

/// Query parameters for the product listing
/// (`?date_from=&date_to=&category=&limit=&offset=`).
///
/// Blank values are treated as absent, so an unfilled filter form can be
/// submitted as-is.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListParams {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub date_to: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ProductListParams {
    pub fn filter(&self) -> ProductFilter {
        ProductFilter {
            date_from: self.date_from,
            date_to: self.date_to,
            category: self.category.clone(),
        }
    }
}

/// Deserialize an optional value, mapping empty or whitespace-only input to `None`.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
