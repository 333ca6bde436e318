//! Domain core for the datalab inventory/sales service.
//!
//! Pure types and logic with no database or HTTP concerns: the canonical
//! product schema, the spreadsheet ingestion pipeline, spreadsheet export,
//! and reporting parameters.

pub mod error;
pub mod export;
pub mod ingest;
pub mod product;
pub mod reporting;
pub mod types;
