//! Spreadsheet ingestion pipeline.
//!
//! Uploaded CSV/Excel files flow through four stages:
//!
//! - [`reader`]: dispatch on file extension and stream raw rows.
//! - [`columns`]: resolve the header row against the synonym table once per file.
//! - [`normalize`] (backed by [`coerce`]): turn each raw row into a [`ProductRow`].
//! - [`batch`]: process files in order and upsert through a [`ProductSink`],
//!   aborting the whole batch on the first failure.
//!
//! [`ProductRow`]: crate::product::ProductRow
//! [`ProductSink`]: batch::ProductSink

pub mod batch;
pub mod coerce;
pub mod columns;
pub mod normalize;
pub mod raw;
pub mod reader;

pub use batch::{BatchError, BatchSummary, Ingestor, ProductSink, UploadedFile};
pub use columns::{ColumnMap, ProductField};
pub use normalize::normalize_row;
pub use raw::{RawCell, RawRow};
pub use reader::RowReader;

/// Failure raised by the persistence collaborator during an upsert.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct PersistenceError(pub String);

/// Errors that abort an upload batch.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The file is missing, has an unrecognized format, or is not tabular.
    #[error("unreadable file: {reason}")]
    UnreadableFile { reason: String },

    /// A row (or the header row, line 1) violates the canonical schema.
    #[error("invalid row {line}: {reason}")]
    InvalidRow { line: usize, reason: String },

    /// The store rejected an upsert.
    #[error("could not save SKU {sku}: {source}")]
    Persistence {
        sku: String,
        #[source]
        source: PersistenceError,
    },
}

impl IngestError {
    pub(crate) fn unreadable(reason: impl Into<String>) -> Self {
        Self::UnreadableFile {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_row(line: usize, reason: impl Into<String>) -> Self {
        Self::InvalidRow {
            line,
            reason: reason.into(),
        }
    }
}
