//! Batch upsert orchestrator.
//!
//! Files are processed strictly in input order, one at a time. The first
//! unreadable file, invalid row or persistence failure aborts the whole
//! batch; files completed before it stay committed.
//!
//! Each file is staged under a unique name in the upload directory and read
//! on the blocking pool; the staged copy is removed once it has been read.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tempfile::NamedTempFile;

use super::columns::ColumnMap;
use super::normalize::normalize_row;
use super::reader::RowReader;
use super::{IngestError, PersistenceError};
use crate::product::{ProductFields, ProductRow};

/// Fallback staging name when an upload's name has no usable base name.
const DEFAULT_STAGED_NAME: &str = "upload";

/// Persistence collaborator: insert or update one product keyed by SKU.
#[async_trait]
pub trait ProductSink: Send + Sync {
    async fn upsert(&self, sku: &str, fields: &ProductFields) -> Result<(), PersistenceError>;
}

/// One file from an upload request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Name as supplied by the client.
    pub name: String,
    pub bytes: Vec<u8>,
    /// Workbook sheet to read; first sheet when `None`.
    pub sheet: Option<String>,
}

impl UploadedFile {
    /// Entries with no name or no content are skipped without being counted.
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty() || self.bytes.is_empty()
    }
}

/// Outcome of a fully successful batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub processed_files: usize,
    /// Data rows across all files, duplicates of a SKU included.
    pub total_rows: usize,
}

impl BatchSummary {
    /// Human-readable confirmation shown to the uploader.
    pub fn message(&self) -> String {
        format!(
            "{} file(s) uploaded successfully, {} row(s) changed.",
            self.processed_files, self.total_rows
        )
    }
}

/// A batch aborted on `file_name`.
#[derive(Debug, thiserror::Error)]
#[error("Error processing {file_name}: {source}")]
pub struct BatchError {
    pub file_name: String,
    /// Files fully committed before the failure.
    pub processed_files: usize,
    /// Rows committed before the failure.
    pub total_rows: usize,
    #[source]
    pub source: IngestError,
}

/// Runs upload batches against a staging directory.
#[derive(Debug, Clone)]
pub struct Ingestor {
    upload_dir: PathBuf,
}

impl Ingestor {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Process `files` in order, upserting every row through `sink`.
    pub async fn run<S>(&self, files: Vec<UploadedFile>, sink: &S) -> Result<BatchSummary, BatchError>
    where
        S: ProductSink + ?Sized,
    {
        let mut summary = BatchSummary::default();

        for file in files {
            if file.is_empty() {
                continue;
            }

            let file_name = file.name.clone();
            let abort = |summary: &BatchSummary, source: IngestError| {
                tracing::warn!(
                    file = %file_name,
                    processed_files = summary.processed_files,
                    error = %source,
                    "Upload batch aborted",
                );
                BatchError {
                    file_name: file_name.clone(),
                    processed_files: summary.processed_files,
                    total_rows: summary.total_rows,
                    source,
                }
            };

            let staging = self.clone();
            let loaded = tokio::task::spawn_blocking(move || staging.load_file(&file))
                .await
                .map_err(|e| IngestError::unreadable(format!("upload task failed: {e}")))
                .and_then(|rows| rows);
            let rows = match loaded {
                Ok(rows) => rows,
                Err(e) => return Err(abort(&summary, e)),
            };
            let row_count = rows.len();

            for row in rows {
                let (sku, fields) = row.into_upsert();
                if let Err(source) = sink.upsert(&sku, &fields).await {
                    return Err(abort(&summary, IngestError::Persistence { sku, source }));
                }
            }

            summary.processed_files += 1;
            summary.total_rows += row_count;
            tracing::info!(file = %file_name, rows = row_count, "Upload file committed");
        }

        tracing::info!(
            processed_files = summary.processed_files,
            total_rows = summary.total_rows,
            "Upload batch complete",
        );
        Ok(summary)
    }

    /// Stage, read and normalize one file. Performs no persistence.
    ///
    /// Blocking; the staged copy is deleted when this returns.
    pub fn load_file(&self, file: &UploadedFile) -> Result<Vec<ProductRow>, IngestError> {
        let staged = self.stage(file)?;
        load_rows(staged.path(), file.sheet.as_deref())
    }

    /// Write an upload into the staging directory under a unique name that
    /// keeps the base name and extension (`stock-a1B2c3.csv`).
    ///
    /// The file is removed when the returned handle is dropped.
    pub fn stage(&self, file: &UploadedFile) -> Result<NamedTempFile, IngestError> {
        std::fs::create_dir_all(&self.upload_dir).map_err(|e| {
            IngestError::unreadable(format!(
                "cannot create upload directory {}: {e}",
                self.upload_dir.display()
            ))
        })?;

        let base = Path::new(staged_name(&file.name));
        let stem = base
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(DEFAULT_STAGED_NAME);
        let suffix = base
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();

        let mut staged = tempfile::Builder::new()
            .prefix(&format!("{stem}-"))
            .suffix(&suffix)
            .tempfile_in(&self.upload_dir)
            .map_err(|e| IngestError::unreadable(format!("cannot stage upload: {e}")))?;
        staged
            .write_all(&file.bytes)
            .and_then(|()| staged.flush())
            .map_err(|e| IngestError::unreadable(format!("cannot stage upload: {e}")))?;
        Ok(staged)
    }
}

/// Read every row of a file and normalize it. Stops at the first failure.
pub fn load_rows(path: &Path, sheet: Option<&str>) -> Result<Vec<ProductRow>, IngestError> {
    let reader = RowReader::open(path, sheet)?;
    let columns = ColumnMap::resolve(reader.headers())?;

    reader
        .map(|raw| raw.and_then(|row| normalize_row(&columns, &row)))
        .collect()
}

/// Reduce a client-supplied name to a bare file name.
fn staged_name(name: &str) -> &str {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if base.is_empty() || base == "." || base == ".." {
        DEFAULT_STAGED_NAME
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal::Decimal;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory sink recording the final state per SKU and every call.
    #[derive(Default)]
    struct MemorySink {
        products: Mutex<HashMap<String, ProductFields>>,
        calls: Mutex<Vec<String>>,
        fail_on: Option<String>,
    }

    #[async_trait]
    impl ProductSink for MemorySink {
        async fn upsert(&self, sku: &str, fields: &ProductFields) -> Result<(), PersistenceError> {
            if self.fail_on.as_deref() == Some(sku) {
                return Err(PersistenceError("connection reset".to_string()));
            }
            self.calls.lock().unwrap().push(sku.to_string());
            self.products
                .lock()
                .unwrap()
                .insert(sku.to_string(), fields.clone());
            Ok(())
        }
    }

    impl MemorySink {
        fn len(&self) -> usize {
            self.products.lock().unwrap().len()
        }

        fn get(&self, sku: &str) -> Option<ProductFields> {
            self.products.lock().unwrap().get(sku).cloned()
        }
    }

    const HEADER: &str = "sku,name,price,qty,category,transaction_date\n";

    fn csv(name: &str, rows: &[&str]) -> UploadedFile {
        let mut body = HEADER.to_string();
        for row in rows {
            body.push_str(row);
            body.push('\n');
        }
        UploadedFile {
            name: name.to_string(),
            bytes: body.into_bytes(),
            sheet: None,
        }
    }

    fn ingestor(dir: &tempfile::TempDir) -> Ingestor {
        Ingestor::new(dir.path().join("uploads"))
    }

    #[tokio::test]
    async fn commits_all_files_and_counts_rows() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MemorySink::default();
        let files = vec![
            csv("a.csv", &["A-1,Widget,1.00,1,Tools,2024-01-01", "A-2,Nut,0.10,100,,2024-01-02"]),
            csv("b.csv", &["B-1,Bolt,0.25,40,Hardware,01/15/2024"]),
            csv("c.csv", &["C-1,Saw,\"$1,234.50\",2,Tools,2024-02-01"]),
        ];

        let summary = ingestor(&dir).run(files, &sink).await.unwrap();

        assert_eq!(
            summary,
            BatchSummary {
                processed_files: 3,
                total_rows: 4
            }
        );
        assert_eq!(sink.len(), 4);
        assert_eq!(sink.get("A-2").unwrap().category, "");
    }

    #[tokio::test]
    async fn last_occurrence_of_a_sku_wins() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MemorySink::default();
        let files = vec![
            csv("first.csv", &["X-1,Old,1.00,1,,2024-01-01", "X-1,Newer,2.00,2,,2024-01-02"]),
            csv("second.csv", &["X-1,Newest,3.00,3,,2024-01-03"]),
        ];

        let summary = ingestor(&dir).run(files, &sink).await.unwrap();

        assert_eq!(summary.total_rows, 3);
        assert_eq!(sink.len(), 1);
        let fields = sink.get("X-1").unwrap();
        assert_eq!(fields.name, "Newest");
        assert_eq!(fields.price, Decimal::new(300, 2));
        assert_eq!(fields.quantity, 3);
    }

    #[tokio::test]
    async fn invalid_row_aborts_batch_after_earlier_files() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MemorySink::default();
        let files = vec![
            csv("one.csv", &["A-1,Widget,1.00,1,,2024-01-01"]),
            csv("two.csv", &["B-1,Bolt,2.00,1,,2024-01-01", "B-2,Bad,-5,1,,2024-01-01"]),
            csv("three.csv", &["C-1,Saw,3.00,1,,2024-01-01"]),
        ];

        let err = ingestor(&dir).run(files, &sink).await.unwrap_err();

        assert_eq!(err.file_name, "two.csv");
        assert_eq!(err.processed_files, 1);
        assert_matches!(err.source, IngestError::InvalidRow { line: 3, .. });
        assert!(err.to_string().starts_with("Error processing two.csv: invalid row 3"));

        // File 1 committed, nothing from file 2 or 3.
        assert_eq!(*sink.calls.lock().unwrap(), vec!["A-1".to_string()]);
    }

    #[tokio::test]
    async fn unreadable_file_aborts_batch() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MemorySink::default();
        let files = vec![
            csv("ok.csv", &["A-1,Widget,1.00,1,,2024-01-01"]),
            UploadedFile {
                name: "notes.pdf".to_string(),
                bytes: b"%PDF-1.7".to_vec(),
                sheet: None,
            },
        ];

        let err = ingestor(&dir).run(files, &sink).await.unwrap_err();

        assert_eq!(err.file_name, "notes.pdf");
        assert_eq!(err.processed_files, 1);
        assert_matches!(err.source, IngestError::UnreadableFile { .. });
        assert_eq!(sink.len(), 1);
    }

    #[tokio::test]
    async fn missing_required_column_aborts_batch() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MemorySink::default();
        let files = vec![UploadedFile {
            name: "partial.csv".to_string(),
            bytes: b"sku,name\nA-1,Widget\n".to_vec(),
            sheet: None,
        }];

        let err = ingestor(&dir).run(files, &sink).await.unwrap_err();

        assert_eq!(err.processed_files, 0);
        assert_matches!(err.source, IngestError::InvalidRow { line: 1, .. });
    }

    #[tokio::test]
    async fn persistence_failure_aborts_batch() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MemorySink {
            fail_on: Some("B-1".to_string()),
            ..Default::default()
        };
        let files = vec![
            csv("one.csv", &["A-1,Widget,1.00,1,,2024-01-01"]),
            csv("two.csv", &["B-1,Bolt,2.00,1,,2024-01-01"]),
        ];

        let err = ingestor(&dir).run(files, &sink).await.unwrap_err();

        assert_eq!(err.file_name, "two.csv");
        assert_matches!(err.source, IngestError::Persistence { ref sku, .. } if sku == "B-1");
        assert_eq!(
            err.to_string(),
            "Error processing two.csv: could not save SKU B-1: connection reset"
        );
    }

    #[tokio::test]
    async fn empty_entries_are_skipped_and_not_counted() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MemorySink::default();
        let files = vec![
            UploadedFile {
                name: String::new(),
                bytes: Vec::new(),
                sheet: None,
            },
            UploadedFile {
                name: "blank.csv".to_string(),
                bytes: Vec::new(),
                sheet: None,
            },
            csv("real.csv", &["A-1,Widget,1.00,1,,2024-01-01"]),
        ];

        let summary = ingestor(&dir).run(files, &sink).await.unwrap();

        assert_eq!(summary.processed_files, 1);
        assert_eq!(summary.total_rows, 1);
    }

    #[tokio::test]
    async fn header_only_file_counts_as_processed() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MemorySink::default();
        let summary = ingestor(&dir)
            .run(vec![csv("empty.csv", &[])], &sink)
            .await
            .unwrap();

        assert_eq!(summary.processed_files, 1);
        assert_eq!(summary.total_rows, 0);
    }

    fn staged_files(ingestor: &Ingestor) -> usize {
        std::fs::read_dir(ingestor.upload_dir()).unwrap().count()
    }

    #[test]
    fn stages_inside_upload_dir_keeping_base_name_and_extension() {
        let dir = tempfile::tempdir().unwrap();
        let ingestor = ingestor(&dir);
        let staged = ingestor
            .stage(&UploadedFile {
                name: "../../etc/stock.csv".to_string(),
                bytes: b"sku\n".to_vec(),
                sheet: None,
            })
            .unwrap();

        let path = staged.path();
        assert_eq!(path.parent(), Some(ingestor.upload_dir()));
        let file_name = path.file_name().unwrap().to_str().unwrap();
        assert!(file_name.starts_with("stock-"), "staged as {file_name}");
        assert!(file_name.ends_with(".csv"), "staged as {file_name}");
        assert!(path.is_file());

        drop(staged);
        assert_eq!(staged_files(&ingestor), 0);
    }

    #[test]
    fn same_named_uploads_are_staged_separately() {
        let dir = tempfile::tempdir().unwrap();
        let ingestor = ingestor(&dir);
        let first = ingestor
            .stage(&csv("stock.csv", &["FROM-FIRST,Widget,1.00,1,,2024-01-01"]))
            .unwrap();
        let second = ingestor
            .stage(&csv("stock.csv", &["FROM-SECOND,Widget,1.00,1,,2024-01-01"]))
            .unwrap();

        assert_ne!(first.path(), second.path());
        let rows = load_rows(first.path(), None).unwrap();
        assert_eq!(rows[0].sku, "FROM-FIRST");
        let rows = load_rows(second.path(), None).unwrap();
        assert_eq!(rows[0].sku, "FROM-SECOND");
    }

    #[tokio::test]
    async fn staged_copies_are_removed_after_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let ingestor = ingestor(&dir);
        let sink = MemorySink::default();
        let files = vec![
            csv("stock.csv", &["A-1,Widget,1.00,1,,2024-01-01"]),
            csv("stock.csv", &["B-1,Bolt,2.00,1,,2024-01-01", "B-2,Bad,-5,1,,2024-01-01"]),
        ];

        ingestor.run(files, &sink).await.unwrap_err();

        assert_eq!(sink.len(), 1);
        assert_eq!(staged_files(&ingestor), 0);
    }

    #[test]
    fn staged_name_strips_directories() {
        assert_eq!(staged_name("a/b/c.xlsx"), "c.xlsx");
        assert_eq!(staged_name("C:\\Users\\me\\c.csv"), "c.csv");
        assert_eq!(staged_name(".."), DEFAULT_STAGED_NAME);
        assert_eq!(staged_name("dir/"), DEFAULT_STAGED_NAME);
    }

    #[test]
    fn summary_message_reports_counts() {
        let summary = BatchSummary {
            processed_files: 2,
            total_rows: 14,
        };
        assert_eq!(
            summary.message(),
            "2 file(s) uploaded successfully, 14 row(s) changed."
        );
    }
}
