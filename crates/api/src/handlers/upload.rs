//! Multipart spreadsheet upload.
//!
//! Collects the request's files and sheet selectors, then hands the batch to
//! the [`Ingestor`](datalab_core::ingest::Ingestor) with a PostgreSQL sink.

use axum::extract::{Multipart, State};
use axum::Json;
use datalab_core::ingest::{BatchSummary, UploadedFile};
use datalab_db::sink::PgProductSink;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field carrying one uploaded file (repeatable).
pub const FILES_FIELD: &str = "files";

/// Multipart field carrying one sheet selector (repeatable, paired with
/// `files` by position; blank means the first sheet).
pub const SHEET_NAMES_FIELD: &str = "sheet_names";

/// Outcome of a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResult {
    pub processed_files: usize,
    pub total_rows: usize,
    pub message: String,
}

impl From<BatchSummary> for UploadResult {
    fn from(summary: BatchSummary) -> Self {
        Self {
            processed_files: summary.processed_files,
            total_rows: summary.total_rows,
            message: summary.message(),
        }
    }
}

/// POST /api/v1/products/upload
///
/// Normalize and upsert every row of every uploaded file, in order. The
/// first bad file aborts the batch with 422; files before it stay committed.
pub async fn upload_products(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<UploadResult>>> {
    let mut files: Vec<UploadedFile> = Vec::new();
    let mut sheet_names: Vec<String> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let field_name = field.name().map(str::to_owned);
        match field_name.as_deref() {
            Some(FILES_FIELD) => {
                let name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;

                if bytes.len() > state.config.max_upload_bytes {
                    return Err(AppError::BadRequest(format!(
                        "{name} is larger than the {} byte limit",
                        state.config.max_upload_bytes
                    )));
                }

                files.push(UploadedFile {
                    name,
                    bytes: bytes.to_vec(),
                    sheet: None,
                });
            }
            Some(SHEET_NAMES_FIELD) => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                sheet_names.push(text);
            }
            _ => {}
        }
    }

    pair_sheet_names(&mut files, sheet_names);
    check_file_count(&files, state.config.max_upload_files)?;

    let sink = PgProductSink::new(state.pool.clone());
    let summary = state.ingestor.run(files, &sink).await?;

    Ok(Json(DataResponse {
        data: UploadResult::from(summary),
    }))
}

/// Assign the i-th sheet selector to the i-th file. Blank selectors and
/// selectors without a file are ignored.
fn pair_sheet_names(files: &mut [UploadedFile], sheet_names: Vec<String>) {
    for (file, sheet) in files.iter_mut().zip(sheet_names) {
        let sheet = sheet.trim();
        if !sheet.is_empty() {
            file.sheet = Some(sheet.to_string());
        }
    }
}

/// At least one non-empty file, and no more than `max`.
fn check_file_count(files: &[UploadedFile], max: usize) -> AppResult<()> {
    let submitted = files.iter().filter(|f| !f.is_empty()).count();
    if submitted == 0 {
        return Err(AppError::BadRequest(
            "At least one file is required".to_string(),
        ));
    }
    if submitted > max {
        return Err(AppError::BadRequest(format!(
            "Too many files: {submitted} submitted, at most {max} allowed"
        )));
    }
    Ok(())
}
