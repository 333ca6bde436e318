//! Spreadsheet downloads: the product export and the blank upload template.

use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use datalab_core::export::{
    build_upload_template, rows_to_spreadsheet, sort_for_export, EXPORT_FILE_NAME,
    TEMPLATE_FILE_NAME, XLSX_CONTENT_TYPE,
};
use datalab_core::product::ProductRow;
use datalab_db::models::product::Product;
use datalab_db::repositories::ProductRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/v1/products/export
///
/// Every product as `product_export.xlsx`, newest transaction first then SKU.
pub async fn export_products(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let products = ProductRepo::list_for_export(&state.pool).await?;
    let mut rows: Vec<ProductRow> = products.iter().map(Product::to_row).collect();
    sort_for_export(&mut rows);
    let count = rows.len();

    let bytes = tokio::task::spawn_blocking(move || rows_to_spreadsheet(&rows))
        .await
        .map_err(|e| AppError::InternalError(format!("Export task failed: {e}")))??;

    tracing::info!(rows = count, "Product export generated");
    Ok(xlsx_attachment(EXPORT_FILE_NAME, bytes))
}

/// GET /api/v1/products/template
///
/// A workbook containing only the canonical header row.
pub async fn download_template() -> AppResult<impl IntoResponse> {
    let bytes = build_upload_template()?;
    Ok(xlsx_attachment(TEMPLATE_FILE_NAME, bytes))
}

fn xlsx_attachment(file_name: &str, bytes: Vec<u8>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
}
