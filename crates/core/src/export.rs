//! Spreadsheet serializers for the upload template and the product export.
//!
//! Both produce `.xlsx` bytes with the canonical header row, so an exported
//! file can be edited and uploaded again unchanged.

use chrono::Datelike;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet, XlsxError};

use crate::error::CoreError;
use crate::product::{ProductRow, CANONICAL_COLUMNS};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Download name for the blank upload template.
pub const TEMPLATE_FILE_NAME: &str = "product_template.xlsx";

/// Download name for the product export.
pub const EXPORT_FILE_NAME: &str = "product_export.xlsx";

/// MIME type of `.xlsx` workbooks.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const SHEET_NAME: &str = "Products";
const PRICE_FORMAT: &str = "0.00";
const DATE_FORMAT: &str = "yyyy-mm-dd";

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// A workbook whose only row is the canonical header.
pub fn build_upload_template() -> Result<Vec<u8>, CoreError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    write_header(worksheet).map_err(xlsx_error)?;
    workbook.save_to_buffer().map_err(xlsx_error)
}

/// A workbook with the canonical header followed by one row per record.
///
/// Rows are written in the order given; see [`sort_for_export`].
pub fn rows_to_spreadsheet(rows: &[ProductRow]) -> Result<Vec<u8>, CoreError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    write_header(worksheet).map_err(xlsx_error)?;

    let price_format = Format::new().set_num_format(PRICE_FORMAT);
    let date_format = Format::new().set_num_format(DATE_FORMAT);

    for (index, row) in rows.iter().enumerate() {
        let r = u32::try_from(index + 1)
            .map_err(|_| CoreError::Internal("too many rows for one sheet".to_string()))?;
        write_row(worksheet, r, row, &price_format, &date_format).map_err(xlsx_error)?;
    }

    workbook.save_to_buffer().map_err(xlsx_error)
}

/// Export order: newest transaction first, then SKU ascending.
pub fn sort_for_export(rows: &mut [ProductRow]) {
    rows.sort_by(|a, b| b.tx_date.cmp(&a.tx_date).then_with(|| a.sku.cmp(&b.sku)));
}

fn write_header(worksheet: &mut Worksheet) -> Result<(), XlsxError> {
    worksheet.set_name(SHEET_NAME)?;
    let bold = Format::new().set_bold();
    for (col, name) in CANONICAL_COLUMNS.iter().enumerate() {
        // Six columns always fit in a u16.
        worksheet.write_string_with_format(0, col as u16, *name, &bold)?;
    }
    worksheet.set_column_width(1, 32)?;
    worksheet.set_column_width(5, 12)?;
    Ok(())
}

fn write_row(
    worksheet: &mut Worksheet,
    r: u32,
    row: &ProductRow,
    price_format: &Format,
    date_format: &Format,
) -> Result<(), XlsxError> {
    worksheet.write_string(r, 0, &row.sku)?;
    worksheet.write_string(r, 1, &row.name)?;
    worksheet.write_number_with_format(r, 2, row.price.to_f64().unwrap_or_default(), price_format)?;
    worksheet.write_number(r, 3, row.quantity)?;
    if let Some(category) = row.category.as_deref().filter(|c| !c.is_empty()) {
        worksheet.write_string(r, 4, category)?;
    }

    let date = &row.tx_date;
    match ExcelDateTime::from_ymd(date.year() as u16, date.month() as u8, date.day() as u8) {
        Ok(excel_date) => {
            worksheet.write_datetime_with_format(r, 5, &excel_date, date_format)?;
        }
        // Dates before 1900 have no serial; keep them readable as ISO text.
        Err(_) => {
            worksheet.write_string(r, 5, date.to_string())?;
        }
    }
    Ok(())
}

fn xlsx_error(e: XlsxError) -> CoreError {
    CoreError::Internal(format!("spreadsheet write failed: {e}"))
}
