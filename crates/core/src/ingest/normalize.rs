//! Row normalizer: one raw row in, one canonical [`ProductRow`] out.

use super::coerce::{coerce_date, coerce_price, coerce_quantity, coerce_text, CoerceError};
use super::columns::{ColumnMap, ProductField};
use super::raw::{RawCell, RawRow, EMPTY_CELL};
use super::IngestError;
use crate::product::{ProductRow, MAX_CATEGORY_LENGTH, MAX_NAME_LENGTH, MAX_SKU_LENGTH};

/// Normalize a raw row using a column map resolved from its file's header.
///
/// Pure: no I/O. Errors carry the source line and the canonical field name.
pub fn normalize_row(columns: &ColumnMap, row: &RawRow) -> Result<ProductRow, IngestError> {
    let sku = required_text(columns, row, ProductField::Sku, MAX_SKU_LENGTH)?;
    let name = required_text(columns, row, ProductField::Name, MAX_NAME_LENGTH)?;

    let category = coerce_text(cell(columns, row, ProductField::Category))
        .map_err(|e| field_error(row, ProductField::Category, e))?;
    if let Some(c) = &category {
        check_length(row, ProductField::Category, c, MAX_CATEGORY_LENGTH)?;
    }

    let price = coerce_price(cell(columns, row, ProductField::Price))
        .map_err(|e| field_error(row, ProductField::Price, e))?;
    let quantity = coerce_quantity(cell(columns, row, ProductField::Quantity))
        .map_err(|e| field_error(row, ProductField::Quantity, e))?;
    let tx_date = coerce_date(cell(columns, row, ProductField::TxDate))
        .map_err(|e| field_error(row, ProductField::TxDate, e))?;

    Ok(ProductRow {
        sku,
        name,
        category,
        price,
        quantity,
        tx_date,
    })
}

fn cell<'r>(columns: &ColumnMap, row: &'r RawRow, field: ProductField) -> &'r RawCell {
    match columns.index_of(field) {
        Some(index) => row.get(index),
        None => &EMPTY_CELL,
    }
}

fn required_text(
    columns: &ColumnMap,
    row: &RawRow,
    field: ProductField,
    max_len: usize,
) -> Result<String, IngestError> {
    let value = coerce_text(cell(columns, row, field))
        .map_err(|e| field_error(row, field, e))?
        .ok_or_else(|| field_error(row, field, CoerceError::Missing))?;
    check_length(row, field, &value, max_len)?;
    Ok(value)
}

fn check_length(
    row: &RawRow,
    field: ProductField,
    value: &str,
    max_len: usize,
) -> Result<(), IngestError> {
    if value.chars().count() > max_len {
        return Err(IngestError::invalid_row(
            row.line,
            format!("{field}: longer than {max_len} characters"),
        ));
    }
    Ok(())
}

fn field_error(row: &RawRow, field: ProductField, err: CoerceError) -> IngestError {
    IngestError::invalid_row(row.line, format!("{field}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::CANONICAL_COLUMNS;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn text(s: &str) -> RawCell {
        RawCell::Text(s.to_string())
    }

    fn canonical_map() -> ColumnMap {
        ColumnMap::resolve(&CANONICAL_COLUMNS).unwrap()
    }

    fn raw(cells: Vec<RawCell>) -> RawRow {
        RawRow { line: 7, cells }
    }

    /// Re-derive a raw row in canonical column order from a normalized row.
    fn to_raw(row: &ProductRow) -> RawRow {
        raw(vec![
            text(&row.sku),
            text(&row.name),
            text(&row.price.to_string()),
            RawCell::Int(i64::from(row.quantity)),
            row.category.as_deref().map(text).unwrap_or(RawCell::Empty),
            text(&row.tx_date.to_string()),
        ])
    }

    #[test]
    fn normalizes_a_typical_row() {
        let row = raw(vec![
            text(" SKU-1 "),
            text("Widget"),
            text("$1,234.50"),
            text("10.0"),
            text("Tools"),
            text("03/01/2024"),
        ]);
        let product = normalize_row(&canonical_map(), &row).unwrap();

        assert_eq!(product.sku, "SKU-1");
        assert_eq!(product.name, "Widget");
        assert_eq!(product.price, Decimal::new(123450, 2));
        assert_eq!(product.quantity, 10);
        assert_eq!(product.category.as_deref(), Some("Tools"));
        assert_eq!(product.tx_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn normalization_is_idempotent() {
        let first = normalize_row(
            &canonical_map(),
            &raw(vec![
                RawCell::Float(1001.0),
                text("  Gadget "),
                RawCell::Float(19.9),
                RawCell::Float(3.0),
                RawCell::Empty,
                RawCell::DateTime(
                    NaiveDate::from_ymd_opt(2024, 1, 1)
                        .unwrap()
                        .and_hms_opt(0, 0, 0)
                        .unwrap(),
                ),
            ]),
        )
        .unwrap();

        let second = normalize_row(&canonical_map(), &to_raw(&first)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn blank_category_is_none() {
        let row = raw(vec![
            text("A"),
            text("B"),
            text("1"),
            text("1"),
            text("   "),
            text("2024-01-01"),
        ]);
        assert_eq!(normalize_row(&canonical_map(), &row).unwrap().category, None);
    }

    #[test]
    fn missing_quantity_column_defaults_to_zero() {
        let map = ColumnMap::resolve(&["sku", "name", "price", "tx_date"]).unwrap();
        let row = raw(vec![text("A"), text("B"), text("2.50"), text("2024-01-01")]);
        assert_eq!(normalize_row(&map, &row).unwrap().quantity, 0);
    }

    #[test]
    fn blank_sku_is_invalid() {
        let row = raw(vec![
            text("  "),
            text("B"),
            text("1"),
            text("1"),
            RawCell::Empty,
            text("2024-01-01"),
        ]);
        let err = normalize_row(&canonical_map(), &row).unwrap_err();
        assert_matches!(err, IngestError::InvalidRow { line: 7, ref reason }
            if reason == "sku: value is required");
    }

    #[test]
    fn negative_price_names_line_and_field() {
        let row = raw(vec![
            text("A"),
            text("B"),
            text("-5"),
            text("1"),
            RawCell::Empty,
            text("2024-01-01"),
        ]);
        let err = normalize_row(&canonical_map(), &row).unwrap_err();
        assert_eq!(err.to_string(), "invalid row 7: price: negative value \"-5\"");
    }

    #[test]
    fn fractional_quantity_is_invalid() {
        let row = raw(vec![
            text("A"),
            text("B"),
            text("1"),
            text("10.5"),
            RawCell::Empty,
            text("2024-01-01"),
        ]);
        assert_matches!(
            normalize_row(&canonical_map(), &row),
            Err(IngestError::InvalidRow { .. })
        );
    }

    #[test]
    fn overlong_sku_is_invalid() {
        let long = "X".repeat(MAX_SKU_LENGTH + 1);
        let row = raw(vec![
            text(&long),
            text("B"),
            text("1"),
            text("1"),
            RawCell::Empty,
            text("2024-01-01"),
        ]);
        let err = normalize_row(&canonical_map(), &row).unwrap_err();
        assert_eq!(err.to_string(), "invalid row 7: sku: longer than 64 characters");
    }

    #[test]
    fn unparseable_date_is_invalid() {
        let row = raw(vec![
            text("A"),
            text("B"),
            text("1"),
            text("1"),
            RawCell::Empty,
            text("soon"),
        ]);
        assert_matches!(
            normalize_row(&canonical_map(), &row),
            Err(IngestError::InvalidRow { line: 7, .. })
        );
    }

    #[test]
    fn error_cell_in_name_is_invalid() {
        let row = raw(vec![
            text("A"),
            RawCell::Error("#N/A".to_string()),
            text("1"),
            text("1"),
            RawCell::Empty,
            text("2024-01-01"),
        ]);
        let err = normalize_row(&canonical_map(), &row).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid row 7: name: spreadsheet error value: \"#N/A\""
        );
    }
}
