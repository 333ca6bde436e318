//! Type coercers: raw cell values to typed product fields.
//!
//! All functions here are pure. Failures carry the offending value so the
//! normalizer can build a row-level message.

use std::str::FromStr;

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::raw::RawCell;
use crate::product::{MAX_PRICE_INTEGER_DIGITS, PRICE_SCALE};

/// Currency symbols stripped from price text.
pub const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥', '₺', '₹', '₽', '₩'];

/// Date-only text formats, tried in order. `%y` precedes `%Y` so that
/// `01/02/24` is not read as year 24.
pub const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%y", "%m/%d/%Y", "%m-%d-%y", "%m-%d-%Y", "%d.%m.%Y",
];

/// Date-time text formats; the time of day is discarded.
pub const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Largest serial in the 1900 date system (9999-12-31).
pub const MAX_DATE_SERIAL: i64 = 2_958_465;

/// Fractional digits kept from float cells before the price scale check.
const FLOAT_NOISE_DP: u32 = 6;

/// Why a cell could not be coerced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoerceError {
    #[error("value is required")]
    Missing,

    #[error("not a number: {0:?}")]
    NotNumeric(String),

    #[error("negative value: {0:?}")]
    Negative(String),

    #[error("more than two decimal places: {0:?}")]
    TooPrecise(String),

    #[error("value out of range: {0:?}")]
    OutOfRange(String),

    #[error("not a whole number: {0:?}")]
    NotIntegral(String),

    #[error("unrecognized date: {0:?}")]
    InvalidDate(String),

    #[error("spreadsheet error value: {0:?}")]
    CellError(String),
}

// ── Text ─────────────────────────────────────────────────────────────

/// Coerce a cell to trimmed text. Blank cells yield `None`.
///
/// Integral floats render without a fractional part so that a numeric SKU
/// typed into a spreadsheet (`1001.0`) reads back as `"1001"`. Error cells
/// are rejected rather than read as their `#N/A`-style text.
pub fn coerce_text(cell: &RawCell) -> Result<Option<String>, CoerceError> {
    let text = match cell {
        RawCell::Empty => return Ok(None),
        RawCell::Text(s) => s.trim().to_string(),
        RawCell::Int(n) => n.to_string(),
        RawCell::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", *f as i64)
        }
        RawCell::Float(f) => f.to_string(),
        RawCell::Bool(b) => b.to_string(),
        RawCell::DateTime(dt) => dt.date().to_string(),
        RawCell::Error(e) => return Err(CoerceError::CellError(e.clone())),
    };

    if text.is_empty() {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}

// ── Price ────────────────────────────────────────────────────────────

/// Coerce a cell to a non-negative price with at most two decimal places.
///
/// Text may carry currency symbols, thousands separators and whitespace:
/// `"$1,234.50"` becomes `1234.50`. The result always has scale 2.
pub fn coerce_price(cell: &RawCell) -> Result<Decimal, CoerceError> {
    let value = match cell {
        RawCell::Empty => return Err(CoerceError::Missing),
        RawCell::Text(s) if s.trim().is_empty() => return Err(CoerceError::Missing),
        RawCell::Text(s) => {
            parse_decimal_text(s).ok_or_else(|| CoerceError::NotNumeric(s.clone()))?
        }
        RawCell::Int(n) => Decimal::from(*n),
        RawCell::Float(f) => decimal_from_float(*f)?,
        RawCell::Error(e) => return Err(CoerceError::CellError(e.clone())),
        other => return Err(CoerceError::NotNumeric(other.to_string())),
    };

    check_price(value, cell)
}

fn check_price(value: Decimal, cell: &RawCell) -> Result<Decimal, CoerceError> {
    if value.is_zero() {
        return Ok(Decimal::new(0, PRICE_SCALE));
    }
    if value.is_sign_negative() {
        return Err(CoerceError::Negative(cell.to_string()));
    }

    let mut value = value.normalize();
    if value.scale() > PRICE_SCALE {
        return Err(CoerceError::TooPrecise(cell.to_string()));
    }
    let limit = Decimal::from(10_i64.pow(MAX_PRICE_INTEGER_DIGITS));
    if value.trunc() >= limit {
        return Err(CoerceError::OutOfRange(cell.to_string()));
    }

    value.rescale(PRICE_SCALE);
    Ok(value)
}

/// Strip currency symbols, thousands separators and whitespace, then parse.
fn parse_decimal_text(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && *c != '_' && !CURRENCY_SYMBOLS.contains(c))
        .collect();

    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

fn decimal_from_float(f: f64) -> Result<Decimal, CoerceError> {
    if !f.is_finite() {
        return Err(CoerceError::NotNumeric(f.to_string()));
    }
    Decimal::try_from(f)
        .map(|d| d.round_dp(FLOAT_NOISE_DP))
        .map_err(|_| CoerceError::OutOfRange(f.to_string()))
}

// ── Quantity ─────────────────────────────────────────────────────────

/// Coerce a cell to a non-negative whole quantity. Blank cells are `0`.
///
/// Fractional input is accepted only when exactly integral: `"10.0"` is 10,
/// `"10.5"` is rejected.
pub fn coerce_quantity(cell: &RawCell) -> Result<i32, CoerceError> {
    match cell {
        RawCell::Empty => Ok(0),
        RawCell::Text(s) if s.trim().is_empty() => Ok(0),
        RawCell::Text(s) => {
            let value = parse_decimal_text(s).ok_or_else(|| CoerceError::NotNumeric(s.clone()))?;
            whole_quantity(value, cell)
        }
        RawCell::Int(n) => {
            if *n < 0 {
                return Err(CoerceError::Negative(n.to_string()));
            }
            i32::try_from(*n).map_err(|_| CoerceError::OutOfRange(n.to_string()))
        }
        RawCell::Float(f) => {
            if !f.is_finite() {
                return Err(CoerceError::NotNumeric(f.to_string()));
            }
            whole_quantity(decimal_from_float(*f)?, cell)
        }
        RawCell::Error(e) => Err(CoerceError::CellError(e.clone())),
        other => Err(CoerceError::NotNumeric(other.to_string())),
    }
}

fn whole_quantity(value: Decimal, cell: &RawCell) -> Result<i32, CoerceError> {
    if value.is_zero() {
        return Ok(0);
    }
    if value.is_sign_negative() {
        return Err(CoerceError::Negative(cell.to_string()));
    }
    if !value.fract().is_zero() {
        return Err(CoerceError::NotIntegral(cell.to_string()));
    }
    value
        .to_i32()
        .ok_or_else(|| CoerceError::OutOfRange(cell.to_string()))
}

// ── Dates ────────────────────────────────────────────────────────────

/// Coerce a cell to a calendar date.
///
/// Accepts native date cells, ISO and US text formats (see
/// [`DATE_FORMATS`]), RFC 3339 timestamps, and 1900-system serials in plain
/// numeric cells.
pub fn coerce_date(cell: &RawCell) -> Result<NaiveDate, CoerceError> {
    match cell {
        RawCell::Empty => Err(CoerceError::Missing),
        RawCell::Text(s) if s.trim().is_empty() => Err(CoerceError::Missing),
        RawCell::Text(s) => {
            parse_date_text(s.trim()).ok_or_else(|| CoerceError::InvalidDate(s.clone()))
        }
        RawCell::Int(n) => {
            date_from_serial(*n as f64).ok_or_else(|| CoerceError::InvalidDate(n.to_string()))
        }
        RawCell::Float(f) => {
            date_from_serial(*f).ok_or_else(|| CoerceError::InvalidDate(f.to_string()))
        }
        RawCell::DateTime(dt) => Ok(dt.date()),
        RawCell::Bool(b) => Err(CoerceError::InvalidDate(b.to_string())),
        RawCell::Error(e) => Err(CoerceError::CellError(e.clone())),
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Convert a 1900-system spreadsheet serial to a date.
///
/// Serial 1 is 1900-01-01. Serial 60 is the nonexistent 1900-02-29 and is
/// rejected; serials from 61 on are offset by one to skip it.
pub fn date_from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let days = serial.floor() as i64;
    if !(1..=MAX_DATE_SERIAL).contains(&days) || days == 60 {
        return None;
    }

    let epoch = if days < 60 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    epoch.checked_add_days(Days::new(days as u64))
}
