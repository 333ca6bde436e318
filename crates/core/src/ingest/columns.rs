//! Header synonym table and per-file column resolution.

use std::fmt;

use super::IngestError;

/// A canonical product field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    Sku,
    Name,
    Price,
    Quantity,
    Category,
    TxDate,
}

impl ProductField {
    /// All fields in canonical column order.
    pub const ALL: [ProductField; 6] = [
        Self::Sku,
        Self::Name,
        Self::Price,
        Self::Quantity,
        Self::Category,
        Self::TxDate,
    ];

    /// Canonical column name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sku => "sku",
            Self::Name => "name",
            Self::Price => "price",
            Self::Quantity => "quantity",
            Self::Category => "category",
            Self::TxDate => "tx_date",
        }
    }

    /// Whether a file without this column is rejected.
    pub fn is_required(&self) -> bool {
        matches!(self, Self::Sku | Self::Name | Self::Price | Self::TxDate)
    }

    /// Accepted header spellings, already in [`header_key`] form.
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            Self::Sku => &[
                "sku",
                "sku_code",
                "sku_no",
                "product_code",
                "product_id",
                "item_code",
                "item_id",
                "stock_code",
                "code",
                "barcode",
            ],
            Self::Name => &[
                "name",
                "product_name",
                "product",
                "item_name",
                "item",
                "title",
                "description",
            ],
            Self::Price => &[
                "price",
                "unit_price",
                "sale_price",
                "selling_price",
                "list_price",
                "price_each",
            ],
            Self::Quantity => &[
                "quantity",
                "qty",
                "quantity_sold",
                "units",
                "unit_count",
                "count",
                "stock",
                "stock_qty",
                "on_hand",
                "pcs",
            ],
            Self::Category => &[
                "category",
                "cat",
                "product_category",
                "category_name",
                "group",
                "department",
                "type",
            ],
            Self::TxDate => &[
                "tx_date",
                "txn_date",
                "transaction_date",
                "trans_date",
                "date",
                "sale_date",
                "order_date",
                "sold_on",
            ],
        }
    }

    /// The field whose canonical name is exactly `key`.
    pub fn from_canonical(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == key)
    }

    /// Find the field a header key belongs to.
    pub fn from_header_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.synonyms().contains(&key))
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fold a raw header into lookup form: lowercase, BOM and surrounding
/// whitespace removed, runs of spaces/hyphens/dots/underscores collapsed
/// to a single underscore.
///
/// `" Transaction-Date "` becomes `"transaction_date"`.
pub fn header_key(raw: &str) -> String {
    let lowered = raw.trim_start_matches('\u{feff}').trim().to_lowercase();
    let mut key = String::with_capacity(lowered.len());
    let mut pending_sep = false;

    for ch in lowered.chars() {
        if ch.is_whitespace() || matches!(ch, '-' | '.' | '_') {
            pending_sep = true;
            continue;
        }
        if pending_sep && !key.is_empty() {
            key.push('_');
        }
        pending_sep = false;
        key.push(ch);
    }
    key
}

/// Positions of the canonical fields within one file's header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    indices: [Option<usize>; 6],
}

impl ColumnMap {
    /// Resolve a header row against the synonym table.
    ///
    /// A header spelled exactly as a canonical name claims its field first,
    /// wherever it sits in the row. Remaining fields take the first header
    /// matching one of their synonyms. Unrecognized headers are ignored.
    /// Fails with `InvalidRow` on line 1 when a required field has no column.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self, IngestError> {
        let keys: Vec<String> = headers.iter().map(|h| header_key(h.as_ref())).collect();
        let mut map = Self::default();
        let mut claimed = vec![false; keys.len()];

        for (index, key) in keys.iter().enumerate() {
            if let Some(field) = ProductField::from_canonical(key) {
                let slot = &mut map.indices[field_slot(field)];
                if slot.is_none() {
                    *slot = Some(index);
                    claimed[index] = true;
                }
            }
        }

        for (index, key) in keys.iter().enumerate() {
            if claimed[index] {
                continue;
            }
            if let Some(field) = ProductField::from_header_key(key) {
                let slot = &mut map.indices[field_slot(field)];
                if slot.is_none() {
                    *slot = Some(index);
                }
            }
        }

        let missing: Vec<&str> = ProductField::ALL
            .iter()
            .filter(|f| f.is_required() && map.index_of(**f).is_none())
            .map(|f| f.as_str())
            .collect();

        if !missing.is_empty() {
            return Err(IngestError::invalid_row(
                1,
                format!("missing required column(s): {}", missing.join(", ")),
            ));
        }
        Ok(map)
    }

    /// Column index of a field, if the file has it.
    pub fn index_of(&self, field: ProductField) -> Option<usize> {
        self.indices[field_slot(field)]
    }
}

fn field_slot(field: ProductField) -> usize {
    match field {
        ProductField::Sku => 0,
        ProductField::Name => 1,
        ProductField::Price => 2,
        ProductField::Quantity => 3,
        ProductField::Category => 4,
        ProductField::TxDate => 5,
    }
}
