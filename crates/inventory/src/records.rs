//! Tabular ingestion: header → cell records into [`StockRow`]s.
//!
//! The data source hands over a spreadsheet as a list of JSON objects, one per
//! sheet row. Headers are matched after trimming and uppercasing, and each
//! logical column accepts both the English header and the one used by the
//! source ERP export.

use std::collections::BTreeSet;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use thiserror::Error;

use stockaudit_core::DomainError;

use crate::row::StockRow;

/// A logical column of the stock listing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Column {
    Warehouse,
    ProductCode,
    Reference,
    Quantity,
    Location,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Warehouse,
        Column::ProductCode,
        Column::Reference,
        Column::Quantity,
        Column::Location,
    ];

    /// Accepted (normalized) headers, preferred first.
    pub fn headers(self) -> &'static [&'static str] {
        match self {
            Column::Warehouse => &["WAREHOUSE", "ALMACEN_NOMBRE"],
            Column::ProductCode => &["PRODUCT_CODE", "PRODUCTO_CODIGO"],
            Column::Reference => &["REFERENCE", "REFERENCIA1"],
            Column::Quantity => &["QUANTITY", "STOCK_REFERENCIAUBICACION"],
            Column::Location => &["LOCATION", "UBICACION_NOMBRE"],
        }
    }

    pub fn name(self) -> &'static str {
        self.headers()[0]
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing columns {missing:?}; available columns are {available:?}")]
    MissingColumns {
        missing: Vec<&'static str>,
        available: Vec<String>,
    },

    #[error("record {index}: column {column} holds a nested value")]
    NestedCell { index: usize, column: &'static str },

    #[error("record {index}: quantity {value:?} is not numeric")]
    InvalidQuantity { index: usize, value: String },

    #[error("stock listing is not a JSON array of objects: {0}")]
    Malformed(String),
}

impl From<RecordError> for DomainError {
    fn from(value: RecordError) -> Self {
        DomainError::validation(value.to_string())
    }
}

fn normalize_header(header: &str) -> String {
    header.trim().to_uppercase()
}

/// Header resolved for each column, in [`Column::ALL`] order.
fn resolve_headers(records: &[Map<String, Value>]) -> Result<[&'static str; 5], RecordError> {
    let available: BTreeSet<String> = records
        .iter()
        .flat_map(|r| r.keys().map(|k| normalize_header(k)))
        .collect();

    let mut resolved = [""; 5];
    let mut missing = Vec::new();
    for (slot, column) in resolved.iter_mut().zip(Column::ALL) {
        match column.headers().iter().find(|h| available.contains(**h)) {
            Some(h) => *slot = *h,
            None => missing.push(column.name()),
        }
    }

    if missing.is_empty() {
        Ok(resolved)
    } else {
        Err(RecordError::MissingColumns {
            missing,
            available: available.into_iter().collect(),
        })
    }
}

fn cell<'a>(record: &'a Map<String, Value>, header: &str) -> Option<&'a Value> {
    record
        .iter()
        .find(|(k, _)| normalize_header(k) == header)
        .map(|(_, v)| v)
}

fn text_cell(
    record: &Map<String, Value>,
    header: &str,
    index: usize,
    column: Column,
) -> Result<String, RecordError> {
    match cell(record, header) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(Value::Array(_) | Value::Object(_)) => Err(RecordError::NestedCell {
            index,
            column: column.name(),
        }),
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn quantity_cell(record: &Map<String, Value>, header: &str, index: usize) -> Result<Decimal, RecordError> {
    let invalid = |value: String| RecordError::InvalidQuantity { index, value };
    match cell(record, header) {
        None | Some(Value::Null) => Ok(Decimal::ZERO),
        Some(Value::Number(n)) => parse_decimal(&n.to_string()).ok_or_else(|| invalid(n.to_string())),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(Decimal::ZERO),
        Some(Value::String(s)) => parse_decimal(s.trim()).ok_or_else(|| invalid(s.clone())),
        Some(other) => Err(invalid(other.to_string())),
    }
}

/// Convert header → cell records into stock rows.
///
/// All missing columns are reported in one error. An empty record list
/// yields no rows.
pub fn parse_records(records: &[Map<String, Value>]) -> Result<Vec<StockRow>, RecordError> {
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let [warehouse, product, reference, quantity, location] = resolve_headers(records)?;

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            Ok(StockRow {
                warehouse: text_cell(record, warehouse, index, Column::Warehouse)?,
                product_code: text_cell(record, product, index, Column::ProductCode)?,
                reference: text_cell(record, reference, index, Column::Reference)?,
                quantity: quantity_cell(record, quantity, index)?,
                location: text_cell(record, location, index, Column::Location)?,
            })
        })
        .collect()
}

/// Parse a JSON array of row objects.
pub fn parse_json(text: &str) -> Result<Vec<StockRow>, RecordError> {
    let records: Vec<Map<String, Value>> =
        serde_json::from_str(text).map_err(|e| RecordError::Malformed(e.to_string()))?;
    let rows = parse_records(&records)?;
    tracing::debug!(records = records.len(), "parsed stock listing");
    Ok(rows)
}
