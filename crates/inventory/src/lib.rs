//! Theoretical inventory: the record side of a stock audit.
//!
//! This crate turns raw per-location stock rows into one [`TheoreticalItem`]
//! per inventory key for the selected warehouse. It is deterministic domain
//! logic (no IO): callers hand over already-fetched records.

pub mod records;
pub mod row;
pub mod theoretical;

pub use records::{Column, RecordError, parse_json, parse_records};
pub use row::StockRow;
pub use theoretical::{TheoreticalInventory, TheoreticalItem, warehouses};
