//! Record pass (ERI): counted quantity vs theoretical quantity per key.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockaudit_core::{InventoryKey, ValueObject};
use stockaudit_inventory::TheoreticalInventory;

use crate::decomposer::KeyDecomposer;
use crate::metrics::{Classified, PassStatus};

/// Count status of one inventory key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordStatus {
    Complete,
    Shortage,
    Surplus,
}

impl RecordStatus {
    /// Status from `physical - theoretical`.
    pub fn from_difference(difference: Decimal) -> Self {
        if difference.is_zero() {
            RecordStatus::Complete
        } else if difference.is_sign_negative() {
            RecordStatus::Shortage
        } else {
            RecordStatus::Surplus
        }
    }
}

impl PassStatus for RecordStatus {
    const ALL: &'static [Self] = &[
        RecordStatus::Complete,
        RecordStatus::Shortage,
        RecordStatus::Surplus,
    ];

    fn is_correct(self) -> bool {
        self == RecordStatus::Complete
    }

    fn label(self) -> &'static str {
        match self {
            RecordStatus::Complete => "Complete",
            RecordStatus::Shortage => "Shortage",
            RecordStatus::Surplus => "Surplus",
        }
    }

    fn accuracy(_correct: usize, error: usize, total: usize) -> f64 {
        (1.0 - error as f64 / total as f64) * 100.0
    }
}

/// One inventory key of the record pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRow {
    pub key: InventoryKey,
    pub theoretical_quantity: Decimal,
    pub physical_count: u64,
    pub difference: Decimal,
    pub status: RecordStatus,
    /// Empty for keys that were only counted physically.
    pub valid_locations: Vec<String>,
}

impl RecordRow {
    fn new(key: InventoryKey, theoretical_quantity: Decimal, physical_count: u64, valid_locations: Vec<String>) -> Self {
        let difference = Decimal::from(physical_count) - theoretical_quantity;
        Self {
            key,
            theoretical_quantity,
            physical_count,
            difference,
            status: RecordStatus::from_difference(difference),
            valid_locations,
        }
    }
}

impl ValueObject for RecordRow {}

impl Classified for RecordRow {
    type Status = RecordStatus;

    fn status(&self) -> RecordStatus {
        self.status
    }
}

/// Reconcile scans against theoretical quantities.
///
/// Every scan that resolves to a theoretical key counts one unit for it.
/// Scans that do not resolve, or resolve to a key the inventory does not
/// hold, are left out. Rows cover the union of theoretical and counted keys,
/// ordered by key.
pub fn reconcile_records<I, S>(
    inventory: &TheoreticalInventory,
    decomposer: &KeyDecomposer,
    scans: I,
) -> Vec<RecordRow>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: BTreeMap<InventoryKey, u64> = BTreeMap::new();
    let mut unresolved = 0usize;
    for scan in scans {
        match decomposer.resolve_key(scan.as_ref()) {
            Some(key) if inventory.contains_key(key.as_str()) => {
                *counts.entry(key).or_default() += 1
            }
            _ => unresolved += 1,
        }
    }

    let keys: BTreeSet<&InventoryKey> = inventory.keys().chain(counts.keys()).collect();

    let rows: Vec<RecordRow> = keys
        .into_iter()
        .map(|key| {
            let physical = counts.get(key).copied().unwrap_or(0);
            match inventory.get(key.as_str()) {
                Some(item) => RecordRow::new(
                    key.clone(),
                    item.theoretical_quantity(),
                    physical,
                    item.valid_locations().iter().cloned().collect(),
                ),
                None => RecordRow::new(key.clone(), Decimal::ZERO, physical, Vec::new()),
            }
        })
        .collect();

    tracing::debug!(
        warehouse = inventory.warehouse(),
        rows = rows.len(),
        unresolved,
        "record pass reconciled"
    );
    rows
}
