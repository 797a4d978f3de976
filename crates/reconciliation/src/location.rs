//! Location pass (ERU): was each scan taken at one of its key's locations.

use serde::{Deserialize, Serialize};

use stockaudit_core::{InventoryKey, ValueObject};
use stockaudit_inventory::TheoreticalInventory;

use crate::decomposer::{DecomposedScan, KeyDecomposer};
use crate::metrics::{Classified, PassStatus};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LocationStatus {
    LocationCorrect,
    LocationIncorrect,
    /// The scan did not decompose into a key and a location.
    InvalidScan,
    /// The scan decomposed, but its key has no theoretical entry.
    KeyNotFound,
}

impl PassStatus for LocationStatus {
    const ALL: &'static [Self] = &[
        LocationStatus::LocationCorrect,
        LocationStatus::LocationIncorrect,
        LocationStatus::InvalidScan,
        LocationStatus::KeyNotFound,
    ];

    fn is_correct(self) -> bool {
        self == LocationStatus::LocationCorrect
    }

    fn label(self) -> &'static str {
        match self {
            LocationStatus::LocationCorrect => "Location correct",
            LocationStatus::LocationIncorrect => "Location incorrect",
            LocationStatus::InvalidScan => "Invalid scan",
            LocationStatus::KeyNotFound => "Key not found",
        }
    }
}

/// One scan of the location pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRow {
    pub scan_code: String,
    pub key: Option<InventoryKey>,
    pub location: Option<String>,
    /// Theoretical locations of `key`; empty unless the key is known.
    pub theoretical_locations: Vec<String>,
    pub status: LocationStatus,
}

impl ValueObject for LocationRow {}

impl Classified for LocationRow {
    type Status = LocationStatus;

    fn status(&self) -> LocationStatus {
        self.status
    }
}

/// Comparable form of a location name: whitespace, underscores and hyphens
/// removed, uppercase.
///
/// Hyphens are dropped so that a scanned `r1a-b-5` matches a stock record
/// written `R1A_B_5`. The location shapes put their hyphens at fixed
/// positions, so no two distinct location codes normalize to the same text.
pub fn normalize_location(location: &str) -> String {
    location
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_uppercase)
        .collect()
}

/// Classify every scan by location, in scan order.
pub fn reconcile_locations<I, S>(
    inventory: &TheoreticalInventory,
    decomposer: &KeyDecomposer,
    scans: I,
) -> Vec<LocationRow>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let rows: Vec<LocationRow> = scans
        .into_iter()
        .map(|scan| classify(inventory, decomposer, scan.as_ref()))
        .collect();

    tracing::debug!(
        warehouse = inventory.warehouse(),
        rows = rows.len(),
        "location pass reconciled"
    );
    rows
}

fn classify(inventory: &TheoreticalInventory, decomposer: &KeyDecomposer, scan: &str) -> LocationRow {
    let DecomposedScan { key, location } = decomposer.decompose(scan);

    let (status, theoretical_locations) = match (&key, &location) {
        (Some(key), Some(location)) => match inventory.get(key.as_str()) {
            None => (LocationStatus::KeyNotFound, Vec::new()),
            Some(item) => {
                let scanned = normalize_location(location);
                let found = item
                    .valid_locations()
                    .iter()
                    .any(|l| normalize_location(l) == scanned);
                let status = if found {
                    LocationStatus::LocationCorrect
                } else {
                    LocationStatus::LocationIncorrect
                };
                (status, item.valid_locations().iter().cloned().collect())
            }
        },
        _ => (LocationStatus::InvalidScan, Vec::new()),
    };

    LocationRow {
        scan_code: scan.to_string(),
        key,
        location,
        theoretical_locations,
        status,
    }
}
