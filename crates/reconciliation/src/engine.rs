use stockaudit_inventory::TheoreticalInventory;

use crate::decomposer::{DecomposedScan, KeyDecomposer};
use crate::location::{LocationRow, reconcile_locations};
use crate::record::{RecordRow, reconcile_records};

/// Theoretical inventory of one warehouse plus the decomposition index built
/// from it.
///
/// Built once per warehouse selection; both passes run against the same
/// snapshot.
#[derive(Debug, Clone)]
pub struct ReconciliationEngine {
    inventory: TheoreticalInventory,
    decomposer: KeyDecomposer,
}

impl ReconciliationEngine {
    pub fn new(inventory: TheoreticalInventory) -> Self {
        let decomposer = KeyDecomposer::from_inventory(&inventory);
        tracing::info!(
            warehouse = inventory.warehouse(),
            keys = inventory.len(),
            locations = decomposer.locations().len(),
            "reconciliation engine ready"
        );
        Self {
            inventory,
            decomposer,
        }
    }

    pub fn inventory(&self) -> &TheoreticalInventory {
        &self.inventory
    }

    pub fn decomposer(&self) -> &KeyDecomposer {
        &self.decomposer
    }

    pub fn decompose(&self, scan: &str) -> DecomposedScan {
        self.decomposer.decompose(scan)
    }

    pub fn reconcile_records<I, S>(&self, scans: I) -> Vec<RecordRow>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        reconcile_records(&self.inventory, &self.decomposer, scans)
    }

    pub fn reconcile_locations<I, S>(&self, scans: I) -> Vec<LocationRow>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        reconcile_locations(&self.inventory, &self.decomposer, scans)
    }
}
