use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockaudit_core::InventoryKey;

/// One raw line of the stock listing: a quantity of a product/reference at a
/// single location of a warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRow {
    pub warehouse: String,
    pub product_code: String,
    pub reference: String,
    pub quantity: Decimal,
    pub location: String,
}

impl StockRow {
    pub fn new(
        warehouse: impl Into<String>,
        product_code: impl Into<String>,
        reference: impl Into<String>,
        quantity: Decimal,
        location: impl Into<String>,
    ) -> Self {
        Self {
            warehouse: warehouse.into(),
            product_code: product_code.into(),
            reference: reference.into(),
            quantity,
            location: location.into(),
        }
    }

    pub fn key(&self) -> InventoryKey {
        InventoryKey::from_parts(&self.product_code, &self.reference)
    }

    pub fn belongs_to(&self, warehouse: &str) -> bool {
        self.warehouse.trim() == warehouse.trim()
    }
}
