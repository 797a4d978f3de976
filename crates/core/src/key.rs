//! Inventory key: the product-code + reference identifier.

use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// Separator joining product code and reference in the canonical key text.
pub const KEY_SEPARATOR: char = '_';

/// Identifier of one theoretical inventory line within a warehouse.
///
/// The canonical text is `product_code + "_" + reference`. Scanners emit the
/// *compact* form (no separator), which is why decomposition has to guess where
/// the product code ends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryKey(String);

impl InventoryKey {
    /// Wrap already-canonical key text.
    pub fn new(canonical: impl Into<String>) -> Self {
        Self(canonical.into())
    }

    /// Build the canonical key for a product code and reference.
    pub fn from_parts(product_code: &str, reference: &str) -> Self {
        let mut text = String::with_capacity(product_code.len() + reference.len() + 1);
        text.push_str(product_code);
        text.push(KEY_SEPARATOR);
        text.push_str(reference);
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key text as a scanner would emit it (every separator dropped).
    pub fn compact(&self) -> String {
        self.0.chars().filter(|c| *c != KEY_SEPARATOR).collect()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl ValueObject for InventoryKey {}

impl core::fmt::Display for InventoryKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for InventoryKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl core::borrow::Borrow<str> for InventoryKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for InventoryKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for InventoryKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
