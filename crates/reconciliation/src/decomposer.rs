//! Key decomposition: recovering `(inventory key, location)` from one
//! concatenated scan code.
//!
//! Scanners emit `product_code + reference + location` with no delimiter,
//! while inventory keys are `product_code + "_" + reference`. Product codes and
//! references have no fixed width, so the decomposer tries every product /
//! reference boundary against the known key set.
//!
//! Tie-breaks, in order:
//! 1. registered locations are tried longest first (ties: lexicographic), so a
//!    short location can never shadow a longer one it is a suffix of;
//! 2. within a location, the lowest split index wins;
//! 3. the structural fallback tries keys longest first (ties: lexicographic),
//!    so when one key is a prefix of another the longer one wins.

use std::collections::HashSet;
use std::iter;

use serde::{Deserialize, Serialize};

use stockaudit_core::{InventoryKey, KEY_SEPARATOR, ValueObject};
use stockaudit_inventory::TheoreticalInventory;

use crate::pattern::location_shape;

/// Outcome of decomposing one scan code.
///
/// Both parts are `None` when decomposition failed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecomposedScan {
    pub key: Option<InventoryKey>,
    pub location: Option<String>,
}

impl DecomposedScan {
    pub fn matched(key: InventoryKey, location: impl Into<String>) -> Self {
        Self {
            key: Some(key),
            location: Some(location.into()),
        }
    }

    pub fn failed() -> Self {
        Self {
            key: None,
            location: None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.key.is_some() && self.location.is_some()
    }
}

impl ValueObject for DecomposedScan {}

/// Lookup structure built once per warehouse selection.
#[derive(Debug, Clone, Default)]
pub struct KeyDecomposer {
    /// Longest first, ties lexicographic.
    locations: Vec<String>,
    keys: HashSet<InventoryKey>,
    /// `(key, compact form)`, longest key first, ties lexicographic.
    fallback: Vec<(InventoryKey, String)>,
}

impl KeyDecomposer {
    /// Build from known locations and keys.
    ///
    /// Locations are trimmed; blank and duplicate entries are dropped.
    pub fn new<L, S, K>(locations: L, keys: K) -> Self
    where
        L: IntoIterator<Item = S>,
        S: AsRef<str>,
        K: IntoIterator<Item = InventoryKey>,
    {
        let mut locations: Vec<String> = locations
            .into_iter()
            .map(|l| l.as_ref().trim().to_string())
            .filter(|l| !l.is_empty())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        locations.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let keys: HashSet<InventoryKey> = keys.into_iter().collect();

        let mut fallback: Vec<(InventoryKey, String)> =
            keys.iter().map(|k| (k.clone(), k.compact())).collect();
        fallback.sort_by(|(a, _), (b, _)| {
            b.as_str()
                .len()
                .cmp(&a.as_str().len())
                .then_with(|| a.cmp(b))
        });

        Self {
            locations,
            keys,
            fallback,
        }
    }

    pub fn from_inventory(inventory: &TheoreticalInventory) -> Self {
        Self::new(inventory.locations(), inventory.keys().cloned())
    }

    /// Known locations in the order they are tried.
    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// Split `scan` into `(key, location)`.
    ///
    /// Exact location suffix first, then the structural fallback.
    pub fn decompose(&self, scan: &str) -> DecomposedScan {
        if scan.is_empty() || self.keys.is_empty() {
            return DecomposedScan::failed();
        }

        for location in &self.locations {
            if let Some(prefix) = scan.strip_suffix(location.as_str()) {
                if let Some(key) = self.split_match(prefix) {
                    tracing::trace!(scan, %key, location = location.as_str(), "decomposed by location suffix");
                    return DecomposedScan::matched(key, location.as_str());
                }
            }
        }

        for (key, compact) in &self.fallback {
            let suffix = scan
                .strip_prefix(key.as_str())
                .or_else(|| scan.strip_prefix(compact.as_str()));
            if let Some(suffix) = suffix {
                if let Some(shape) = location_shape(suffix) {
                    tracing::trace!(scan, %key, location = suffix, ?shape, "decomposed by location pattern");
                    return DecomposedScan::matched(key.clone(), suffix);
                }
            }
        }

        tracing::trace!(scan, "scan does not decompose");
        DecomposedScan::failed()
    }

    /// Inventory key a scan counts towards in the record pass.
    ///
    /// Exact key first, then the key [`decompose`](Self::decompose) finds, so
    /// both passes credit the same key. A compact key with no location is
    /// only tried when decomposition fails.
    pub fn resolve_key(&self, scan: &str) -> Option<InventoryKey> {
        if scan.is_empty() {
            return None;
        }
        if let Some(key) = self.keys.get(scan) {
            return Some(key.clone());
        }
        self.decompose(scan).key.or_else(|| self.split_match(scan))
    }

    /// Insert the key separator at every char boundary of `prefix`, lowest
    /// index first, and return the first candidate that is a known key.
    fn split_match(&self, prefix: &str) -> Option<InventoryKey> {
        let boundaries = prefix
            .char_indices()
            .map(|(i, _)| i)
            .chain(iter::once(prefix.len()));

        let mut candidate = String::with_capacity(prefix.len() + KEY_SEPARATOR.len_utf8());
        for i in boundaries {
            candidate.clear();
            candidate.push_str(&prefix[..i]);
            candidate.push(KEY_SEPARATOR);
            candidate.push_str(&prefix[i..]);
            if let Some(key) = self.keys.get(candidate.as_str()) {
                return Some(key.clone());
            }
        }
        None
    }
}

/// One-shot decomposition against ad-hoc location and key sets.
///
/// Builds the lookup structure on every call; reuse a [`KeyDecomposer`] when
/// decomposing more than one scan.
pub fn decompose<L, S, K>(scan: &str, locations: L, keys: K) -> DecomposedScan
where
    L: IntoIterator<Item = S>,
    S: AsRef<str>,
    K: IntoIterator<Item = InventoryKey>,
{
    KeyDecomposer::new(locations, keys).decompose(scan)
}
