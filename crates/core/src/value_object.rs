//! Value object trait: equality by value, not identity.
//!
//! Inventory keys, recorded scans and reconciliation rows are all value
//! objects: two of them with the same attributes are interchangeable.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. An
/// [`InventoryKey`](crate::InventoryKey) built twice from the same product code
/// and reference is the same key; a theoretical item, by contrast, is an
/// [`Entity`](crate::Entity) identified by its key even if its quantity differs
/// between two snapshots.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
