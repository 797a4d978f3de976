//! Entities: things tracked by identity across snapshots.

/// Something identified by a key rather than by its attributes.
///
/// A theoretical inventory item keeps its [`InventoryKey`](crate::InventoryKey)
/// while its quantity and locations change between stock listings.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    /// Do both refer to the same thing, whatever their current attributes?
    fn same_identity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
