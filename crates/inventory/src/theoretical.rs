use std::collections::{BTreeMap, BTreeSet, HashMap};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use stockaudit_core::{DomainError, DomainResult, Entity, InventoryKey};

use crate::row::StockRow;

/// Decimal places kept on theoretical quantities.
pub const QUANTITY_SCALE: u32 = 3;

/// Theoretical inventory line: everything the record says about one
/// product/reference within a warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheoreticalItem {
    key: InventoryKey,
    product_code: String,
    reference: String,
    theoretical_quantity: Decimal,
    valid_locations: BTreeSet<String>,
}

impl TheoreticalItem {
    /// Build an item, rounding the quantity to [`QUANTITY_SCALE`] places.
    ///
    /// Location names are trimmed; blank names are dropped.
    pub fn new<I, S>(
        product_code: impl Into<String>,
        reference: impl Into<String>,
        theoretical_quantity: Decimal,
        locations: I,
    ) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let product_code = product_code.into();
        let reference = reference.into();
        let key = InventoryKey::from_parts(&product_code, &reference);

        let theoretical_quantity = theoretical_quantity
            .round_dp_with_strategy(QUANTITY_SCALE, RoundingStrategy::MidpointNearestEven)
            .normalize();
        if theoretical_quantity.is_sign_negative() && !theoretical_quantity.is_zero() {
            return Err(DomainError::invariant(format!(
                "theoretical quantity for {key} cannot be negative ({theoretical_quantity})"
            )));
        }

        let valid_locations = locations
            .into_iter()
            .map(|l| l.as_ref().trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();

        Ok(Self {
            key,
            product_code,
            reference,
            theoretical_quantity,
            valid_locations,
        })
    }

    pub fn key(&self) -> &InventoryKey {
        &self.key
    }

    pub fn product_code(&self) -> &str {
        &self.product_code
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn theoretical_quantity(&self) -> Decimal {
        self.theoretical_quantity
    }

    pub fn valid_locations(&self) -> &BTreeSet<String> {
        &self.valid_locations
    }
}

impl Entity for TheoreticalItem {
    type Id = InventoryKey;

    fn id(&self) -> &Self::Id {
        &self.key
    }
}

/// Snapshot of one warehouse's theoretical inventory.
///
/// Items are ordered by inventory key and each key appears exactly once.
/// The snapshot is immutable; a warehouse change builds a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TheoreticalInventory {
    warehouse: String,
    items: Vec<TheoreticalItem>,
    index: HashMap<InventoryKey, usize>,
}

impl TheoreticalInventory {
    /// Group the rows of `warehouse` by inventory key.
    ///
    /// Quantities are summed per key across locations; locations are
    /// collected without duplicates. Rows of other warehouses are ignored.
    pub fn from_rows(rows: &[StockRow], warehouse: &str) -> DomainResult<Self> {
        #[derive(Default)]
        struct Group<'a> {
            product_code: &'a str,
            reference: &'a str,
            quantity: Decimal,
            locations: Vec<&'a str>,
        }

        let mut groups: BTreeMap<InventoryKey, Group<'_>> = BTreeMap::new();
        for row in rows.iter().filter(|r| r.belongs_to(warehouse)) {
            let group = groups.entry(row.key()).or_insert_with(|| Group {
                product_code: &row.product_code,
                reference: &row.reference,
                ..Group::default()
            });
            group.quantity += row.quantity;
            group.locations.push(&row.location);
        }

        let items = groups
            .into_values()
            .map(|g| TheoreticalItem::new(g.product_code, g.reference, g.quantity, g.locations))
            .collect::<DomainResult<Vec<_>>>()?;

        tracing::debug!(warehouse, items = items.len(), "grouped theoretical inventory");
        Self::from_items(warehouse, items)
    }

    /// Build a snapshot from already-grouped items.
    ///
    /// Fails if two items share an inventory key.
    pub fn from_items(warehouse: &str, mut items: Vec<TheoreticalItem>) -> DomainResult<Self> {
        items.sort_by(|a, b| a.key.cmp(&b.key));

        let mut index = HashMap::with_capacity(items.len());
        for (pos, item) in items.iter().enumerate() {
            if index.insert(item.key.clone(), pos).is_some() {
                return Err(DomainError::invariant(format!(
                    "duplicate inventory key {} in warehouse {warehouse}",
                    item.key
                )));
            }
        }

        Ok(Self {
            warehouse: warehouse.trim().to_string(),
            items,
            index,
        })
    }

    pub fn warehouse(&self) -> &str {
        &self.warehouse
    }

    pub fn items(&self) -> &[TheoreticalItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&TheoreticalItem> {
        self.index.get(key).map(|&pos| &self.items[pos])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &InventoryKey> {
        self.items.iter().map(|i| &i.key)
    }

    /// Every distinct location name of the warehouse.
    pub fn locations(&self) -> BTreeSet<&str> {
        self.items
            .iter()
            .flat_map(|i| i.valid_locations.iter().map(String::as_str))
            .collect()
    }
}

/// Warehouse names present in `rows`: trimmed, sorted, unique, blanks dropped.
pub fn warehouses(rows: &[StockRow]) -> Vec<String> {
    rows.iter()
        .map(|r| r.warehouse.trim())
        .filter(|w| !w.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn row(warehouse: &str, product: &str, reference: &str, qty: Decimal, location: &str) -> StockRow {
        StockRow::new(warehouse, product, reference, qty, location)
    }

    #[test]
    fn groups_rows_by_key_and_sums_quantities() {
        let rows = vec![
            row("MAIN", "A1", "R1", dec!(4), "R1A-B-1"),
            row("MAIN", "A1", "R1", dec!(6), "R1A-B-2"),
            row("MAIN", "B2", "X", dec!(1.5), "R2-C-3"),
            row("OTHER", "A1", "R1", dec!(100), "R9-Z-9"),
        ];

        let inv = TheoreticalInventory::from_rows(&rows, "MAIN").unwrap();
        assert_eq!(inv.warehouse(), "MAIN");
        assert_eq!(inv.len(), 2);

        let a1 = inv.get("A1_R1").unwrap();
        assert_eq!(a1.theoretical_quantity(), dec!(10));
        assert_eq!(
            a1.valid_locations().iter().cloned().collect::<Vec<_>>(),
            vec!["R1A-B-1".to_string(), "R1A-B-2".to_string()]
        );
        assert_eq!(a1.product_code(), "A1");
        assert_eq!(a1.reference(), "R1");

        assert_eq!(inv.get("B2_X").unwrap().theoretical_quantity(), dec!(1.5));
        assert!(inv.get("A1R1").is_none());
    }

    #[test]
    fn locations_are_deduplicated_and_blank_names_dropped() {
        let rows = vec![
            row("MAIN", "A1", "R1", dec!(1), " R1A-B-1 "),
            row("MAIN", "A1", "R1", dec!(1), "R1A-B-1"),
            row("MAIN", "A1", "R1", dec!(1), "   "),
        ];

        let inv = TheoreticalInventory::from_rows(&rows, "MAIN").unwrap();
        let item = inv.get("A1_R1").unwrap();
        assert_eq!(item.valid_locations().len(), 1);
        assert!(item.valid_locations().contains("R1A-B-1"));
        assert_eq!(item.theoretical_quantity(), dec!(3));
    }

    #[test]
    fn quantity_is_rounded_to_three_places() {
        let rows = vec![
            row("MAIN", "A1", "R1", dec!(0.1234), "L1"),
            row("MAIN", "A1", "R1", dec!(0.0001), "L2"),
        ];
        let inv = TheoreticalInventory::from_rows(&rows, "MAIN").unwrap();
        assert_eq!(inv.get("A1_R1").unwrap().theoretical_quantity(), dec!(0.124));
    }

    #[test]
    fn negative_total_is_rejected() {
        let rows = vec![row("MAIN", "A1", "R1", dec!(-2), "L1")];
        let err = TheoreticalInventory::from_rows(&rows, "MAIN").unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let items = vec![
            TheoreticalItem::new("A1", "R1", dec!(1), ["L1"]).unwrap(),
            TheoreticalItem::new("A1", "R1", dec!(2), ["L2"]).unwrap(),
        ];
        let err = TheoreticalInventory::from_items("MAIN", items).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(msg) if msg.contains("A1_R1")));
    }

    #[test]
    fn items_are_identified_by_key_across_snapshots() {
        let before = TheoreticalItem::new("A1", "R1", dec!(10), ["L1"]).unwrap();
        let after = TheoreticalItem::new("A1", "R1", dec!(3), ["L2"]).unwrap();
        let other = TheoreticalItem::new("A1", "R2", dec!(10), ["L1"]).unwrap();

        assert!(before.same_identity(&after));
        assert!(!before.same_identity(&other));
    }

    #[test]
    fn unknown_warehouse_yields_empty_snapshot() {
        let rows = vec![row("MAIN", "A1", "R1", dec!(1), "L1")];
        let inv = TheoreticalInventory::from_rows(&rows, "NOWHERE").unwrap();
        assert!(inv.is_empty());
        assert!(inv.locations().is_empty());
    }

    #[test]
    fn warehouse_names_are_sorted_and_unique() {
        let rows = vec![
            row("South", "A", "1", dec!(1), "L"),
            row(" North ", "A", "1", dec!(1), "L"),
            row("South", "B", "1", dec!(1), "L"),
            row("", "C", "1", dec!(1), "L"),
        ];
        assert_eq!(warehouses(&rows), vec!["North".to_string(), "South".to_string()]);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: grouping never produces two items with the same key and
        /// conserves the total quantity of the warehouse.
        #[test]
        fn grouping_keeps_keys_unique_and_conserves_quantity(
            lines in prop::collection::vec(
                ("[A-C]{1,2}", "[0-2]{1,2}", 0u32..1000u32, "R[1-3]-[A-B]-[1-3]"),
                0..40,
            )
        ) {
            let rows: Vec<StockRow> = lines
                .iter()
                .map(|(p, r, q, l)| row("MAIN", p, r, Decimal::from(*q), l))
                .collect();

            let inv = TheoreticalInventory::from_rows(&rows, "MAIN").unwrap();

            let keys: BTreeSet<_> = inv.keys().collect();
            prop_assert_eq!(keys.len(), inv.len());

            let expected: Decimal = rows.iter().map(|r| r.quantity).sum();
            let total: Decimal = inv.items().iter().map(|i| i.theoretical_quantity()).sum();
            prop_assert_eq!(total, expected);
        }
    }
}
