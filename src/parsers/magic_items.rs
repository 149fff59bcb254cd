//! Magic items and their variant → parent relationships
//!
//! A parent item lists its variants; the variants do not point back. Parent resolution is
//! therefore done in two passes: every record is fetched and the full variant → parent map is
//! built first, then rows are emitted. A variant gets its parent no matter where either item
//! sits in the collection order.

use super::{cell, each_record, name_cell, EntityKind, EntityParser, ListUnavailable};
use crate::fetch::RecordSource;
use crate::lookup;
use crate::types::{Cell, Row, Table, TableId};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

pub const MAGIC_ITEMS: TableId = TableId("magic_items");
pub const MAGIC_ITEMS_VARIANTS: TableId = TableId("magic_items_variants");

pub const HEADER: &[&str] = &[
    "index",
    "name",
    "equipment_category",
    "rarity",
    "description",
    "is_variant",
    "parent_index",
];

pub const VARIANTS_HEADER: &[&str] = &["parent_index", "variant_index"];

/// variant index → parent index, over every record
pub fn parent_map(items: &[(String, Value)]) -> BTreeMap<String, String> {
    let mut parents = BTreeMap::new();
    for (parent, record) in items {
        for variant in lookup::indices(record, &["variants"]) {
            if variant == *parent {
                continue;
            }
            if let Some(previous) = parents.insert(variant.clone(), parent.clone()) {
                if previous != *parent {
                    warn!(%variant, %previous, %parent, "variant listed by two parents, keeping the later one");
                }
            }
        }
    }
    parents
}

pub fn row(index: &str, item: &Value, parents: &BTreeMap<String, String>) -> Row {
    let parent = parents.get(index);
    let is_variant = lookup::bool_at(item, &["variant"]).unwrap_or(false) || parent.is_some();
    vec![
        Cell::from(index),
        cell(item, &["name"]),
        name_cell(item, &["equipment_category"]),
        name_cell(item, &["rarity"]),
        Cell::text(lookup::join_lines(item, &["desc"])),
        Cell::Bool(is_variant),
        Cell::opt_text(parent.map(String::as_str)),
    ]
}

/// Both tables from an already-fetched item list
pub fn tables(items: &[(String, Value)]) -> Vec<Table> {
    let parents = parent_map(items);

    let mut table = Table::new(MAGIC_ITEMS, HEADER);
    table.extend(items.iter().map(|(index, record)| row(index, record, &parents)));

    let mut variants = Table::new(MAGIC_ITEMS_VARIANTS, VARIANTS_HEADER);
    for (index, record) in items {
        let mut listed = lookup::indices(record, &["variants"]);
        listed.dedup();
        variants.extend(
            listed
                .into_iter()
                .filter(|variant| parents.get(variant) == Some(index))
                .map(|variant| vec![Cell::from(index.as_str()), Cell::from(variant)]),
        );
    }
    vec![table, variants]
}

pub struct MagicItemsParser;

impl EntityParser for MagicItemsParser {
    fn kind(&self) -> EntityKind {
        EntityKind::MagicItems
    }

    fn parse(&self, source: &mut dyn RecordSource) -> Result<Vec<Table>, ListUnavailable> {
        let mut items = Vec::new();
        each_record(source, self.kind(), |_, index, record| {
            items.push((index.to_string(), record.clone()));
        })?;
        Ok(tables(&items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(index: &str, variants: &[&str]) -> (String, Value) {
        let variants: Vec<Value> = variants.iter().map(|v| json!({"index": v})).collect();
        (
            index.to_string(),
            json!({
                "index": index,
                "name": index,
                "rarity": {"name": "Rare"},
                "variants": variants,
                "variant": false
            }),
        )
    }

    fn parent_column(tables: &[Table], index: &str) -> Cell {
        let table = &tables[0];
        let col = table.column("parent_index").unwrap();
        table
            .rows
            .iter()
            .find(|r| r[0] == Cell::from(index))
            .map(|r| r[col].clone())
            .unwrap()
    }

    #[test]
    fn test_parent_resolution_is_order_independent() {
        let parent_first = vec![
            item("armor-of-resistance", &["armor-of-resistance-fire"]),
            item("armor-of-resistance-fire", &[]),
        ];
        let child_first = vec![
            item("armor-of-resistance-fire", &[]),
            item("armor-of-resistance", &["armor-of-resistance-fire"]),
        ];

        for items in [parent_first, child_first] {
            let tables = tables(&items);
            assert_eq!(
                parent_column(&tables, "armor-of-resistance-fire"),
                Cell::from("armor-of-resistance")
            );
            assert_eq!(parent_column(&tables, "armor-of-resistance"), Cell::Empty);
        }
    }

    #[test]
    fn test_side_table_keeps_the_parent_listing_order() {
        let items = vec![
            item("ioun-stone", &["ioun-stone-strength", "ioun-stone-agility", "ioun-stone-awareness"]),
            item("ioun-stone-agility", &[]),
            item("cloak", &["ioun-stone-awareness"]),
        ];
        let tables = tables(&items);

        let pairs: Vec<(Cell, Cell)> = tables[1]
            .rows
            .iter()
            .map(|r| (r[0].clone(), r[1].clone()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (Cell::from("ioun-stone"), Cell::from("ioun-stone-strength")),
                (Cell::from("ioun-stone"), Cell::from("ioun-stone-agility")),
                (Cell::from("cloak"), Cell::from("ioun-stone-awareness")),
            ]
        );
    }

    #[test]
    fn test_variant_flag_and_side_table() {
        let items = vec![
            item("bag-of-tricks", &["bag-of-tricks-gray", "bag-of-tricks-rust"]),
            item("bag-of-tricks-gray", &[]),
            item("bag-of-tricks-rust", &[]),
        ];
        let tables = tables(&items);

        let flag = tables[0].column("is_variant").unwrap();
        assert_eq!(tables[0].rows[0][flag], Cell::Bool(false));
        assert_eq!(tables[0].rows[1][flag], Cell::Bool(true));
        assert_eq!(tables[0].rows[0][3], Cell::from("Rare"));

        assert_eq!(tables[1].id, MAGIC_ITEMS_VARIANTS);
        assert_eq!(
            tables[1].rows,
            vec![
                vec![Cell::from("bag-of-tricks"), Cell::from("bag-of-tricks-gray")],
                vec![Cell::from("bag-of-tricks"), Cell::from("bag-of-tricks-rust")],
            ]
        );
    }
}
