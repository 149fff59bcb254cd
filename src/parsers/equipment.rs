use super::{cell, each_record, name_cell, EntityKind, EntityParser, ListUnavailable};
use crate::fetch::RecordSource;
use crate::lookup;
use crate::types::{Cell, Row, Table, TableId};
use serde_json::Value;

pub const EQUIPMENT: TableId = TableId("equipment");

pub const HEADER: &[&str] = &[
    "index",
    "name",
    "equipment_category",
    "gear_category",
    "cost_quantity",
    "cost_unit",
    "weight",
    "description",
    "weapon_category",
    "weapon_range",
    "category_range",
    "damage_dice",
    "damage_type",
    "range_normal",
    "range_long",
    "properties",
    "armor_category",
    "armor_class_base",
    "armor_class_dex_bonus",
    "armor_class_max_bonus",
    "str_minimum",
    "stealth_disadvantage",
    "quantity",
];

pub fn row(index: &str, item: &Value) -> Row {
    vec![
        Cell::from(index),
        cell(item, &["name"]),
        name_cell(item, &["equipment_category"]),
        name_cell(item, &["gear_category"]),
        cell(item, &["cost", "quantity"]),
        cell(item, &["cost", "unit"]),
        cell(item, &["weight"]),
        Cell::text(lookup::join_lines(item, &["desc"])),
        cell(item, &["weapon_category"]),
        cell(item, &["weapon_range"]),
        cell(item, &["category_range"]),
        cell(item, &["damage", "damage_dice"]),
        name_cell(item, &["damage", "damage_type"]),
        cell(item, &["range", "normal"]),
        cell(item, &["range", "long"]),
        Cell::text(lookup::join_names(item, &["properties"])),
        cell(item, &["armor_category"]),
        cell(item, &["armor_class", "base"]),
        cell(item, &["armor_class", "dex_bonus"]),
        cell(item, &["armor_class", "max_bonus"]),
        cell(item, &["str_minimum"]),
        cell(item, &["stealth_disadvantage"]),
        cell(item, &["quantity"]),
    ]
}

pub struct EquipmentParser;

impl EntityParser for EquipmentParser {
    fn kind(&self) -> EntityKind {
        EntityKind::Equipment
    }

    fn parse(&self, source: &mut dyn RecordSource) -> Result<Vec<Table>, ListUnavailable> {
        let mut table = Table::new(EQUIPMENT, HEADER);
        each_record(source, self.kind(), |_, index, record| {
            table.push(row(index, record));
        })?;
        Ok(vec![table])
    }
}
