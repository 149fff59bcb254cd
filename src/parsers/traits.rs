//! Racial traits
//!
//! A trait is expanded over every race × subrace × proficiency it applies to. Breath-weapon
//! traits are further expanded over character levels 1-20, with the damage forward-filled
//! from the sparse level table.

use super::{cell, each_record, name_cell, EntityKind, EntityParser, ListUnavailable};
use crate::expand::{cross_product, expand, forward_fill, CHARACTER_LEVELS};
use crate::fetch::RecordSource;
use crate::lookup;
use crate::types::{Cell, Row, Table, TableId};
use serde_json::Value;

pub const TRAITS: TableId = TableId("traits");

pub const HEADER: &[&str] = &[
    "index",
    "name",
    "description",
    "race",
    "subrace",
    "proficiency",
    "damage_type",
    "breath_weapon",
    "area_of_effect_type",
    "area_of_effect_size",
    "dc_type",
    "usage",
    "level",
    "damage",
];

const LEVEL_WIDTH: usize = 2;

/// `[level, damage]` for every character level, or nothing for traits without a breath weapon
pub fn breath_damage_points(record: &Value) -> Vec<Vec<Cell>> {
    let damage = lookup::array_at(record, &["trait_specific", "breath_weapon", "damage"]);
    let Some(first) = damage.first() else {
        return Vec::new();
    };
    let by_level = lookup::level_map(lookup::get(first, &["damage_at_character_level"]));
    if by_level.is_empty() {
        return Vec::new();
    }
    forward_fill(CHARACTER_LEVELS, &by_level)
        .into_iter()
        .map(|(level, value)| vec![Cell::from(level), Cell::from_json(value.as_ref())])
        .collect()
}

fn usage(record: &Value) -> Cell {
    let usage = lookup::get(record, &["trait_specific", "breath_weapon", "usage"]);
    let times = usage.and_then(|u| lookup::i64_at(u, &["times"]));
    let kind = usage.and_then(|u| lookup::str_at(u, &["type"]));
    match (times, kind) {
        (Some(times), Some(kind)) => Cell::text(format!("{} {}", times, kind)),
        (None, Some(kind)) => Cell::from(kind),
        _ => Cell::Empty,
    }
}

/// Every row for one trait record
pub fn rows(index: &str, record: &Value) -> Vec<Row> {
    let head = [
        Cell::from(index),
        cell(record, &["name"]),
        Cell::text(lookup::join_lines(record, &["desc"])),
    ];
    let breath = ["trait_specific", "breath_weapon"];
    let tail = [
        name_cell(record, &["trait_specific", "damage_type"]),
        name_cell(record, &breath),
        cell(record, &["trait_specific", "breath_weapon", "area_of_effect", "type"]),
        cell(record, &["trait_specific", "breath_weapon", "area_of_effect", "size"]),
        name_cell(record, &["trait_specific", "breath_weapon", "dc", "dc_type"]),
        usage(record),
    ];

    let combos = cross_product(&[
        lookup::indices(record, &["races"]),
        lookup::indices(record, &["subraces"]),
        lookup::indices(record, &["proficiencies"]),
    ]);
    let levels = breath_damage_points(record);

    let mut rows = Vec::new();
    for combo in combos {
        let mut base: Row = head.to_vec();
        base.extend(combo);
        base.extend(tail.iter().cloned());
        rows.extend(expand(&base, levels.clone(), LEVEL_WIDTH));
    }
    rows
}

pub struct TraitsParser;

impl EntityParser for TraitsParser {
    fn kind(&self) -> EntityKind {
        EntityKind::Traits
    }

    fn parse(&self, source: &mut dyn RecordSource) -> Result<Vec<Table>, ListUnavailable> {
        let mut table = Table::new(TRAITS, HEADER);
        each_record(source, self.kind(), |_, index, record| {
            table.extend(rows(index, record));
        })?;
        Ok(vec![table])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn refs(indices: &[&str]) -> Value {
        Value::Array(indices.iter().map(|i| json!({"index": i, "name": i})).collect())
    }

    #[test]
    fn test_cross_product_row_count() {
        let record = json!({
            "index": "tool-proficiency",
            "name": "Tool Proficiency",
            "races": refs(&["dwarf", "gnome"]),
            "subraces": refs(&["hill-dwarf", "mountain-dwarf", "rock-gnome"]),
            "proficiencies": refs(&["smiths-tools", "brewers-supplies"])
        });
        let rows = rows("tool-proficiency", &record);

        assert_eq!(rows.len(), 2 * 3 * 2);
        assert_eq!(rows[0][3], Cell::from("dwarf"));
        assert_eq!(rows[0][4], Cell::from("hill-dwarf"));
        assert_eq!(rows[0][5], Cell::from("smiths-tools"));
        assert_eq!(rows[1][5], Cell::from("brewers-supplies"));
        assert_eq!(rows[6][3], Cell::from("gnome"));
        assert!(rows.iter().all(|r| r.len() == HEADER.len()));
    }

    #[test]
    fn test_empty_lists_still_produce_a_row() {
        let record = json!({"index": "darkvision", "name": "Darkvision", "races": refs(&["elf"])});
        let rows = rows("darkvision", &record);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][3], Cell::from("elf"));
        assert_eq!(rows[0][4], Cell::Empty);
        assert_eq!(rows[0][12], Cell::Empty);
    }

    #[test]
    fn test_breath_weapon_expands_over_levels() {
        let record = json!({
            "index": "breath-weapon",
            "name": "Breath Weapon",
            "races": refs(&["dragonborn"]),
            "subraces": [],
            "proficiencies": [],
            "trait_specific": {
                "damage_type": {"index": "fire", "name": "Fire"},
                "breath_weapon": {
                    "name": "Breath Weapon",
                    "area_of_effect": {"size": 15, "type": "cone"},
                    "usage": {"type": "per rest", "times": 1},
                    "dc": {"dc_type": {"index": "dex", "name": "DEX"}, "success_type": "half"},
                    "damage": [{
                        "damage_type": {"name": "Fire"},
                        "damage_at_character_level": {"1": "2d6", "6": "3d6", "11": "4d6", "16": "5d6"}
                    }]
                }
            }
        });
        let rows = rows("breath-weapon", &record);

        assert_eq!(rows.len(), 20);
        assert_eq!(rows[0][6], Cell::from("Fire"));
        assert_eq!(rows[0][8], Cell::from("cone"));
        assert_eq!(rows[0][9], Cell::Int(15));
        assert_eq!(rows[0][10], Cell::from("DEX"));
        assert_eq!(rows[0][11], Cell::from("1 per rest"));
        assert_eq!(rows[4][13], Cell::from("2d6"));
        assert_eq!(rows[5][12], Cell::Int(6));
        assert_eq!(rows[5][13], Cell::from("3d6"));
        assert_eq!(rows[19][13], Cell::from("5d6"));
    }
}
