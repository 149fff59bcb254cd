//! Races and subraces: one row each, with the six ability bonuses spread over fixed columns

use super::{ability_cells, cell, each_record, index_cell, EntityKind, EntityParser, ListUnavailable};
use crate::fetch::RecordSource;
use crate::lookup;
use crate::types::{Cell, Row, Table, TableId};
use serde_json::Value;

pub const RACES: TableId = TableId("races");
pub const SUBRACES: TableId = TableId("subraces");

pub const RACES_HEADER: &[&str] = &[
    "index",
    "name",
    "speed",
    "STR",
    "DEX",
    "CON",
    "WIS",
    "INT",
    "CHA",
    "alignment",
    "age",
    "size",
    "size_description",
    "starting_proficiencies",
    "languages",
    "language_desc",
    "traits",
    "subraces",
];

pub const SUBRACES_HEADER: &[&str] = &[
    "index",
    "name",
    "race",
    "description",
    "STR",
    "DEX",
    "CON",
    "WIS",
    "INT",
    "CHA",
    "starting_proficiencies",
    "languages",
    "racial_traits",
];

pub fn race_row(index: &str, race: &Value) -> Row {
    let mut row = vec![Cell::from(index), cell(race, &["name"]), cell(race, &["speed"])];
    row.extend(ability_cells(race));
    row.extend([
        cell(race, &["alignment"]),
        cell(race, &["age"]),
        cell(race, &["size"]),
        cell(race, &["size_description"]),
        Cell::text(lookup::join_names(race, &["starting_proficiencies"])),
        Cell::text(lookup::join_names(race, &["languages"])),
        cell(race, &["language_desc"]),
        Cell::text(lookup::join_names(race, &["traits"])),
        Cell::text(lookup::join_names(race, &["subraces"])),
    ]);
    row
}

pub fn subrace_row(index: &str, subrace: &Value) -> Row {
    let mut row = vec![
        Cell::from(index),
        cell(subrace, &["name"]),
        index_cell(subrace, &["race"]),
        cell(subrace, &["desc"]),
    ];
    row.extend(ability_cells(subrace));
    row.extend([
        Cell::text(lookup::join_names(subrace, &["starting_proficiencies"])),
        Cell::text(lookup::join_names(subrace, &["languages"])),
        Cell::text(lookup::join_names(subrace, &["racial_traits"])),
    ]);
    row
}

pub struct RacesParser;

impl EntityParser for RacesParser {
    fn kind(&self) -> EntityKind {
        EntityKind::Races
    }

    fn parse(&self, source: &mut dyn RecordSource) -> Result<Vec<Table>, ListUnavailable> {
        let mut table = Table::new(RACES, RACES_HEADER);
        each_record(source, self.kind(), |_, index, record| {
            table.push(race_row(index, record));
        })?;
        Ok(vec![table])
    }
}

pub struct SubracesParser;

impl EntityParser for SubracesParser {
    fn kind(&self) -> EntityKind {
        EntityKind::Subraces
    }

    fn parse(&self, source: &mut dyn RecordSource) -> Result<Vec<Table>, ListUnavailable> {
        let mut table = Table::new(SUBRACES, SUBRACES_HEADER);
        each_record(source, self.kind(), |_, index, record| {
            table.push(subrace_row(index, record));
        })?;
        Ok(vec![table])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_race_row_spreads_abilities() {
        let elf = json!({
            "index": "elf",
            "name": "Elf",
            "speed": 30,
            "ability_bonuses": [{"ability_score": {"index": "dex", "name": "DEX"}, "bonus": 2}],
            "size": "Medium",
            "languages": [{"index": "common", "name": "Common"}, {"index": "elvish", "name": "Elvish"}],
            "traits": [{"index": "darkvision", "name": "Darkvision"}, {"index": "trance", "name": "Trance"}],
            "subraces": [{"index": "high-elf", "name": "High Elf"}]
        });
        let row = race_row("elf", &elf);

        assert_eq!(row.len(), RACES_HEADER.len());
        assert_eq!(row[3], Cell::Empty);
        assert_eq!(row[4], Cell::Int(2));
        assert_eq!(row[14], Cell::from("Common, Elvish"));
        assert_eq!(row[16], Cell::from("Darkvision, Trance"));
        assert_eq!(row[13], Cell::Empty);
    }

    #[test]
    fn test_subrace_row_references_race_by_index() {
        let hill = json!({
            "index": "hill-dwarf",
            "name": "Hill Dwarf",
            "race": {"index": "dwarf", "name": "Dwarf"},
            "desc": "Keen senses.",
            "ability_bonuses": [{"ability_score": {"index": "wis", "name": "WIS"}, "bonus": 1}],
            "racial_traits": [{"index": "dwarven-toughness", "name": "Dwarven Toughness"}]
        });
        let row = subrace_row("hill-dwarf", &hill);

        assert_eq!(row.len(), SUBRACES_HEADER.len());
        assert_eq!(row[2], Cell::from("dwarf"));
        assert_eq!(row[7], Cell::Int(1));
        assert_eq!(row[4], Cell::Empty);
        assert_eq!(row[12], Cell::from("Dwarven Toughness"));
    }
}
