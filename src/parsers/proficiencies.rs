//! Proficiencies: one row per (proficiency, race, class) the proficiency is granted to

use super::{cell, each_record, index_cell, EntityKind, EntityParser, ListUnavailable};
use crate::expand::{cross_product, expand};
use crate::fetch::RecordSource;
use crate::lookup;
use crate::types::{Cell, Row, Table, TableId};
use serde_json::Value;

pub const PROFICIENCIES: TableId = TableId("proficiencies");

pub const HEADER: &[&str] = &["index", "name", "type", "reference", "race", "class"];

pub fn rows(index: &str, record: &Value) -> Vec<Row> {
    let base = vec![
        Cell::from(index),
        cell(record, &["name"]),
        cell(record, &["type"]),
        index_cell(record, &["reference"]),
    ];
    let combos = cross_product(&[
        lookup::indices(record, &["races"]),
        lookup::indices(record, &["classes"]),
    ]);
    expand(&base, combos, 2)
}

pub struct ProficienciesParser;

impl EntityParser for ProficienciesParser {
    fn kind(&self) -> EntityKind {
        EntityKind::Proficiencies
    }

    fn parse(&self, source: &mut dyn RecordSource) -> Result<Vec<Table>, ListUnavailable> {
        let mut table = Table::new(PROFICIENCIES, HEADER);
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

    #[test]
    fn test_expands_over_races_and_classes() {
        let record = json!({
            "index": "longswords",
            "name": "Longswords",
            "type": "Weapons",
            "classes": [{"index": "bard"}, {"index": "rogue"}],
            "races": [{"index": "high-elf"}],
            "reference": {"index": "longsword", "name": "Longsword"}
        });
        let rows = rows("longswords", &record);

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[1],
            vec![
                Cell::from("longswords"),
                Cell::from("Longswords"),
                Cell::from("Weapons"),
                Cell::from("longsword"),
                Cell::from("high-elf"),
                Cell::from("rogue")
            ]
        );
    }

    #[test]
    fn test_no_races_or_classes() {
        let rows = rows("skill-arcana", &json!({"name": "Skill: Arcana", "type": "Skills"}));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][4], Cell::Empty);
        assert_eq!(rows[0][5], Cell::Empty);
    }
}
