use super::{cell, each_record, name_cell, EntityKind, EntityParser, ListUnavailable};
use crate::fetch::RecordSource;
use crate::lookup;
use crate::types::{Cell, Row, Table, TableId};
use serde_json::Value;

pub const SKILLS: TableId = TableId("skills");

pub const HEADER: &[&str] = &["index", "name", "ability_score", "description"];

pub fn row(index: &str, skill: &Value) -> Row {
    vec![
        Cell::from(index),
        cell(skill, &["name"]),
        name_cell(skill, &["ability_score"]),
        Cell::text(lookup::join_lines(skill, &["desc"])),
    ]
}

pub struct SkillsParser;

impl EntityParser for SkillsParser {
    fn kind(&self) -> EntityKind {
        EntityKind::Skills
    }

    fn parse(&self, source: &mut dyn RecordSource) -> Result<Vec<Table>, ListUnavailable> {
        let mut table = Table::new(SKILLS, HEADER);
        each_record(source, self.kind(), |_, index, record| {
            table.push(row(index, record));
        })?;
        Ok(vec![table])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemorySource;
    use serde_json::json;

    #[test]
    fn test_skill_row_uses_ability_name_and_joins_description() {
        let stealth = json!({
            "index": "stealth",
            "name": "Stealth",
            "ability_score": {"index": "dex", "name": "DEX"},
            "desc": ["Conceal yourself.", "Slip past guards."]
        });

        assert_eq!(
            row("stealth", &stealth),
            vec![
                Cell::from("stealth"),
                Cell::from("Stealth"),
                Cell::from("DEX"),
                Cell::from("Conceal yourself.\nSlip past guards.")
            ]
        );
    }

    #[test]
    fn test_parser_keeps_unfetchable_skills() {
        let mut source = MemorySource::new()
            .with_record("skills", json!({"index": "arcana", "name": "Arcana"}))
            .with_listed("skills", "history");
        let tables = SkillsParser.parse(&mut source).unwrap();

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].id, SKILLS);
        assert_eq!(tables[0].rows[0][2], Cell::Empty);
        assert_eq!(
            tables[0].rows[1],
            vec![Cell::from("history"), Cell::Empty, Cell::Empty, Cell::Empty]
        );
    }
}
