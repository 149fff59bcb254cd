//! Subclasses, plus which spells each subclass makes available

use super::{cell, each_record, index_cell, EntityKind, EntityParser, ListUnavailable};
use crate::fetch::RecordSource;
use crate::lookup;
use crate::types::{Cell, Row, Table, TableId};
use serde_json::Value;

pub const SUBCLASSES: TableId = TableId("subclasses");
pub const SUBCLASSES_SPELLS: TableId = TableId("subclasses_spells");

pub const HEADER: &[&str] = &["index", "name", "class", "subclass_flavor", "description"];

pub const SPELLS_HEADER: &[&str] = &["subclass", "spell", "prerequisites"];

pub fn row(index: &str, subclass: &Value) -> Row {
    vec![
        Cell::from(index),
        cell(subclass, &["name"]),
        index_cell(subclass, &["class"]),
        cell(subclass, &["subclass_flavor"]),
        Cell::text(lookup::join_lines(subclass, &["desc"])),
    ]
}

pub fn spell_rows(index: &str, subclass: &Value) -> Vec<Row> {
    lookup::array_at(subclass, &["spells"])
        .iter()
        .filter_map(|entry| {
            let spell = lookup::str_at(entry, &["spell", "index"])?;
            let prerequisites = lookup::indices(entry, &["prerequisites"]).join(", ");
            Some(vec![Cell::from(index), Cell::from(spell), Cell::text(prerequisites)])
        })
        .collect()
}

pub struct SubclassesParser;

impl EntityParser for SubclassesParser {
    fn kind(&self) -> EntityKind {
        EntityKind::Subclasses
    }

    fn parse(&self, source: &mut dyn RecordSource) -> Result<Vec<Table>, ListUnavailable> {
        let mut subclasses = Table::new(SUBCLASSES, HEADER);
        let mut spells = Table::new(SUBCLASSES_SPELLS, SPELLS_HEADER);
        each_record(source, self.kind(), |_, index, record| {
            subclasses.push(row(index, record));
            spells.extend(spell_rows(index, record));
        })?;
        Ok(vec![subclasses, spells])
    }
}
