use super::{cell, each_record, index_cell, EntityKind, EntityParser, ListUnavailable};
use crate::fetch::RecordSource;
use crate::lookup;
use crate::types::{Cell, Row, Table, TableId};
use serde_json::Value;

pub const FEATURES: TableId = TableId("features");

pub const HEADER: &[&str] = &[
    "index",
    "name",
    "class",
    "subclass",
    "level",
    "description",
    "prerequisites",
    "parent",
];

/// Render prerequisites such as `{"type": "level", "level": 3}` as "level 3"
fn prerequisites(record: &Value) -> String {
    lookup::array_at(record, &["prerequisites"])
        .iter()
        .filter_map(|prereq| {
            let kind = lookup::str_at(prereq, &["type"])?;
            let detail = lookup::get(prereq, &[kind])
                .or_else(|| lookup::get(prereq, &["index"]))
                .map(|v| match v {
                    Value::String(s) => s.rsplit('/').next().unwrap_or(s.as_str()).to_string(),
                    other => other.to_string(),
                });
            Some(match detail {
                Some(detail) => format!("{} {}", kind, detail),
                None => kind.to_string(),
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn row(index: &str, feature: &Value) -> Row {
    vec![
        Cell::from(index),
        cell(feature, &["name"]),
        index_cell(feature, &["class"]),
        index_cell(feature, &["subclass"]),
        cell(feature, &["level"]),
        Cell::text(lookup::join_lines(feature, &["desc"])),
        Cell::text(prerequisites(feature)),
        index_cell(feature, &["parent"]),
    ]
}

pub struct FeaturesParser;

impl EntityParser for FeaturesParser {
    fn kind(&self) -> EntityKind {
        EntityKind::Features
    }

    fn parse(&self, source: &mut dyn RecordSource) -> Result<Vec<Table>, ListUnavailable> {
        let mut table = Table::new(FEATURES, HEADER);
        each_record(source, self.kind(), |_, index, record| {
            table.push(row(index, record));
        })?;
        Ok(vec![table])
    }
}
