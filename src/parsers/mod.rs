//! Per-entity-type field extraction
//!
//! Each parser lists its collection, walks every record in API order, and flattens it into
//! one or more rows. Records that fail to fetch still produce rows, with every field except
//! the index left empty.

pub mod classes;
pub mod equipment;
pub mod features;
pub mod magic_items;
pub mod proficiencies;
pub mod races;
pub mod skills;
pub mod spells;
pub mod subclasses;
pub mod traits;

use crate::fetch::RecordSource;
use crate::lookup;
use crate::types::{Cell, Table};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// One category of reference data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Spells,
    Classes,
    Races,
    Proficiencies,
    Traits,
    Features,
    Skills,
    Subraces,
    Subclasses,
    Equipment,
    MagicItems,
}

impl EntityKind {
    pub const ALL: [EntityKind; 11] = [
        EntityKind::Spells,
        EntityKind::Classes,
        EntityKind::Races,
        EntityKind::Proficiencies,
        EntityKind::Traits,
        EntityKind::Features,
        EntityKind::Skills,
        EntityKind::Subraces,
        EntityKind::Subclasses,
        EntityKind::Equipment,
        EntityKind::MagicItems,
    ];

    /// Stable identifier, also the API collection route
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Spells => "spells",
            EntityKind::Classes => "classes",
            EntityKind::Races => "races",
            EntityKind::Proficiencies => "proficiencies",
            EntityKind::Traits => "traits",
            EntityKind::Features => "features",
            EntityKind::Skills => "skills",
            EntityKind::Subraces => "subraces",
            EntityKind::Subclasses => "subclasses",
            EntityKind::Equipment => "equipment",
            EntityKind::MagicItems => "magic-items",
        }
    }

    /// Human-readable name used in status messages
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::MagicItems => "magic items",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = EntityKind::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown entity type '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

/// The collection endpoint was unreachable or returned no results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("failed to get {} list", .0.label())]
pub struct ListUnavailable(pub EntityKind);

/// Extraction for one entity type
pub trait EntityParser {
    fn kind(&self) -> EntityKind;

    /// Every table this entity type produces, main table first
    fn parse(&self, source: &mut dyn RecordSource) -> Result<Vec<Table>, ListUnavailable>;
}

/// List a collection and hand each record to `visit`, one at a time and in API order.
///
/// A record that could not be fetched is passed as `Value::Null`.
pub fn each_record<F>(
    source: &mut dyn RecordSource,
    kind: EntityKind,
    mut visit: F,
) -> Result<(), ListUnavailable>
where
    F: FnMut(&mut dyn RecordSource, &str, &Value),
{
    let indices = source.list(kind.as_str());
    if indices.is_empty() {
        return Err(ListUnavailable(kind));
    }
    let total = indices.len();
    for (i, index) in indices.iter().enumerate() {
        info!("parsing {} of {}: {}", i + 1, total, index);
        let record = source.record(kind.as_str(), index).unwrap_or(Value::Null);
        visit(&mut *source, index.as_str(), &record);
    }
    Ok(())
}

/// Abilities in column order
pub const ABILITIES: [&str; 6] = ["STR", "DEX", "CON", "WIS", "INT", "CHA"];

/// One cell per fixed ability from a list of `{ability_score, bonus}` pairs.
///
/// Abilities the list does not mention stay empty rather than zero.
pub fn ability_cells(record: &Value) -> Vec<Cell> {
    let bonuses = lookup::array_at(record, &["ability_bonuses"]);
    ABILITIES
        .iter()
        .map(|ability| {
            let matching: Vec<i64> = bonuses
                .iter()
                .filter(|entry| {
                    let name = lookup::str_at(entry, &["ability_score", "name"])
                        .or_else(|| lookup::str_at(entry, &["ability_score", "index"]));
                    name.is_some_and(|n| n.eq_ignore_ascii_case(ability))
                })
                .filter_map(|entry| lookup::i64_at(entry, &["bonus"]))
                .collect();
            if matching.is_empty() {
                Cell::Empty
            } else {
                Cell::Int(matching.iter().sum())
            }
        })
        .collect()
}

/// Text of a reference field: `index` for cross-reference columns
pub fn index_cell(record: &Value, path: &[&str]) -> Cell {
    let mut full: Vec<&str> = path.to_vec();
    full.push("index");
    Cell::opt_text(lookup::str_at(record, &full))
}

/// Text of a reference field: `name` for display columns
pub fn name_cell(record: &Value, path: &[&str]) -> Cell {
    let mut full: Vec<&str> = path.to_vec();
    full.push("name");
    Cell::opt_text(lookup::str_at(record, &full))
}

/// Raw scalar at a path
pub fn cell(record: &Value, path: &[&str]) -> Cell {
    Cell::from_json(lookup::get(record, path))
}
