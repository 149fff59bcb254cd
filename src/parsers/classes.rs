//! Classes: one row per (class, level), plus the class → selectable skill side table

use super::{cell, each_record, EntityKind, EntityParser, ListUnavailable};
use crate::expand::expand;
use crate::fetch::RecordSource;
use crate::lookup;
use crate::types::{Cell, Row, Table, TableId};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

pub const CLASSES: TableId = TableId("classes");
pub const CLASSES_SKILLS: TableId = TableId("classes_skills");

pub const HEADER: &[&str] = &[
    "index",
    "name",
    "hit_die",
    "saving_throws",
    "is_spellcaster",
    "level",
    "ability_score_bonus",
    "prof_bonus",
    "features",
    "cantrips_known",
    "spells_known",
    "spell_slots_level_1",
    "spell_slots_level_2",
    "spell_slots_level_3",
    "spell_slots_level_4",
    "spell_slots_level_5",
    "spell_slots_level_6",
    "spell_slots_level_7",
    "spell_slots_level_8",
    "spell_slots_level_9",
];

pub const SKILLS_HEADER: &[&str] = &["class", "class_name", "choose", "skill", "skill_name"];

const SLOT_LEVELS: usize = 9;
const LEVEL_WIDTH: usize = 6 + SLOT_LEVELS;

static SKILL_LABEL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*Skill:\s*").unwrap());

/// Class-wide level entries in ascending order, subclass-specific entries dropped
pub fn class_levels(levels: &Value) -> Vec<&Value> {
    let mut entries: Vec<&Value> = levels
        .as_array()
        .map(|a| a.iter().collect())
        .unwrap_or_default();
    entries.retain(|entry| lookup::get(entry, &["subclass"]).is_none());
    entries.sort_by_key(|entry| lookup::i64_at(entry, &["level"]).unwrap_or(i64::MAX));
    entries
}

fn slot_key(slot: usize) -> String {
    format!("spell_slots_level_{}", slot)
}

/// True iff any level grants a cantrip or a spell slot
pub fn is_spellcaster(levels: &[&Value]) -> bool {
    levels.iter().any(|entry| {
        let cantrips = lookup::i64_at(entry, &["spellcasting", "cantrips_known"]).unwrap_or(0);
        cantrips != 0
            || (1..=SLOT_LEVELS).any(|slot| {
                let key = slot_key(slot);
                lookup::i64_at(entry, &["spellcasting", key.as_str()]).unwrap_or(0) != 0
            })
    })
}

/// Per-level ability score bonus increments.
///
/// The API reports a running total; each level gets the difference from the previous level
/// that reported one. Levels without a value stay empty.
pub fn ability_score_deltas(levels: &[&Value]) -> Vec<Cell> {
    let mut previous = 0;
    levels
        .iter()
        .map(|entry| match lookup::i64_at(entry, &["ability_score_bonuses"]) {
            Some(total) => {
                let delta = total - previous;
                previous = total;
                Cell::Int(delta)
            }
            None => Cell::Empty,
        })
        .collect()
}

/// Every row for one class record and its level table
pub fn rows(index: &str, class: &Value, levels: &Value) -> Vec<Row> {
    let levels = class_levels(levels);
    let base = vec![
        Cell::from(index),
        cell(class, &["name"]),
        cell(class, &["hit_die"]),
        Cell::text(lookup::join_names(class, &["saving_throws"])),
        Cell::Bool(is_spellcaster(&levels)),
    ];

    let deltas = ability_score_deltas(&levels);
    let points = levels
        .iter()
        .zip(deltas)
        .map(|(entry, delta)| {
            let mut point = vec![
                cell(entry, &["level"]),
                delta,
                cell(entry, &["prof_bonus"]),
                Cell::text(lookup::join_names(entry, &["features"])),
                cell(entry, &["spellcasting", "cantrips_known"]),
                cell(entry, &["spellcasting", "spells_known"]),
            ];
            point.extend((1..=SLOT_LEVELS).map(|slot| {
                let key = slot_key(slot);
                cell(entry, &["spellcasting", key.as_str()])
            }));
            point
        })
        .collect();
    expand(&base, points, LEVEL_WIDTH)
}

/// Selectable options of one proficiency choice, in either of the API's two shapes
fn choice_options(choice: &Value) -> Vec<&Value> {
    let nested = lookup::array_at(choice, &["from", "options"])
        .iter()
        .filter_map(|option| lookup::get(option, &["item"]).or(Some(option)));
    let flat = lookup::array_at(choice, &["from"]).iter();
    nested.chain(flat).collect()
}

/// One row per skill the class may choose a proficiency in
pub fn skill_rows(index: &str, class: &Value) -> Vec<Row> {
    let mut rows = Vec::new();
    for choice in lookup::array_at(class, &["proficiency_choices"]) {
        for option in choice_options(choice) {
            let Some(skill) = lookup::str_at(option, &["index"]) else {
                continue;
            };
            if !skill.starts_with("skill-") {
                continue;
            }
            let label = lookup::str_at(option, &["name"]).unwrap_or_default();
            rows.push(vec![
                Cell::from(index),
                cell(class, &["name"]),
                cell(choice, &["choose"]),
                Cell::from(skill),
                Cell::text(SKILL_LABEL_REGEX.replace(label, "")),
            ]);
        }
    }
    rows
}

pub struct ClassesParser;

impl EntityParser for ClassesParser {
    fn kind(&self) -> EntityKind {
        EntityKind::Classes
    }

    fn parse(&self, source: &mut dyn RecordSource) -> Result<Vec<Table>, ListUnavailable> {
        let mut classes = Table::new(CLASSES, HEADER);
        let mut skills = Table::new(CLASSES_SKILLS, SKILLS_HEADER);
        each_record(source, self.kind(), |source, index, record| {
            let levels = source
                .sub_record(self.kind().as_str(), index, "levels")
                .unwrap_or(Value::Null);
            classes.extend(rows(index, record, &levels));
            skills.extend(skill_rows(index, record));
        })?;
        Ok(vec![classes, skills])
    }
}
