//! Spells: one row per (spell, class, damage level)
//!
//! Spell damage scales either with the caster's character level or with the slot the spell
//! is cast with. The two are mutually exclusive; whichever applies becomes the expansion
//! axis, forward-filled so every level on the axis carries a value once one has appeared.

use super::{cell, each_record, name_cell, EntityKind, EntityParser, ListUnavailable};
use crate::expand::{cross_product, expand, forward_fill, CHARACTER_LEVELS};
use crate::fetch::RecordSource;
use crate::lookup;
use crate::types::{Cell, Row, Table, TableId};
use serde_json::Value;
use std::collections::BTreeMap;

pub const SPELLS: TableId = TableId("spells");

pub const HEADER: &[&str] = &[
    "index",
    "name",
    "description",
    "higher_level",
    "range",
    "components",
    "material",
    "area_of_effect_type",
    "area_of_effect_size",
    "ritual",
    "duration",
    "concentration",
    "casting_time",
    "level",
    "school",
    "attack_type",
    "damage_type",
    "dc_type",
    "dc_success",
    "class",
    "damage_axis",
    "axis_level",
    "damage",
    "heal",
];

/// Number of columns that vary per axis point (everything after `class`)
const AXIS_WIDTH: usize = 4;

/// Which level a spell's damage is keyed by
#[derive(Debug, Clone, PartialEq)]
pub enum DamageAxis {
    CharacterLevel(BTreeMap<u32, Value>),
    SlotLevel {
        base: u32,
        damage: BTreeMap<u32, Value>,
        heal: BTreeMap<u32, Value>,
    },
    None,
}

impl DamageAxis {
    pub fn detect(record: &Value) -> Self {
        let by_character = lookup::level_map(lookup::get(record, &["damage", "damage_at_character_level"]));
        if !by_character.is_empty() {
            return DamageAxis::CharacterLevel(by_character);
        }

        let damage = lookup::level_map(lookup::get(record, &["damage", "damage_at_slot_level"]));
        let heal = lookup::level_map(lookup::get(record, &["heal_at_slot_level"]));
        if damage.is_empty() && heal.is_empty() {
            return DamageAxis::None;
        }
        let lowest_key = damage.keys().chain(heal.keys()).min().copied().unwrap_or(1);
        let base = lookup::i64_at(record, &["level"])
            .and_then(|l| u32::try_from(l).ok())
            .unwrap_or(lowest_key);
        DamageAxis::SlotLevel { base, damage, heal }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DamageAxis::CharacterLevel(_) => "character_level",
            DamageAxis::SlotLevel { .. } => "slot_level",
            DamageAxis::None => "",
        }
    }

    /// `[damage_axis, axis_level, damage, heal]` for every point on the axis
    pub fn points(&self) -> Vec<Vec<Cell>> {
        let label = Cell::text(self.label());
        match self {
            DamageAxis::CharacterLevel(damage) => forward_fill(CHARACTER_LEVELS, damage)
                .into_iter()
                .map(|(level, value)| {
                    vec![
                        label.clone(),
                        Cell::from(level),
                        Cell::from_json(value.as_ref()),
                        Cell::Empty,
                    ]
                })
                .collect(),
            DamageAxis::SlotLevel { base, damage, heal } => {
                let max = damage.keys().chain(heal.keys()).max().copied().unwrap_or(*base);
                if *base > max {
                    return Vec::new();
                }
                let damage = forward_fill(*base..=max, damage);
                let heal = forward_fill(*base..=max, heal);
                damage
                    .into_iter()
                    .zip(heal)
                    .map(|((slot, dmg), (_, hp))| {
                        vec![
                            label.clone(),
                            Cell::from(slot),
                            Cell::from_json(dmg.as_ref()),
                            Cell::from_json(hp.as_ref()),
                        ]
                    })
                    .collect()
            }
            DamageAxis::None => Vec::new(),
        }
    }
}

/// Every row for one spell record
pub fn rows(index: &str, spell: &Value) -> Vec<Row> {
    let base = vec![
        Cell::from(index),
        cell(spell, &["name"]),
        Cell::text(lookup::join_lines(spell, &["desc"])),
        Cell::text(lookup::join_lines(spell, &["higher_level"])),
        cell(spell, &["range"]),
        Cell::text(lookup::join_items(lookup::array_at(spell, &["components"]), ", ")),
        cell(spell, &["material"]),
        cell(spell, &["area_of_effect", "type"]),
        cell(spell, &["area_of_effect", "size"]),
        cell(spell, &["ritual"]),
        cell(spell, &["duration"]),
        cell(spell, &["concentration"]),
        cell(spell, &["casting_time"]),
        cell(spell, &["level"]),
        name_cell(spell, &["school"]),
        cell(spell, &["attack_type"]),
        name_cell(spell, &["damage", "damage_type"]),
        name_cell(spell, &["dc", "dc_type"]),
        cell(spell, &["dc", "dc_success"]),
    ];

    let axis = DamageAxis::detect(spell).points();
    let classes = cross_product(&[lookup::indices(spell, &["classes"])]);

    let mut points = Vec::new();
    for class in classes {
        if axis.is_empty() {
            let mut point = class;
            point.extend(std::iter::repeat(Cell::Empty).take(AXIS_WIDTH));
            points.push(point);
            continue;
        }
        for axis_point in &axis {
            let mut point = class.clone();
            point.extend(axis_point.iter().cloned());
            points.push(point);
        }
    }
    expand(&base, points, AXIS_WIDTH + 1)
}

pub struct SpellsParser;

impl EntityParser for SpellsParser {
    fn kind(&self) -> EntityKind {
        EntityKind::Spells
    }

    fn parse(&self, source: &mut dyn RecordSource) -> Result<Vec<Table>, ListUnavailable> {
        let mut table = Table::new(SPELLS, HEADER);
        each_record(source, self.kind(), |_, index, record| {
            table.extend(rows(index, record));
        })?;
        Ok(vec![table])
    }
}
