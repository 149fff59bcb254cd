//! Row expansion along an implicit axis
//!
//! A single record becomes several rows when one of its attributes varies by level, slot or
//! category. The helpers here materialise the axis and build the rows; extractors only decide
//! which axis applies and what the key-dependent values are.

use crate::types::{Cell, Row};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// Lowest and highest character level
pub const CHARACTER_LEVELS: RangeInclusive<u32> = 1..=20;

/// Walk an ascending axis and carry the last present value into gaps.
///
/// The value at each axis point is either the map's own value at that point, the value at
/// the latest earlier point that had one, or `None` if nothing has been seen yet. Map entries
/// past the end of the axis are never consulted, and entries before its start seed the
/// carried value.
pub fn forward_fill<T: Clone>(
    axis: RangeInclusive<u32>,
    sparse: &BTreeMap<u32, T>,
) -> Vec<(u32, Option<T>)> {
    let start = *axis.start();
    let mut last = sparse.range(..start).next_back().map(|(_, v)| v.clone());
    axis.map(|point| {
        if let Some(v) = sparse.get(&point) {
            last = Some(v.clone());
        }
        (point, last.clone())
    })
    .collect()
}

/// Cartesian product of categorical lists, outer list first.
///
/// An empty list contributes a single `Cell::Empty` placeholder, so the product always has
/// at least one element.
pub fn cross_product(lists: &[Vec<String>]) -> Vec<Vec<Cell>> {
    let mut combos: Vec<Vec<Cell>> = vec![Vec::new()];
    for list in lists {
        let options: Vec<Cell> = if list.is_empty() {
            vec![Cell::Empty]
        } else {
            list.iter().map(|s| Cell::text(s.as_str())).collect()
        };
        combos = combos
            .into_iter()
            .flat_map(|prefix| {
                options.iter().map(move |option| {
                    let mut combo = prefix.clone();
                    combo.push(option.clone());
                    combo
                })
            })
            .collect();
    }
    combos
}

/// Append each axis point to a copy of the base row.
///
/// With no points, exactly one row comes back with `width` empty cells in place of the
/// axis-dependent columns.
pub fn expand(base: &[Cell], points: Vec<Vec<Cell>>, width: usize) -> Vec<Row> {
    if points.is_empty() {
        let mut row = base.to_vec();
        row.extend(std::iter::repeat(Cell::Empty).take(width));
        return vec![row];
    }
    points
        .into_iter()
        .map(|point| {
            let mut row = base.to_vec();
            row.extend(point);
            row
        })
        .collect()
}
