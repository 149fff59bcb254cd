use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// A single scalar value in a flattened row
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Cell {
    /// Convert an optional JSON value into a cell.
    ///
    /// Missing values and `null` become `Empty`. Arrays are joined with ", " (using the
    /// `name` of reference objects), and objects render as their `name` when they have one.
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Cell::Empty,
            Some(Value::Bool(b)) => Cell::Bool(*b),
            Some(Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    Cell::Int(i)
                } else {
                    n.as_f64().map(Cell::Float).unwrap_or(Cell::Empty)
                }
            }
            Some(Value::String(s)) => Cell::text(s.as_str()),
            Some(Value::Array(items)) => Cell::text(crate::lookup::join_items(items, ", ")),
            Some(Value::Object(obj)) => match obj.get("name") {
                Some(Value::String(name)) => Cell::Text(name.clone()),
                _ => Cell::Text(Value::Object(obj.clone()).to_string()),
            },
        }
    }

    /// Text cell, or `Empty` for an empty string
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s)
        }
    }

    pub fn opt_text(s: Option<impl Into<String>>) -> Self {
        s.map(Cell::text).unwrap_or(Cell::Empty)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// JSON value used by spreadsheet APIs; empty cells become ""
    pub fn to_json(&self) -> Value {
        match self {
            Cell::Empty => Value::String(String::new()),
            Cell::Text(s) => Value::String(s.clone()),
            Cell::Int(i) => Value::from(*i),
            Cell::Float(f) => Value::from(*f),
            Cell::Bool(b) => Value::Bool(*b),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(x) => write!(f, "{}", x),
            Cell::Bool(true) => f.write_str("TRUE"),
            Cell::Bool(false) => f.write_str("FALSE"),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::text(s)
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::text(s)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Int(i)
    }
}

impl From<u32> for Cell {
    fn from(i: u32) -> Self {
        Cell::Int(i64::from(i))
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

/// One flattened row, aligned positionally to its table's header
pub type Row = Vec<Cell>;

/// Stable identifier of an output table, e.g. "spells", "classes_skills"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(pub &'static str);

impl TableId {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A header plus the rows produced for it
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub id: TableId,
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(id: TableId, header: &[&str]) -> Self {
        Table {
            id,
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Append rows, padding or truncating each to the header width
    pub fn extend(&mut self, rows: impl IntoIterator<Item = Row>) {
        let width = self.width();
        for mut row in rows {
            row.resize(width, Cell::Empty);
            self.rows.push(row);
        }
    }

    pub fn push(&mut self, row: Row) {
        self.extend(std::iter::once(row));
    }

    /// Position of a column by header name
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Header row followed by every data row
    pub fn to_rows(&self) -> Vec<Row> {
        let mut out = Vec::with_capacity(self.rows.len() + 1);
        out.push(self.header.iter().map(|h| Cell::Text(h.clone())).collect());
        out.extend(self.rows.iter().cloned());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_from_json() {
        assert_eq!(Cell::from_json(None), Cell::Empty);
        assert_eq!(Cell::from_json(Some(&json!(null))), Cell::Empty);
        assert_eq!(Cell::from_json(Some(&json!(3))), Cell::Int(3));
        assert_eq!(Cell::from_json(Some(&json!(1.5))), Cell::Float(1.5));
        assert_eq!(Cell::from_json(Some(&json!(true))), Cell::Bool(true));
        assert_eq!(Cell::from_json(Some(&json!(""))), Cell::Empty);
        assert_eq!(
            Cell::from_json(Some(&json!({"index": "evocation", "name": "Evocation"}))),
            Cell::Text("Evocation".into())
        );
        assert_eq!(
            Cell::from_json(Some(&json!(["V", "S", "M"]))),
            Cell::Text("V, S, M".into())
        );
    }

    #[test]
    fn test_cell_display_uses_sheet_booleans() {
        assert_eq!(Cell::Bool(true).to_string(), "TRUE");
        assert_eq!(Cell::Bool(false).to_string(), "FALSE");
        assert_eq!(Cell::Empty.to_string(), "");
    }

    #[test]
    fn test_table_pads_rows_to_header() {
        let mut table = Table::new(TableId("t"), &["a", "b", "c"]);
        table.push(vec![Cell::Int(1)]);
        assert_eq!(table.rows[0], vec![Cell::Int(1), Cell::Empty, Cell::Empty]);

        let rows = table.to_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][2], Cell::Text("c".into()));
    }
}
