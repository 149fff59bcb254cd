use crate::error::{Error, Result};
use crate::sheet::Workbook;
use crate::types::Row;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
struct Worksheet {
    rows: usize,
    cols: usize,
    values: Vec<Row>,
}

/// Workbook held in memory; used for dry runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: BTreeMap<String, Worksheet>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self, title: &str) -> Option<&[Row]> {
        self.sheets.get(title).map(|s| s.values.as_slice())
    }

    /// (rows, cols) the worksheet was created with
    pub fn size(&self, title: &str) -> Option<(usize, usize)> {
        self.sheets.get(title).map(|s| (s.rows, s.cols))
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }

    fn sheet_mut(&mut self, title: &str) -> Result<&mut Worksheet> {
        self.sheets.get_mut(title).ok_or_else(|| Error::Sheet {
            sheet: title.to_string(),
            message: "worksheet not found".to_string(),
        })
    }
}

impl Workbook for MemoryWorkbook {
    fn has_worksheet(&mut self, title: &str) -> Result<bool> {
        Ok(self.sheets.contains_key(title))
    }

    fn add_worksheet(&mut self, title: &str, rows: usize, cols: usize) -> Result<()> {
        self.sheets.insert(
            title.to_string(),
            Worksheet {
                rows,
                cols,
                values: Vec::new(),
            },
        );
        Ok(())
    }

    fn clear(&mut self, title: &str) -> Result<()> {
        self.sheet_mut(title)?.values.clear();
        Ok(())
    }

    fn append_rows(&mut self, title: &str, rows: &[Row]) -> Result<()> {
        self.sheet_mut(title)?.values.extend(rows.iter().cloned());
        Ok(())
    }
}
