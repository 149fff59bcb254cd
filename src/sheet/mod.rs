//! Destination worksheets
//!
//! Each entity type's rows land in one named worksheet. Writes are destructive: the sheet is
//! cleared and then the header plus every row is appended in one bulk call, so rerunning with
//! the same upstream data always leaves the same final state.

pub mod csv_dir;
pub mod google;
pub mod memory;

pub use csv_dir::CsvWorkbook;
pub use google::GoogleSheets;
pub use memory::MemoryWorkbook;

use crate::error::Result;
use crate::types::{Row, Table};
use tracing::info;

/// Row count of a newly created worksheet
pub const DEFAULT_ROWS: usize = 1000;
/// Column count of a newly created worksheet
pub const DEFAULT_COLS: usize = 26;

/// A collection of named worksheets
pub trait Workbook {
    fn has_worksheet(&mut self, title: &str) -> Result<bool>;

    fn add_worksheet(&mut self, title: &str, rows: usize, cols: usize) -> Result<()>;

    /// Remove every value from the worksheet
    fn clear(&mut self, title: &str) -> Result<()>;

    /// Append rows after the last non-empty row, as a single operation
    fn append_rows(&mut self, title: &str, rows: &[Row]) -> Result<()>;
}

/// Writes whole tables to a workbook
pub struct SheetWriter<W: Workbook> {
    workbook: W,
}

impl<W: Workbook> SheetWriter<W> {
    pub fn new(workbook: W) -> Self {
        SheetWriter { workbook }
    }

    pub fn workbook(&self) -> &W {
        &self.workbook
    }

    pub fn into_inner(self) -> W {
        self.workbook
    }

    /// Replace the worksheet's contents with the table's header and rows.
    ///
    /// Returns the number of data rows written. A failure part-way leaves the worksheet in
    /// whatever state the backend reached.
    pub fn write_table(&mut self, title: &str, table: &Table) -> Result<usize> {
        if !self.workbook.has_worksheet(title)? {
            let cols = DEFAULT_COLS.max(table.width());
            info!(sheet = title, rows = DEFAULT_ROWS, cols, "creating worksheet");
            self.workbook.add_worksheet(title, DEFAULT_ROWS, cols)?;
        }
        self.workbook.clear(title)?;
        self.workbook.append_rows(title, &table.to_rows())?;
        info!(sheet = title, rows = table.rows.len(), "worksheet written");
        Ok(table.rows.len())
    }
}
