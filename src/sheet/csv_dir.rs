use crate::error::{Error, Result};
use crate::sheet::Workbook;
use crate::types::Row;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

/// Workbook stored as a directory with one `<title>.csv` file per worksheet
pub struct CsvWorkbook {
    dir: PathBuf,
}

impl CsvWorkbook {
    /// Open (creating if needed) the output directory
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        Ok(CsvWorkbook { dir })
    }

    pub fn path_for(&self, title: &str) -> PathBuf {
        let stem: String = title
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.dir.join(format!("{}.csv", stem))
    }
}

impl Workbook for CsvWorkbook {
    fn has_worksheet(&mut self, title: &str) -> Result<bool> {
        Ok(self.path_for(title).is_file())
    }

    /// Files have no fixed grid, so the size is ignored
    fn add_worksheet(&mut self, title: &str, _rows: usize, _cols: usize) -> Result<()> {
        let path = self.path_for(title);
        fs::File::create(&path).map_err(|e| Error::io(&path, e))?;
        Ok(())
    }

    fn clear(&mut self, title: &str) -> Result<()> {
        let path = self.path_for(title);
        fs::File::create(&path).map_err(|e| Error::io(&path, e))?;
        Ok(())
    }

    fn append_rows(&mut self, title: &str, rows: &[Row]) -> Result<()> {
        let path = self.path_for(title);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| Error::io(&path, e))?;
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(file);
        for row in rows {
            writer.write_record(row.iter().map(|cell| cell.to_string()))?;
        }
        writer.flush().map_err(|e| Error::io(&path, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    #[test]
    fn test_clear_then_append() {
        let dir = tempfile::tempdir().unwrap();
        let mut book = CsvWorkbook::new(dir.path().join("out")).unwrap();

        assert!(!book.has_worksheet("Spells").unwrap());
        book.add_worksheet("Spells", 1000, 26).unwrap();
        book.append_rows("Spells", &[vec![Cell::from("old")]]).unwrap();
        book.clear("Spells").unwrap();
        book.append_rows(
            "Spells",
            &[
                vec![Cell::from("name"), Cell::from("ritual")],
                vec![Cell::from("Alarm, \"quiet\""), Cell::Bool(true)],
            ],
        )
        .unwrap();

        let text = fs::read_to_string(book.path_for("Spells")).unwrap();
        assert_eq!(text, "name,ritual\n\"Alarm, \"\"quiet\"\"\",TRUE\n");
    }
}
