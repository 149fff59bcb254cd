//! CSV → SQL `INSERT` conversion
//!
//! Turns an exported sheet (header row + data rows) into a single multi-row `INSERT`
//! statement. Empty strings become `null`; `TRUE`, `FALSE` and all-digit values are emitted
//! bare; everything else is single-quoted with embedded quotes doubled.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use tracing::info;

/// Where the converter writes when no output path is given
pub const DEFAULT_OUTPUT: &str = "output.sql";

static DIGITS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// SQL literal for one CSV field
pub fn sql_value(value: &str) -> String {
    if value.is_empty() {
        "null".to_string()
    } else if value == "TRUE" || value == "FALSE" || DIGITS_REGEX.is_match(value) {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', "''"))
    }
}

/// `(v1, v2, ...)` for one CSV record
pub fn value_tuple<'a>(row: impl IntoIterator<Item = &'a str>) -> String {
    let values: Vec<String> = row.into_iter().map(sql_value).collect();
    format!("({})", values.join(", "))
}

/// Read CSV from `reader` and write one `INSERT` statement to `out`.
///
/// Returns the number of value tuples written. A file with a header but no rows produces no
/// statement at all.
pub fn csv_to_insert<R: Read, W: Write>(table: &str, reader: R, mut out: W) -> Result<usize> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = csv.headers()?.iter().map(str::to_string).collect();

    let mut tuples = Vec::new();
    for record in csv.records() {
        let record = record?;
        tuples.push(value_tuple(record.iter()));
    }
    if tuples.is_empty() {
        return Ok(0);
    }

    let write_err = |e| Error::io("<sql output>", e);
    writeln!(out, "INSERT INTO {} ({})", table, headers.join(", ")).map_err(write_err)?;
    writeln!(out, "VALUES").map_err(write_err)?;
    writeln!(out, "{};", tuples.join(",\n")).map_err(write_err)?;
    out.flush().map_err(write_err)?;
    Ok(tuples.len())
}

/// File-to-file conversion
pub fn convert_file(table: &str, csv_path: &Path, output: &Path) -> Result<usize> {
    let input = File::open(csv_path).map_err(|e| Error::io(csv_path, e))?;
    let out = File::create(output).map_err(|e| Error::io(output, e))?;
    let rows = csv_to_insert(table, input, BufWriter::new(out))?;
    info!(table, rows, output = %output.display(), "SQL written");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_quoting() {
        assert_eq!(value_tuple(["Bard", "", "TRUE", "12"]), "('Bard', null, TRUE, 12)");
        assert_eq!(sql_value("Thieves' Tools"), "'Thieves'' Tools'");
        assert_eq!(sql_value("FALSE"), "FALSE");
        assert_eq!(sql_value("true"), "'true'");
        assert_eq!(sql_value("-3"), "'-3'");
        assert_eq!(sql_value("1.5"), "'1.5'");
    }

    #[test]
    fn test_csv_to_insert() {
        let input = "name,hit_die,is_spellcaster,description\n\
                     Bard,8,TRUE,\"Sings, \"\"loudly\"\"\"\n\
                     Fighter,10,FALSE,\n";
        let mut out = Vec::new();
        let rows = csv_to_insert("public.classes", input.as_bytes(), &mut out).unwrap();

        assert_eq!(rows, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "INSERT INTO public.classes (name, hit_die, is_spellcaster, description)\n\
             VALUES\n\
             ('Bard', 8, TRUE, 'Sings, \"loudly\"'),\n\
             ('Fighter', 10, FALSE, null);\n"
        );
    }

    #[test]
    fn test_header_only_writes_nothing() {
        let mut out = Vec::new();
        assert_eq!(csv_to_insert("t", "a,b\n".as_bytes(), &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_convert_file() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("skills.csv");
        let sql_path = dir.path().join("output.sql");
        std::fs::write(&csv_path, "class,skill\nbard,skill-arcana\n").unwrap();

        assert_eq!(convert_file("classes_skills", &csv_path, &sql_path).unwrap(), 1);
        let sql = std::fs::read_to_string(&sql_path).unwrap();
        assert!(sql.ends_with("('bard', 'skill-arcana');\n"));
    }
}
