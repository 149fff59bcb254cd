//! # Lorekeeper - D&D 5e reference data to spreadsheets
//!
//! Fetches spells, classes, races and the rest of the D&D 5e SRD from the public REST API,
//! flattens each nested record into rows, and writes one worksheet per table.
//!
//! ## Modules
//!
//! - **fetch**: collection listing and cached record retrieval
//! - **lookup**: null-safe access into nested JSON
//! - **expand**: forward-fill and cross-product row expansion
//! - **parsers**: per-entity-type field extraction
//! - **sheet**: destructive clear-then-append worksheet writes
//! - **driver**: ordered parser registry with exclusions
//! - **sql**: CSV → SQL `INSERT` conversion
//!
//! ## Quick Start
//!
//! ```rust
//! use lorekeeper::{MemorySource, MemoryWorkbook, Registry, SheetNames, SheetWriter};
//! use serde_json::json;
//!
//! let mut source = MemorySource::new().with_record(
//!     "skills",
//!     json!({"index": "stealth", "name": "Stealth", "ability_score": {"name": "DEX"}}),
//! );
//! let mut writer = SheetWriter::new(MemoryWorkbook::new());
//!
//! let report = Registry::standard().run_only(
//!     &mut source,
//!     &mut writer,
//!     &SheetNames::default(),
//!     &[lorekeeper::EntityKind::Skills],
//! );
//! assert!(report[0].1.is_success());
//! assert_eq!(writer.workbook().rows("Skills").unwrap().len(), 2);
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod expand;
pub mod fetch;
pub mod logging;
pub mod lookup;
pub mod parsers;
pub mod sheet;
pub mod sql;
pub mod types;

pub use config::{Config, SheetNames};
pub use driver::{ParseStatus, Registry};
pub use error::{Error, Result};
pub use fetch::{ApiClient, HttpTransport, JsonCache, MemorySource, RecordSource};
pub use parsers::{EntityKind, EntityParser, ListUnavailable};
pub use sheet::{CsvWorkbook, GoogleSheets, MemoryWorkbook, SheetWriter, Workbook};
pub use types::{Cell, Row, Table, TableId};
