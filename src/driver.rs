//! Running parsers in sequence
//!
//! The registry is an explicit, ordered list of parsers keyed by [`EntityKind`]. A run walks
//! it front to back, skipping excluded kinds; each parser's tables are written before the
//! next parser starts.

use crate::config::SheetNames;
use crate::fetch::RecordSource;
use crate::parsers::classes::ClassesParser;
use crate::parsers::equipment::EquipmentParser;
use crate::parsers::features::FeaturesParser;
use crate::parsers::magic_items::MagicItemsParser;
use crate::parsers::proficiencies::ProficienciesParser;
use crate::parsers::races::{RacesParser, SubracesParser};
use crate::parsers::skills::SkillsParser;
use crate::parsers::spells::SpellsParser;
use crate::parsers::subclasses::SubclassesParser;
use crate::parsers::traits::TraitsParser;
use crate::parsers::{EntityKind, EntityParser, ListUnavailable};
use crate::sheet::{SheetWriter, Workbook};
use std::collections::HashSet;
use std::fmt;
use tracing::{error, info, warn};

/// What happened to one entity type during a run
#[derive(Debug)]
pub enum ParseStatus {
    /// Every table was written; `(sheet name, data rows)` per table
    Success(Vec<(String, usize)>),
    /// The collection could not be listed, nothing was written
    ListUnavailable(ListUnavailable),
    /// Writing to the destination failed
    WriteFailed(crate::Error),
}

impl ParseStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ParseStatus::Success(_))
    }
}

impl fmt::Display for ParseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseStatus::Success(_) => f.write_str("success"),
            ParseStatus::ListUnavailable(e) => write!(f, "{}", e),
            ParseStatus::WriteFailed(e) => write!(f, "write failed: {}", e),
        }
    }
}

pub struct Registry {
    parsers: Vec<Box<dyn EntityParser>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            parsers: Vec::new(),
        }
    }

    /// Every known parser, in run order
    pub fn standard() -> Self {
        Registry::new()
            .with(SpellsParser)
            .with(ClassesParser)
            .with(RacesParser)
            .with(ProficienciesParser)
            .with(TraitsParser)
            .with(FeaturesParser)
            .with(SkillsParser)
            .with(SubracesParser)
            .with(SubclassesParser)
            .with(EquipmentParser)
            .with(MagicItemsParser)
    }

    /// Append a parser, replacing any earlier one for the same kind
    pub fn with(mut self, parser: impl EntityParser + 'static) -> Self {
        self.parsers.retain(|p| p.kind() != parser.kind());
        self.parsers.push(Box::new(parser));
        self
    }

    pub fn kinds(&self) -> Vec<EntityKind> {
        self.parsers.iter().map(|p| p.kind()).collect()
    }

    /// Run one parser and write its tables
    pub fn run_one<W: Workbook>(
        parser: &dyn EntityParser,
        source: &mut dyn RecordSource,
        writer: &mut SheetWriter<W>,
        names: &SheetNames,
    ) -> ParseStatus {
        let tables = match parser.parse(source) {
            Ok(tables) => tables,
            Err(e) => {
                warn!(kind = %parser.kind(), "{}", e);
                return ParseStatus::ListUnavailable(e);
            }
        };

        let mut written = Vec::with_capacity(tables.len());
        for table in &tables {
            let sheet = names.sheet_for(table.id);
            match writer.write_table(&sheet, table) {
                Ok(rows) => written.push((sheet, rows)),
                Err(e) => {
                    error!(kind = %parser.kind(), %sheet, error = %e, "write failed");
                    return ParseStatus::WriteFailed(e);
                }
            }
        }
        ParseStatus::Success(written)
    }

    /// Run every registered parser except the excluded kinds, in registry order
    pub fn run_except<W: Workbook>(
        &self,
        source: &mut dyn RecordSource,
        writer: &mut SheetWriter<W>,
        names: &SheetNames,
        exclude: &[EntityKind],
    ) -> Vec<(EntityKind, ParseStatus)> {
        let exclude: HashSet<EntityKind> = exclude.iter().copied().collect();
        let mut report = Vec::new();
        for parser in &self.parsers {
            let kind = parser.kind();
            if exclude.contains(&kind) {
                info!(%kind, "skipped");
                continue;
            }
            info!(%kind, "parsing");
            let status = Self::run_one(parser.as_ref(), source, writer, names);
            info!(%kind, %status, "finished");
            report.push((kind, status));
        }
        report
    }

    /// Run only the listed kinds, still in registry order
    pub fn run_only<W: Workbook>(
        &self,
        source: &mut dyn RecordSource,
        writer: &mut SheetWriter<W>,
        names: &SheetNames,
        include: &[EntityKind],
    ) -> Vec<(EntityKind, ParseStatus)> {
        let exclude: Vec<EntityKind> = self
            .kinds()
            .into_iter()
            .filter(|kind| !include.contains(kind))
            .collect();
        self.run_except(source, writer, names, &exclude)
    }
}
