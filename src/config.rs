//! Runtime configuration from the environment (and `.env`)
//!
//! | variable | meaning | default |
//! |---|---|---|
//! | `DND_API_URL` | upstream API root | `https://www.dnd5eapi.co/api/` |
//! | `CACHE_DIR` | JSON cache root | `cache` |
//! | `URL_FOR_GSHEET` | destination spreadsheet URL or id | none |
//! | `GSHEET_ACCESS_TOKEN` | OAuth bearer token for the Sheets API | none |
//! | `OUTPUT_DIR` | directory for the CSV backend | `sheets` |
//! | `<TABLE>_SHEET_NAME` | worksheet name for a table, e.g. `SPELLS_SHEET_NAME` | see [`SheetNames`] |

use crate::fetch::DEFAULT_API_URL;
use crate::parsers::{classes, equipment, features, magic_items, proficiencies, races, skills};
use crate::parsers::{spells, subclasses, traits};
use crate::types::TableId;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Every table the parsers can produce, with its default worksheet name
pub const DEFAULT_SHEET_NAMES: &[(TableId, &str)] = &[
    (spells::SPELLS, "Spells"),
    (classes::CLASSES, "Classes"),
    (classes::CLASSES_SKILLS, "Classes_Skills"),
    (races::RACES, "Races"),
    (races::SUBRACES, "Subraces"),
    (traits::TRAITS, "Traits"),
    (features::FEATURES, "Features"),
    (skills::SKILLS, "Skills"),
    (proficiencies::PROFICIENCIES, "Proficiencies"),
    (subclasses::SUBCLASSES, "Subclasses"),
    (subclasses::SUBCLASSES_SPELLS, "Subclasses_Spells"),
    (equipment::EQUIPMENT, "Equipment"),
    (magic_items::MAGIC_ITEMS, "Magic_Items"),
    (magic_items::MAGIC_ITEMS_VARIANTS, "Magic_Items_Variants"),
];

/// Table → worksheet name mapping
#[derive(Debug, Clone, PartialEq)]
pub struct SheetNames {
    names: BTreeMap<TableId, String>,
}

impl Default for SheetNames {
    fn default() -> Self {
        SheetNames {
            names: DEFAULT_SHEET_NAMES
                .iter()
                .map(|(id, name)| (*id, name.to_string()))
                .collect(),
        }
    }
}

impl SheetNames {
    /// Defaults overridden by `<TABLE>_SHEET_NAME` lookups
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut names = SheetNames::default();
        for (id, _) in DEFAULT_SHEET_NAMES {
            let var = format!("{}_SHEET_NAME", id.as_str().to_ascii_uppercase());
            if let Some(name) = lookup(&var).filter(|n| !n.trim().is_empty()) {
                names.set(*id, name.trim());
            }
        }
        names
    }

    pub fn set(&mut self, id: TableId, name: impl Into<String>) {
        self.names.insert(id, name.into());
    }

    /// Worksheet for a table; unknown tables use their identifier
    pub fn sheet_for(&self, id: TableId) -> String {
        self.names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.as_str().to_string())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub cache_dir: PathBuf,
    pub sheet_url: Option<String>,
    pub sheet_token: Option<String>,
    pub output_dir: PathBuf,
    pub sheet_names: SheetNames,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            cache_dir: PathBuf::from("cache"),
            sheet_url: None,
            sheet_token: None,
            output_dir: PathBuf::from("sheets"),
            sheet_names: SheetNames::default(),
        }
    }
}

impl Config {
    /// Read the process environment.
    ///
    /// `.env` is not loaded here; binaries call `dotenvy::dotenv()` once at startup so clap's
    /// env fallbacks see the same values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();
        Config {
            api_url: get("DND_API_URL").unwrap_or(defaults.api_url),
            cache_dir: get("CACHE_DIR").map(PathBuf::from).unwrap_or(defaults.cache_dir),
            sheet_url: get("URL_FOR_GSHEET"),
            sheet_token: get("GSHEET_ACCESS_TOKEN"),
            output_dir: get("OUTPUT_DIR").map(PathBuf::from).unwrap_or(defaults.output_dir),
            sheet_names: SheetNames::from_lookup(&lookup),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_cover_every_table() {
        let names = SheetNames::default();
        assert_eq!(names.sheet_for(spells::SPELLS), "Spells");
        assert_eq!(names.sheet_for(magic_items::MAGIC_ITEMS_VARIANTS), "Magic_Items_Variants");
        assert_eq!(names.sheet_for(TableId("unknown")), "unknown");
    }

    #[test]
    fn test_environment_overrides() {
        let env: HashMap<&str, &str> = [
            ("CACHE_DIR", "/tmp/dnd"),
            ("URL_FOR_GSHEET", "https://docs.google.com/spreadsheets/d/abc/edit"),
            ("SPELLS_SHEET_NAME", "All Spells"),
            ("CLASSES_SKILLS_SHEET_NAME", "  "),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/dnd"));
        assert!(config.sheet_url.is_some());
        assert!(config.sheet_token.is_none());
        assert_eq!(config.sheet_names.sheet_for(spells::SPELLS), "All Spells");
        assert_eq!(
            config.sheet_names.sheet_for(classes::CLASSES_SKILLS),
            "Classes_Skills"
        );
    }

    #[test]
    fn test_from_env_reads_process_environment() {
        std::env::set_var("DND_API_URL", "http://localhost:3000/api/");
        let config = Config::from_env();
        std::env::remove_var("DND_API_URL");

        assert_eq!(config.api_url, "http://localhost:3000/api/");
    }
}
