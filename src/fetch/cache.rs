use crate::error::{Error, Result};
use std::fs;
use std::path::PathBuf;

/// On-disk cache of raw API responses, one file per record.
///
/// Layout is `<root>/<entity-type>/<identifier>.json`. Entries are written once and never
/// expire; delete a file (or the whole directory) to force a refetch.
#[derive(Debug, Clone)]
pub struct JsonCache {
    root: PathBuf,
}

impl JsonCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        JsonCache { root: root.into() }
    }

    pub fn path_for(&self, entity_type: &str, identifier: &str) -> PathBuf {
        self.root
            .join(sanitize(entity_type))
            .join(format!("{}.json", sanitize(identifier)))
    }

    /// Raw cached body, if present
    pub fn read(&self, entity_type: &str, identifier: &str) -> Option<String> {
        fs::read_to_string(self.path_for(entity_type, identifier)).ok()
    }

    /// Store a response body verbatim
    pub fn write(&self, entity_type: &str, identifier: &str, body: &str) -> Result<PathBuf> {
        let path = self.path_for(entity_type, identifier);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::write(&path, body).map_err(|e| Error::io(&path, e))?;
        Ok(path)
    }
}

/// Keep cache keys to a single path component
fn sanitize(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_is_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonCache::new(dir.path());
        let body = "{\"index\":  \"acid-arrow\" ,\"level\":2}\n";

        assert!(cache.read("spells", "acid-arrow").is_none());
        let path = cache.write("spells", "acid-arrow", body).unwrap();

        assert_eq!(path, dir.path().join("spells").join("acid-arrow.json"));
        assert_eq!(cache.read("spells", "acid-arrow").unwrap(), body);
    }

    #[test]
    fn test_keys_stay_inside_root() {
        let cache = JsonCache::new("cache");
        assert_eq!(
            cache.path_for("classes", "../wizard"),
            PathBuf::from("cache").join("classes").join(".._wizard.json")
        );
    }
}
