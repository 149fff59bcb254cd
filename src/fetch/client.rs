use crate::error::{Error, Result};
use crate::fetch::cache::JsonCache;
use crate::fetch::RecordSource;
use serde_json::Value;
use tracing::{debug, warn};

/// Default upstream API root
pub const DEFAULT_API_URL: &str = "https://www.dnd5eapi.co/api/";

/// Blocking GET of a URL, returning the body text
pub trait Transport {
    fn get(&self, url: &str) -> Result<String>;
}

/// `reqwest`-backed transport
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("lorekeeper/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| Error::Http {
                url: String::new(),
                source,
            })?;
        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<String> {
        let http = |source| Error::Http {
            url: url.to_string(),
            source,
        };
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(http)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().map_err(http)
    }
}

/// Fetches collections and records from the API, serving records from the cache first
pub struct ApiClient<T: Transport> {
    base_url: String,
    transport: T,
    cache: JsonCache,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(base_url: impl Into<String>, transport: T, cache: JsonCache) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        ApiClient {
            base_url,
            transport,
            cache,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route.trim_start_matches('/'))
    }

    /// Cached-or-fetched record under a cache key
    fn cached(&self, cache_type: &str, identifier: &str, route: &str) -> Option<Value> {
        if let Some(body) = self.cache.read(cache_type, identifier) {
            match serde_json::from_str(&body) {
                Ok(value) => {
                    debug!(cache_type, identifier, "cache hit");
                    return Some(value);
                }
                Err(e) => warn!(cache_type, identifier, error = %e, "corrupt cache entry, refetching"),
            }
        }

        let url = self.url(route);
        let body = match self.transport.get(&url) {
            Ok(body) => body,
            Err(e) => {
                warn!(%url, error = %e, "fetch failed");
                return None;
            }
        };
        let value: Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(e) => {
                warn!(%url, error = %e, "response is not JSON");
                return None;
            }
        };
        if let Err(e) = self.cache.write(cache_type, identifier, &body) {
            warn!(cache_type, identifier, error = %e, "could not write cache entry");
        }
        Some(value)
    }
}

impl<T: Transport> RecordSource for ApiClient<T> {
    fn list(&mut self, resource: &str) -> Vec<String> {
        let url = self.url(resource);
        let body = match self.transport.get(&url) {
            Ok(body) => body,
            Err(e) => {
                warn!(%url, error = %e, "collection fetch failed");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Value>(&body) {
            Ok(collection) => crate::lookup::indices(&collection, &["results"]),
            Err(e) => {
                warn!(%url, error = %e, "collection is not JSON");
                Vec::new()
            }
        }
    }

    fn record(&mut self, resource: &str, index: &str) -> Option<Value> {
        let route = format!("{}/{}", resource.trim_end_matches('/'), index);
        self.cached(resource, index, &route)
    }

    fn sub_record(&mut self, resource: &str, index: &str, sub: &str) -> Option<Value> {
        let resource = resource.trim_end_matches('/');
        let route = format!("{}/{}/{}", resource, index, sub);
        self.cached(&format!("{}_{}", resource, sub), index, &route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Serves canned bodies and remembers every URL requested
    struct StubTransport {
        bodies: HashMap<String, String>,
        calls: RefCell<Vec<String>>,
    }

    impl StubTransport {
        fn new(bodies: &[(&str, &str)]) -> Self {
            StubTransport {
                bodies: bodies
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for StubTransport {
        fn get(&self, url: &str) -> Result<String> {
            self.calls.borrow_mut().push(url.to_string());
            self.bodies.get(url).cloned().ok_or(Error::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    const BASE: &str = "http://api.test/api";

    #[test]
    fn test_list_reads_result_indices_in_order() {
        let transport = StubTransport::new(&[(
            "http://api.test/api/spells",
            r#"{"count":2,"results":[{"index":"zap"},{"index":"acid-arrow"}]}"#,
        )]);
        let dir = tempfile::tempdir().unwrap();
        let mut client = ApiClient::new(BASE, transport, JsonCache::new(dir.path()));

        assert_eq!(client.list("spells"), vec!["zap", "acid-arrow"]);
        assert!(client.list("monsters").is_empty());
    }

    #[test]
    fn test_second_fetch_served_from_cache() {
        let body = r#"{"index": "fireball",  "level": 3}"#;
        let transport = StubTransport::new(&[("http://api.test/api/spells/fireball", body)]);
        let dir = tempfile::tempdir().unwrap();
        let mut client = ApiClient::new(BASE, transport, JsonCache::new(dir.path()));

        let first = client.record("spells", "fireball").unwrap();
        let second = client.record("spells", "fireball").unwrap();

        assert_eq!(first, second);
        assert_eq!(client.transport().calls.borrow().len(), 1);
        let cached = std::fs::read_to_string(dir.path().join("spells/fireball.json")).unwrap();
        assert_eq!(cached, body);
    }

    #[test]
    fn test_failed_fetch_is_none_and_not_cached() {
        let transport = StubTransport::new(&[]);
        let dir = tempfile::tempdir().unwrap();
        let mut client = ApiClient::new(BASE, transport, JsonCache::new(dir.path()));

        assert!(client.record("spells", "missing").is_none());
        assert!(!dir.path().join("spells/missing.json").exists());
    }

    #[test]
    fn test_sub_record_uses_own_cache_directory() {
        let transport = StubTransport::new(&[(
            "http://api.test/api/classes/wizard/levels",
            r#"[{"level": 1}]"#,
        )]);
        let dir = tempfile::tempdir().unwrap();
        let mut client = ApiClient::new(BASE, transport, JsonCache::new(dir.path()));

        let levels = client.sub_record("classes", "wizard", "levels").unwrap();
        assert!(levels.is_array());
        assert!(dir.path().join("classes_levels/wizard.json").exists());
    }

    #[test]
    fn test_corrupt_cache_entry_is_refetched() {
        let transport =
            StubTransport::new(&[("http://api.test/api/skills/stealth", r#"{"index":"stealth"}"#)]);
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonCache::new(dir.path());
        cache.write("skills", "stealth", "{not json").unwrap();
        let mut client = ApiClient::new(BASE, transport, cache);

        let record = client.record("skills", "stealth").unwrap();
        assert_eq!(record["index"], "stealth");
        assert_eq!(client.transport().calls.borrow().len(), 1);
    }
}
