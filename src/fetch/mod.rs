//! Entity fetching
//!
//! Collections are listed from the API on every run; individual records are served from the
//! local JSON cache when present and fetched (then cached) otherwise.

pub mod cache;
pub mod client;
pub mod memory;

pub use cache::JsonCache;
pub use client::{ApiClient, HttpTransport, Transport, DEFAULT_API_URL};
pub use memory::MemorySource;

use serde_json::Value;

/// Where extractors get their records from
pub trait RecordSource {
    /// Identifiers reported by a collection endpoint, in API order.
    /// Empty means the collection could not be retrieved.
    fn list(&mut self, resource: &str) -> Vec<String>;

    /// Full record for `resource/index`, or `None` if it could not be fetched
    fn record(&mut self, resource: &str, index: &str) -> Option<Value>;

    /// Auxiliary record at `resource/index/sub`, such as a class's level table
    fn sub_record(&mut self, resource: &str, index: &str, sub: &str) -> Option<Value>;
}
