use crate::fetch::RecordSource;
use serde_json::Value;
use std::collections::HashMap;

/// In-memory record source keyed by route, for offline runs and tests
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    lists: HashMap<String, Vec<String>>,
    records: HashMap<String, Value>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record under `resource/index` and add it to the resource's list
    pub fn with_record(mut self, resource: &str, record: Value) -> Self {
        let index = record
            .get("index")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        self.lists
            .entry(resource.to_string())
            .or_default()
            .push(index.clone());
        self.records.insert(format!("{}/{}", resource, index), record);
        self
    }

    /// Register an auxiliary record under `resource/index/sub`
    pub fn with_sub_record(mut self, resource: &str, index: &str, sub: &str, record: Value) -> Self {
        self.records
            .insert(format!("{}/{}/{}", resource, index, sub), record);
        self
    }

    /// List an identifier without a backing record, simulating a failed item fetch
    pub fn with_listed(mut self, resource: &str, index: &str) -> Self {
        self.lists
            .entry(resource.to_string())
            .or_default()
            .push(index.to_string());
        self
    }
}

impl RecordSource for MemorySource {
    fn list(&mut self, resource: &str) -> Vec<String> {
        self.lists.get(resource).cloned().unwrap_or_default()
    }

    fn record(&mut self, resource: &str, index: &str) -> Option<Value> {
        self.records.get(&format!("{}/{}", resource, index)).cloned()
    }

    fn sub_record(&mut self, resource: &str, index: &str, sub: &str) -> Option<Value> {
        self.records
            .get(&format!("{}/{}/{}", resource, index, sub))
            .cloned()
    }
}
