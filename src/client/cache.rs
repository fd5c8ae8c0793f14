use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

/// Cache key made of path-like segments, e.g. `["applications", "user", "7"]`.
pub type QueryKey = Vec<String>;

#[macro_export]
macro_rules! query_key {
    ($($segment:expr),* $(,)?) => {
        vec![$($segment.to_string()),*]
    };
}

/// Read-through store for decoded query results. Invalidation is by key
/// prefix, so `["jobs"]` drops every job list and every single job.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<QueryKey, Value>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<QueryKey, Value>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: &[String]) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    pub fn insert(&self, key: QueryKey, value: Value) {
        self.lock().insert(key, value);
    }

    /// Removes every entry whose key starts with `prefix`; returns how many.
    pub fn invalidate(&self, prefix: &[String]) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(?prefix, removed, "query cache invalidated");
        }
        removed
    }

    pub fn contains(&self, key: &[String]) -> bool {
        self.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prefix_invalidation_spares_siblings() {
        let cache = QueryCache::new();
        cache.insert(query_key!["jobs", "{}"], json!([]));
        cache.insert(query_key!["jobs", 42], json!({"id": 42}));
        cache.insert(query_key!["applications", "user", 7], json!([]));
        cache.insert(query_key!["applications", "job", 3], json!([]));

        assert_eq!(cache.invalidate(&query_key!["jobs"]), 2);
        assert_eq!(cache.invalidate(&query_key!["applications", "user", 7]), 1);
        assert!(cache.contains(&query_key!["applications", "job", 3]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn partial_segment_is_not_a_prefix() {
        let cache = QueryCache::new();
        cache.insert(query_key!["jobs", 42], json!({}));
        assert_eq!(cache.invalidate(&query_key!["jobs", 4]), 0);
        assert!(!cache.is_empty());
    }
}
