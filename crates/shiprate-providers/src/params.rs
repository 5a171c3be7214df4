//! Ordered key-value collections for outbound requests.
//!
//! Insertion order is preserved so query strings and JSON bodies are stable
//! within a process run. Overwriting a key keeps its original position.

use serde_json::Value;

/// Ordered parameters for a query string or JSON request body.
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    entries: Vec<(String, Value)>,
}

impl RequestParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `key`. Last write wins; position is kept on
    /// replacement.
    pub fn add(&mut self, key: &str, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_owned(), value)),
        }
    }

    /// Like [`RequestParams::add`], but when both the existing and the new
    /// value are JSON objects their keys are merged, new sub-keys
    /// overwriting existing ones of the same name. Any other combination
    /// replaces.
    pub fn add_merged(&mut self, key: &str, value: Value) {
        if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| k == key) {
            if let (Value::Object(old), Value::Object(new)) = (&mut *existing, &value) {
                for (sub_key, sub_value) in new {
                    old.insert(sub_key.clone(), sub_value.clone());
                }
                return;
            }
            *existing = value;
            return;
        }
        self.entries.push((key.to_owned(), value));
    }

    /// Removes `key`; a no-op when absent.
    pub fn remove(&mut self, key: &str) {
        self.entries.retain(|(k, _)| k != key);
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The parameters as a JSON object (key order is not significant to
    /// any of the provider APIs).
    #[must_use]
    pub fn to_json_object(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

/// Ordered HTTP headers.
#[derive(Debug, Clone, Default)]
pub struct RequestHeaders {
    entries: Vec<(String, String)>,
}

impl RequestHeaders {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `name`. Last write wins.
    pub fn add(&mut self, name: &str, value: &str) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.to_owned(),
            None => self.entries.push((name.to_owned(), value.to_owned())),
        }
    }

    /// Removes `name`; a no-op when absent.
    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|(n, _)| n != name);
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn add_replaces_in_place() {
        let mut params = RequestParams::new();
        params.add("a", json!(1));
        params.add("b", json!(2));
        params.add("a", json!(3));
        let keys: Vec<_> = params.iter().map(|(k, _)| k.to_owned()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(params.get("a"), Some(&json!(3)));
    }

    #[test]
    fn add_merged_merges_objects() {
        let mut params = RequestParams::new();
        params.add("k", json!({"a": 1}));
        params.add_merged("k", json!({"b": 2}));
        assert_eq!(params.get("k"), Some(&json!({"a": 1, "b": 2})));
    }

    #[test]
    fn add_merged_overwrites_shared_sub_keys() {
        let mut params = RequestParams::new();
        params.add("k", json!({"a": 1, "b": 1}));
        params.add_merged("k", json!({"b": 2}));
        assert_eq!(params.get("k"), Some(&json!({"a": 1, "b": 2})));
    }

    #[test]
    fn add_without_merge_replaces_objects_entirely() {
        let mut params = RequestParams::new();
        params.add("k", json!({"a": 1}));
        params.add("k", json!({"b": 2}));
        assert_eq!(params.get("k"), Some(&json!({"b": 2})));
    }

    #[test]
    fn add_merged_replaces_when_either_side_is_scalar() {
        let mut params = RequestParams::new();
        params.add("k", json!({"a": 1}));
        params.add_merged("k", json!("scalar"));
        assert_eq!(params.get("k"), Some(&json!("scalar")));
    }

    #[test]
    fn remove_missing_key_is_a_no_op() {
        let mut params = RequestParams::new();
        params.add("a", json!(1));
        params.remove("missing");
        assert_eq!(params.len(), 1);
        params.remove("a");
        assert!(params.is_empty());
    }

    #[test]
    fn headers_last_write_wins() {
        let mut headers = RequestHeaders::new();
        headers.add("X-Token", "one");
        headers.add("X-Token", "two");
        assert_eq!(headers.get("X-Token"), Some("two"));
    }

    #[test]
    fn to_json_object_carries_all_entries() {
        let mut params = RequestParams::new();
        params.add("z", json!(1));
        params.add("a", json!({"nested": true}));
        let body = params.to_json_object();
        assert_eq!(body["z"], json!(1));
        assert_eq!(body["a"], json!({"nested": true}));
    }
}
