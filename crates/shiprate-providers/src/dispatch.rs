//! One executed HTTP exchange with response introspection and masked dumps.
//!
//! A `Dispatcher` is built by executing the request: `get`/`post` never
//! return `Err` — transport failures, non-2xx statuses, and unparseable
//! bodies are all captured on the returned value so callers (and post-hoc
//! diagnostics) can inspect exactly what happened.
//!
//! Anything logged about a request MUST go through [`Dispatcher::to_debug_value`],
//! which applies the masking callback to every string leaf before the data
//! can reach a sink. This is the one security-relevant invariant here.

use reqwest::Client;
use serde_json::{json, Value};

use crate::params::{RequestHeaders, RequestParams};

/// Replacement text for masked secrets.
pub const REDACTED: &str = "[redacted]";

/// Redaction callback: given a dot-joined path (e.g. `params.key`,
/// `headers.X-Goog-Api-Key`, `body.features.0.center`) and the string value
/// at that path, returns `Some(replacement)` to mask or `None` to keep.
pub type Masker = fn(path: &str, value: &str) -> Option<String>;

/// Masker that keeps everything. For requests carrying no secrets.
#[must_use]
pub fn mask_nothing(_path: &str, _value: &str) -> Option<String> {
    None
}

/// A single outbound HTTP call and its parsed outcome.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    method: &'static str,
    url: String,
    params: RequestParams,
    headers: RequestHeaders,
    masker: Masker,
    status: Option<u16>,
    transport_error: Option<String>,
    body: Option<Value>,
}

impl Dispatcher {
    /// Executes a GET request with `params` appended as a query string.
    pub async fn get(
        client: &Client,
        url: &str,
        params: RequestParams,
        headers: RequestHeaders,
        masker: Masker,
    ) -> Self {
        let mut dispatcher = Self::pending("GET", url, params, headers, masker);

        let mut request_url = match reqwest::Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                dispatcher.transport_error = Some(format!("invalid request url: {e}"));
                return dispatcher;
            }
        };
        if !dispatcher.params.is_empty() {
            let mut pairs = request_url.query_pairs_mut();
            for (key, value) in dispatcher.params.iter() {
                pairs.append_pair(key, &query_value(value));
            }
        }

        let mut request = client.get(request_url);
        for (name, value) in dispatcher.headers.iter() {
            request = request.header(name, value);
        }
        dispatcher.execute(request).await;
        dispatcher
    }

    /// Executes a POST request with `params` JSON-encoded as the body.
    pub async fn post(
        client: &Client,
        url: &str,
        params: RequestParams,
        headers: RequestHeaders,
        masker: Masker,
    ) -> Self {
        let mut dispatcher = Self::pending("POST", url, params, headers, masker);

        let mut request = client.post(url).json(&dispatcher.params.to_json_object());
        for (name, value) in dispatcher.headers.iter() {
            request = request.header(name, value);
        }
        dispatcher.execute(request).await;
        dispatcher
    }

    fn pending(
        method: &'static str,
        url: &str,
        params: RequestParams,
        headers: RequestHeaders,
        masker: Masker,
    ) -> Self {
        Self {
            method,
            url: url.to_owned(),
            params,
            headers,
            masker,
            status: None,
            transport_error: None,
            body: None,
        }
    }

    async fn execute(&mut self, request: reqwest::RequestBuilder) {
        match request.send().await {
            Ok(response) => {
                self.status = Some(response.status().as_u16());
                match response.text().await {
                    // Malformed JSON leaves the body empty rather than
                    // failing; callers treat it like a missing path.
                    Ok(text) => self.body = serde_json::from_str(&text).ok(),
                    Err(e) => self.transport_error = Some(describe_transport_error(&e)),
                }
            }
            Err(e) => self.transport_error = Some(describe_transport_error(&e)),
        }
    }

    /// True on transport failure or a non-2xx response status.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.transport_error.is_some()
            || !self.status.is_some_and(|code| (200..300).contains(&code))
    }

    #[must_use]
    pub fn method(&self) -> &'static str {
        self.method
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Transport-level failure description, if the request never produced a
    /// response. Timeouts are called out explicitly.
    #[must_use]
    pub fn transport_error(&self) -> Option<&str> {
        self.transport_error.as_deref()
    }

    /// The parsed JSON response body; `None` when the body was missing or
    /// not valid JSON.
    #[must_use]
    pub fn response_json(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Walks the response body by object keys and array indices.
    /// Returns `None` for missing paths and malformed bodies alike.
    #[must_use]
    pub fn json_path(&self, path: &[&str]) -> Option<&Value> {
        let mut current = self.body.as_ref()?;
        for segment in path {
            current = match current {
                Value::Object(map) => map.get(*segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    #[must_use]
    pub fn json_str(&self, path: &[&str]) -> Option<&str> {
        self.json_path(path).and_then(Value::as_str)
    }

    #[must_use]
    pub fn json_f64(&self, path: &[&str]) -> Option<f64> {
        self.json_path(path).and_then(Value::as_f64)
    }

    /// The full exchange as a JSON value with the masker applied to every
    /// string leaf of the params, headers, and body. The only representation
    /// of a dispatcher that may be handed to a log sink.
    #[must_use]
    pub fn to_debug_value(&self) -> Value {
        let headers: Value = Value::Object(
            self.headers
                .iter()
                .map(|(name, value)| (name.to_owned(), Value::String(value.to_owned())))
                .collect(),
        );
        json!({
            "method": self.method,
            "url": self.url,
            "params": mask_tree("params", &self.params.to_json_object(), self.masker),
            "headers": mask_tree("headers", &headers, self.masker),
            "status": self.status,
            "transport_error": self.transport_error,
            "body": self.body.as_ref().map(|body| mask_tree("body", body, self.masker)),
        })
    }
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out: {error}")
    } else if error.is_connect() {
        format!("connection failed: {error}")
    } else {
        format!("http transport error: {error}")
    }
}

fn mask_tree(path: &str, value: &Value, masker: Masker) -> Value {
    match value {
        Value::String(s) => masker(path, s).map_or_else(|| value.clone(), Value::String),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, child)| {
                    (key.clone(), mask_tree(&format!("{path}.{key}"), child, masker))
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(index, child)| mask_tree(&format!("{path}.{index}"), child, masker))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_key(path: &str, _value: &str) -> Option<String> {
        path.ends_with(".key").then(|| REDACTED.to_owned())
    }

    #[test]
    fn mask_tree_redacts_matching_string_leaves() {
        let tree = json!({
            "key": "secret-token",
            "nested": {"key": "also-secret", "other": "visible"},
            "list": [{"key": "deep-secret"}],
        });
        let masked = mask_tree("params", &tree, mask_key);
        assert_eq!(masked["key"], json!(REDACTED));
        assert_eq!(masked["nested"]["key"], json!(REDACTED));
        assert_eq!(masked["nested"]["other"], json!("visible"));
        assert_eq!(masked["list"][0]["key"], json!(REDACTED));
        assert!(!masked.to_string().contains("secret-token"));
    }

    #[test]
    fn mask_tree_leaves_non_strings_alone() {
        let tree = json!({"key": 42, "flag": true});
        let masked = mask_tree("params", &tree, mask_key);
        assert_eq!(masked, tree);
    }

    #[test]
    fn query_value_renders_scalars_bare() {
        assert_eq!(query_value(&json!("x")), "x");
        assert_eq!(query_value(&json!(12)), "12");
        assert_eq!(query_value(&json!(true)), "true");
        assert_eq!(query_value(&json!(["a", "b"])), "[\"a\",\"b\"]");
    }
}
