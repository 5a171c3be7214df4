//! Declarative settings-field schemas.
//!
//! Each provider describes its configuration as data: which outbound
//! param or header a field feeds, whether it is required or secret, and an
//! optional pure sanitizer. Shared routines then build request parts and
//! collect validation errors, so only location formatting and response
//! parsing stay bespoke per provider.

use std::collections::HashMap;

use serde_json::Value;

use crate::params::{RequestHeaders, RequestParams};

/// Read-only provider configuration (API keys, travel modes, profiles).
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    values: HashMap<String, String>,
}

impl ProviderSettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }
}

impl FromIterator<(String, String)> for ProviderSettings {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl From<HashMap<String, String>> for ProviderSettings {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

/// Pure cleanup applied to a field value before it is used.
pub type Sanitizer = fn(&str) -> String;

/// Where a settings field lands on the outbound request, if anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTarget {
    /// Consumed by bespoke request-building code instead.
    None,
    Param(&'static str),
    Header(&'static str),
}

/// One declared provider settings field.
#[derive(Debug, Clone)]
pub struct SettingsField {
    pub key: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub secret: bool,
    pub default: Option<&'static str>,
    pub target: FieldTarget,
    pub sanitizer: Option<Sanitizer>,
}

impl SettingsField {
    #[must_use]
    pub fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            required: false,
            secret: false,
            default: None,
            target: FieldTarget::None,
            sanitizer: None,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    #[must_use]
    pub fn param(mut self, key: &'static str) -> Self {
        self.target = FieldTarget::Param(key);
        self
    }

    #[must_use]
    pub fn header(mut self, name: &'static str) -> Self {
        self.target = FieldTarget::Header(name);
        self
    }

    #[must_use]
    pub fn sanitize(mut self, sanitizer: Sanitizer) -> Self {
        self.sanitizer = Some(sanitizer);
        self
    }
}

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// The field's effective value: configured value, else default, sanitized.
fn resolved_value(field: &SettingsField, settings: &ProviderSettings) -> Option<String> {
    let raw = settings
        .get(field.key)
        .map(str::to_owned)
        .or_else(|| field.default.map(str::to_owned))?;
    Some(match field.sanitizer {
        Some(sanitize) => sanitize(&raw),
        None => raw,
    })
}

/// Missing required fields, accumulated as a list rather than aborting on
/// the first.
#[must_use]
pub fn collect_field_errors(
    fields: &[SettingsField],
    settings: &ProviderSettings,
) -> Vec<FieldError> {
    fields
        .iter()
        .filter(|field| field.required && resolved_value(field, settings).is_none())
        .map(|field| FieldError {
            field: field.key.to_owned(),
            message: format!("{} is required", field.label),
        })
        .collect()
}

/// Routes every resolvable field value to its declared param or header.
#[must_use]
pub fn build_request_parts(
    fields: &[SettingsField],
    settings: &ProviderSettings,
) -> (RequestParams, RequestHeaders) {
    let mut params = RequestParams::new();
    let mut headers = RequestHeaders::new();
    for field in fields {
        let Some(value) = resolved_value(field, settings) else {
            continue;
        };
        match field.target {
            FieldTarget::Param(key) => params.add(key, Value::String(value)),
            FieldTarget::Header(name) => headers.add(name, &value),
            FieldTarget::None => {}
        }
    }
    (params, headers)
}

/// Common sanitizer: trim surrounding whitespace.
#[must_use]
pub fn trimmed(value: &str) -> String {
    value.trim().to_owned()
}

/// Common sanitizer: trim and lowercase (routing profiles, travel modes).
#[must_use]
pub fn trimmed_lowercase(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Common sanitizer: trim and uppercase (Google travel modes).
#[must_use]
pub fn trimmed_uppercase(value: &str) -> String {
    value.trim().to_uppercase()
}
