//! Input model - generated sections, source documents, and quantified data.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Generated IEP text keyed by section name (e.g. `present_levels`).
///
/// Backed by a `BTreeMap` so iteration order, and therefore every derived
/// report, is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratedContent(BTreeMap<String, String>);

impl GeneratedContent {
    /// Create an empty set of sections.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add a section (builder style).
    pub fn with_section(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    /// Insert or replace a section.
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.0.insert(name.into(), text.into());
    }

    /// Get a section's text.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(|s| s.as_str())
    }

    /// Iterate sections in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no sections.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All section texts joined with `sep`.
    pub fn joined(&self, sep: &str) -> String {
        self.0.values().map(|s| s.as_str()).collect::<Vec<_>>().join(sep)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for GeneratedContent {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Raw reference texts used as the regurgitation baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceDocuments(Vec<String>);

impl SourceDocuments {
    /// Create an empty document list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a document.
    pub fn push(&mut self, doc: impl Into<String>) {
        self.0.push(doc.into());
    }

    /// Iterate documents in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.as_str())
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no documents.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All documents joined with a single space.
    pub fn joined(&self) -> String {
        self.0.join(" ")
    }
}

impl<S: Into<String>> FromIterator<S> for SourceDocuments {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Semi-structured assessment metrics (domain -> metric values).
///
/// Only used for data-integration checks. Missing keys, `null`, and
/// non-object shapes all read as "not found".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuantifiedData(JsonValue);

impl QuantifiedData {
    /// Wrap a JSON value.
    pub fn new(value: JsonValue) -> Self {
        Self(value)
    }

    /// The underlying JSON value.
    pub fn as_json(&self) -> &JsonValue {
        &self.0
    }

    /// Look up a top-level key; `null` counts as absent.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Whether a top-level key holds a non-empty value.
    pub fn has(&self, key: &str) -> bool {
        match self.get(key) {
            Some(JsonValue::Object(map)) => !map.is_empty(),
            Some(JsonValue::Array(items)) => !items.is_empty(),
            Some(JsonValue::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
            None => false,
        }
    }

    /// Domain names under a top-level key.
    ///
    /// Object keys for maps (`{"reading": {...}}`), string items for lists.
    pub fn domain_names(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(JsonValue::Object(map)) => map.keys().cloned().collect(),
            Some(JsonValue::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Whether no usable data exists at all.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            JsonValue::Null => true,
            JsonValue::Object(map) => map.values().all(|v| v.is_null()),
            _ => false,
        }
    }
}

impl From<JsonValue> for QuantifiedData {
    fn from(value: JsonValue) -> Self {
        Self(value)
    }
}

/// Everything one validation run consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationRequest {
    /// Section name -> generated prose
    pub generated_sections: GeneratedContent,

    /// Zero or more reference texts
    #[serde(default)]
    pub source_documents: SourceDocuments,

    /// Assessment metrics for data-integration checks
    #[serde(default)]
    pub quantified_data: QuantifiedData,
}

impl ValidationRequest {
    /// Create a request from its parts.
    pub fn new(
        generated_sections: GeneratedContent,
        source_documents: SourceDocuments,
        quantified_data: QuantifiedData,
    ) -> Self {
        Self {
            generated_sections,
            source_documents,
            quantified_data,
        }
    }

    /// Decode a request, failing fast on wrongly-typed fields.
    pub fn from_value(value: JsonValue) -> crate::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Decode a request from JSON text.
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
