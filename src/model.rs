//! Typed accessors over opaque API records
//!
//! The pagination engine treats items as raw JSON; [`DataItem`] is the thin
//! convenience wrapper consumers reach for when they want field access
//! without defining their own structs. Missing fields read as `None`.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// A single content record with field accessors
#[derive(Debug, Clone, PartialEq)]
pub struct DataItem(Value);

impl DataItem {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Record identifier
    pub fn id(&self) -> Option<&str> {
        self.str_field("id")
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    pub fn description(&self) -> Option<&str> {
        self.str_field("description")
    }

    /// Name of the database this record belongs to
    pub fn database(&self) -> Option<&str> {
        self.str_field("database")
    }

    pub fn content(&self) -> Option<&str> {
        self.str_field("content")
    }

    /// Canonical URL of the record, if the API exposes one
    pub fn url(&self) -> Option<&str> {
        self.str_field("notion_url").or_else(|| self.str_field("url"))
    }

    /// The record's property map
    pub fn properties(&self) -> Option<&serde_json::Map<String, Value>> {
        self.0.get("properties").and_then(Value::as_object)
    }

    /// One property by key
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties().and_then(|props| props.get(key))
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.time_field("created_at")
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.time_field("updated_at")
    }

    /// Whether the record carries `key` at the top level
    pub fn has(&self, key: &str) -> bool {
        self.0.get(key).is_some()
    }

    /// Raw access to any top-level field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    fn time_field(&self, key: &str) -> Option<DateTime<Utc>> {
        self.str_field(key)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl From<Value> for DataItem {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}
