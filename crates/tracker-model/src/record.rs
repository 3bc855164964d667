//! Document-store record shape
//!
//! The store speaks flat maps from field name to primitive value. Nothing
//! nested, nothing typed beyond string/boolean/null (numbers are tolerated
//! on read so a hand-edited document does not break ingestion).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One primitive field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Explicit null (cleared reference)
    Null,
    /// Boolean flag
    Bool(bool),
    /// Number (never written by the tracker)
    Number(f64),
    /// String value
    Text(String),
}

impl FieldValue {
    /// String content, if this is text
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean content, if this is a flag
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Whether this is null
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Text from an optional string, null when absent
    #[must_use]
    pub fn text_or_null(value: Option<&str>) -> Self {
        value.map_or(Self::Null, |s| Self::Text(s.to_string()))
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// A flat document body
pub type Record = BTreeMap<String, FieldValue>;

/// Read a non-empty string field; empty strings count as absent
#[must_use]
pub fn text_field<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record
        .get(field)
        .and_then(FieldValue::as_text)
        .filter(|s| !s.trim().is_empty())
}

/// Read a boolean field; anything else counts as `false`
#[must_use]
pub fn flag_field(record: &Record, field: &str) -> bool {
    record
        .get(field)
        .and_then(FieldValue::as_bool)
        .unwrap_or(false)
}

/// A stored document: id plus body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document id assigned by the store
    pub id: String,
    /// Field map
    #[serde(flatten)]
    pub fields: Record,
}

impl Document {
    /// Create new document
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, fields: Record) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Read a non-empty string field
    #[inline]
    #[must_use]
    pub fn text(&self, field: &str) -> Option<&str> {
        text_field(&self.fields, field)
    }

    /// Read a boolean field
    #[inline]
    #[must_use]
    pub fn flag(&self, field: &str) -> bool {
        flag_field(&self.fields, field)
    }
}
