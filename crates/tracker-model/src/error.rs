//! Error types for tracker records
//!
//! Ingestion itself never fails (missing fields degrade to defaults); these
//! errors cover the strict parsing entry points used by forms and the CLI.

use crate::enums::EntityKind;

/// Record-level errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Unknown collection name
    #[error("unknown entity kind: '{0}'")]
    UnknownKind(String),

    /// Date string is not `YYYY-MM-DD`
    #[error("invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected text
        value: String,
    },

    /// Field value has the wrong primitive type
    #[error("field '{field}' of {kind} has unexpected type: expected {expected}")]
    FieldType {
        /// Collection the record belongs to
        kind: EntityKind,
        /// Field name as stored
        field: &'static str,
        /// Expected primitive type
        expected: &'static str,
    },

    /// Required field missing from a draft
    #[error("{kind} draft is missing required field '{field}'")]
    MissingField {
        /// Collection the draft is for
        kind: EntityKind,
        /// Field name as stored
        field: &'static str,
    },
}

impl ModelError {
    /// Create invalid date error
    #[inline]
    pub fn invalid_date(value: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
        }
    }
}
