//! Error types for the entity store
//!
//! Mirrors the failure classes the UI distinguishes:
//! - Connectivity failure while attaching (persistent status)
//! - Write failure on create/update/delete (one-shot notice)
//! - Partial cascade (multi-step delete interrupted, no repair)

use std::path::PathBuf;
use tracker_model::{EntityKind, ModelError};

/// Kind of single-document write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    /// Document creation
    Create,
    /// Field update
    Update,
    /// Document removal
    Delete,
}

impl std::fmt::Display for WriteOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// Multi-step sequences that are not transactional
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeOp {
    /// Delete a project and every task linked to it
    DeleteProject,
    /// Detach an employee from reports, projects and tasks, then delete
    DeleteEmployee,
}

impl std::fmt::Display for CascadeOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::DeleteProject => "project delete",
            Self::DeleteEmployee => "employee delete",
        })
    }
}

/// Main store error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Could not attach to the document store
    #[error("connection failed: {0}")]
    Connection(String),

    /// A single write was rejected
    #[error("{op} on {kind}/{id} failed: {message}")]
    Write {
        /// Kind of write
        op: WriteOp,
        /// Target collection
        kind: EntityKind,
        /// Target document id, empty for creates
        id: String,
        /// Backend's reason
        message: String,
    },

    /// Target document does not exist
    #[error("{kind}/{id} not found")]
    NotFound {
        /// Collection searched
        kind: EntityKind,
        /// Missing document id
        id: String,
    },

    /// A cascade stopped part-way; earlier steps are not undone
    #[error("{operation} stopped after {completed} completed write(s): {source}")]
    PartialCascade {
        /// Cascade that was running
        operation: CascadeOp,
        /// Writes that succeeded before the failure
        completed: usize,
        /// The failing write
        #[source]
        source: Box<StoreError>,
    },

    /// Draft failed validation before any write
    #[error("invalid draft: {0}")]
    Invalid(#[from] ModelError),

    /// Seed file could not be read
    #[error("seed file {path}: {message}")]
    Seed {
        /// Seed file path
        path: PathBuf,
        /// Read or parse failure
        message: String,
    },

    /// Snapshot channel closed
    #[error("store channel closed")]
    Closed,
}

impl StoreError {
    /// Create write error
    #[inline]
    pub fn write(
        op: WriteOp,
        kind: EntityKind,
        id: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self::Write {
            op,
            kind,
            id: id.unwrap_or("<new>").to_string(),
            message: message.into(),
        }
    }

    /// Wrap an error that interrupted a cascade. Nothing completed means
    /// nothing is inconsistent, so the original error is returned as is.
    #[must_use]
    pub fn cascade(operation: CascadeOp, completed: usize, source: StoreError) -> Self {
        if completed == 0 {
            return source;
        }
        Self::PartialCascade {
            operation,
            completed,
            source: Box::new(source),
        }
    }

    /// Check if this is an attach-time connectivity failure
    #[inline]
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Check if the store may now be inconsistent
    #[inline]
    #[must_use]
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::PartialCascade { .. })
    }

    /// Message shown to the user for this failure
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Connection(_) | Self::Closed => "🔴 שגיאה בחיבור",
            Self::Write {
                op: WriteOp::Delete,
                ..
            }
            | Self::PartialCascade { .. } => "שגיאה במחיקה. נסה שוב.",
            Self::Invalid(_) => "נא למלא את כל שדות החובה.",
            Self::Write { .. } | Self::NotFound { .. } | Self::Seed { .. } => {
                "שגיאה בשמירה. נסה שוב."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display() {
        let err = StoreError::write(WriteOp::Update, EntityKind::Tasks, Some("t1"), "offline");
        assert_eq!(err.to_string(), "update on tasks/t1 failed: offline");

        let err = StoreError::write(WriteOp::Create, EntityKind::Projects, None, "quota");
        assert!(err.to_string().contains("projects/<new>"));
    }

    #[test]
    fn cascade_without_progress_is_plain_error() {
        let source = StoreError::write(WriteOp::Delete, EntityKind::Tasks, Some("t1"), "x");
        let err = StoreError::cascade(CascadeOp::DeleteProject, 0, source);
        assert!(!err.is_partial());

        let source = StoreError::write(WriteOp::Delete, EntityKind::Projects, Some("p1"), "x");
        let err = StoreError::cascade(CascadeOp::DeleteProject, 3, source);
        assert!(err.is_partial());
        assert!(err.to_string().contains("after 3 completed"));
    }

    #[test]
    fn user_messages_by_class() {
        assert!(StoreError::Connection("x".into()).is_connection());
        assert_eq!(
            StoreError::write(WriteOp::Delete, EntityKind::Tasks, Some("t"), "x").user_message(),
            "שגיאה במחיקה. נסה שוב."
        );
        assert_eq!(
            StoreError::write(WriteOp::Create, EntityKind::Tasks, None, "x").user_message(),
            "שגיאה בשמירה. נסה שוב."
        );
    }
}
