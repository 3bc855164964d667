//! Tracker Model - typed records for the division tracker
//!
//! Defines the three entity kinds the tracker mirrors from the document
//! store and the boundary between untyped documents and typed records:
//! - Identifiers ([`EmployeeId`], [`ProjectId`], [`TaskId`])
//! - Enumerated fields that preserve unknown values
//! - Document-store record shape ([`Record`], [`FieldValue`], [`Document`])
//! - Ingestion (document → typed entity, with defaults) and egress (draft → record)
//! - [`Snapshot`]: an immutable view over all three collections
//!
//! # Example
//!
//! ```rust,ignore
//! use tracker_model::{Document, EntityKind, Snapshot, Task};
//!
//! let tasks: Vec<Task> = documents.iter().map(Task::from_document).collect();
//! let snapshot = Snapshot::default().with_tasks(tasks);
//! assert_eq!(snapshot.in_progress_tasks().count(), 0);
//! ```

#![warn(unreachable_pub)]

pub mod entity;
pub mod enums;
pub mod error;
pub mod ids;
pub mod record;
pub mod snapshot;

pub use entity::{Employee, EmployeeDraft, Project, ProjectDraft, Task, TaskDraft};
pub use enums::{Choice, EntityKind, Priority, ProjectStatus, TaskStatus};
pub use error::ModelError;
pub use ids::{EmployeeId, ProjectId, TaskId};
pub use record::{Document, FieldValue, Record};
pub use snapshot::Snapshot;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with tracker records
    pub use crate::{
        Choice, Document, Employee, EmployeeId, EntityKind, Priority, Project, ProjectId,
        ProjectStatus, Record, Snapshot, Task, TaskId, TaskStatus,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
