//! Typed entities and drafts
//!
//! Ingestion (`from_document`) never fails: absent or malformed fields fall
//! back to defaults so one bad document cannot blank the whole view.
//! Drafts are the write-side shape; they serialise to a [`Record`].

use crate::enums::{EntityKind, Priority, ProjectStatus, TaskStatus};
use crate::error::ModelError;
use crate::ids::{EmployeeId, ProjectId, TaskId};
use crate::record::{Document, FieldValue, Record};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Wire format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a stored date. Accepts `YYYY-MM-DD` and full ISO timestamps.
///
/// # Errors
/// `ModelError::InvalidDate` when no date prefix can be read
pub fn parse_date(value: &str) -> Result<NaiveDate, ModelError> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .or_else(|_| {
            trimmed
                .get(..10)
                .ok_or(())
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, DATE_FORMAT).map_err(|_| ()))
        })
        .map_err(|()| ModelError::invalid_date(value))
}

/// Format a date for the wire
#[inline]
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn date_field(doc: &Document, kind: EntityKind, field: &str) -> Option<NaiveDate> {
    let raw = doc.text(field)?;
    match parse_date(raw) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::warn!(%kind, id = %doc.id, field, "ignoring malformed date: {e}");
            None
        }
    }
}

fn owned_text(doc: &Document, field: &str) -> Option<String> {
    doc.text(field).map(str::to_string)
}

fn date_value(date: Option<NaiveDate>) -> FieldValue {
    date.map_or(FieldValue::Null, |d| FieldValue::Text(format_date(d)))
}

/// Employee record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Document id
    pub id: EmployeeId,
    /// Display name
    pub name: String,
    /// Job title
    pub role: String,
    /// Department name
    pub department: String,
    /// Whether this employee manages others
    pub is_manager: bool,
    /// Direct manager; `None` for the division head and orphans
    pub parent_id: Option<EmployeeId>,
    /// Creation timestamp (RFC 3339), if stamped
    pub created_at: Option<String>,
}

impl Employee {
    /// Ingest from a stored document
    #[must_use]
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: EmployeeId::new(doc.id.clone()),
            name: owned_text(doc, "name").unwrap_or_default(),
            role: owned_text(doc, "role").unwrap_or_default(),
            department: owned_text(doc, "department").unwrap_or_default(),
            is_manager: doc.flag("isManager"),
            parent_id: doc.text("parentId").map(EmployeeId::from),
            created_at: owned_text(doc, "createdAt"),
        }
    }
}

/// Project record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Document id
    pub id: ProjectId,
    /// Display name
    pub name: String,
    /// Free text description
    pub description: Option<String>,
    /// Responsible manager
    pub manager_id: Option<EmployeeId>,
    /// Copied from the manager at write time
    pub department: String,
    /// Lifecycle status
    pub status: ProjectStatus,
    /// Start date
    pub start_date: Option<NaiveDate>,
    /// Target end date
    pub end_date: Option<NaiveDate>,
    /// Creation timestamp (RFC 3339), if stamped
    pub created_at: Option<String>,
}

impl Project {
    /// Ingest from a stored document
    #[must_use]
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: ProjectId::new(doc.id.clone()),
            name: owned_text(doc, "name").unwrap_or_default(),
            description: owned_text(doc, "description"),
            manager_id: doc.text("managerId").map(EmployeeId::from),
            department: owned_text(doc, "department").unwrap_or_default(),
            status: doc
                .text("status")
                .map(ProjectStatus::from)
                .unwrap_or_default(),
            start_date: date_field(doc, EntityKind::Projects, "startDate"),
            end_date: date_field(doc, EntityKind::Projects, "endDate"),
            created_at: owned_text(doc, "createdAt"),
        }
    }

    /// Whether the project is active
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ProjectStatus::Active
    }
}

/// Task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Document id
    pub id: TaskId,
    /// Display name
    pub name: String,
    /// Free text description
    pub description: Option<String>,
    /// Owning project
    pub project_id: Option<ProjectId>,
    /// Responsible employee
    pub assignee_id: Option<EmployeeId>,
    /// Start date
    pub start_date: Option<NaiveDate>,
    /// Due date
    pub due_date: Option<NaiveDate>,
    /// Priority
    pub priority: Priority,
    /// Status
    pub status: TaskStatus,
    /// Creation timestamp (RFC 3339), if stamped
    pub created_at: Option<String>,
}

impl Task {
    /// Ingest from a stored document
    #[must_use]
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: TaskId::new(doc.id.clone()),
            name: owned_text(doc, "name").unwrap_or_default(),
            description: owned_text(doc, "description"),
            project_id: doc.text("projectId").map(ProjectId::from),
            assignee_id: doc.text("assigneeId").map(EmployeeId::from),
            start_date: date_field(doc, EntityKind::Tasks, "startDate"),
            due_date: date_field(doc, EntityKind::Tasks, "dueDate"),
            priority: doc.text("priority").map(Priority::from).unwrap_or_default(),
            status: doc.text("status").map(TaskStatus::from).unwrap_or_default(),
            created_at: owned_text(doc, "createdAt"),
        }
    }

    /// Whether the task is done
    #[inline]
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }
}

fn require_name(kind: EntityKind, name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::MissingField { kind, field: "name" });
    }
    Ok(())
}

/// Write-side employee fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeDraft {
    /// Display name
    pub name: String,
    /// Job title
    pub role: String,
    /// Department name
    pub department: String,
    /// Whether this employee manages others
    pub is_manager: bool,
    /// Direct manager
    pub parent_id: Option<EmployeeId>,
}

impl EmployeeDraft {
    /// Check required fields
    ///
    /// # Errors
    /// `ModelError::MissingField` when the name is blank
    pub fn validate(&self) -> Result<(), ModelError> {
        require_name(EntityKind::Employees, &self.name)
    }

    /// Serialise for the store
    #[must_use]
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert("name".into(), self.name.clone().into());
        record.insert("role".into(), self.role.clone().into());
        record.insert("department".into(), self.department.clone().into());
        record.insert("isManager".into(), self.is_manager.into());
        record.insert(
            "parentId".into(),
            FieldValue::text_or_null(self.parent_id.as_ref().map(EmployeeId::as_str)),
        );
        record
    }
}

/// Write-side project fields. `department` is not here: it is derived from
/// the manager when the draft is written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDraft {
    /// Display name
    pub name: String,
    /// Free text description
    pub description: Option<String>,
    /// Responsible manager
    pub manager_id: Option<EmployeeId>,
    /// Lifecycle status
    pub status: ProjectStatus,
    /// Start date
    pub start_date: Option<NaiveDate>,
    /// Target end date
    pub end_date: Option<NaiveDate>,
}

impl ProjectDraft {
    /// Check required fields
    ///
    /// # Errors
    /// `ModelError::MissingField` when the name is blank
    pub fn validate(&self) -> Result<(), ModelError> {
        require_name(EntityKind::Projects, &self.name)
    }

    /// Serialise for the store with the resolved department
    #[must_use]
    pub fn to_record(&self, department: &str) -> Record {
        let mut record = Record::new();
        record.insert("name".into(), self.name.clone().into());
        record.insert(
            "description".into(),
            self.description.clone().unwrap_or_default().into(),
        );
        record.insert(
            "managerId".into(),
            FieldValue::text_or_null(self.manager_id.as_ref().map(EmployeeId::as_str)),
        );
        record.insert("department".into(), department.into());
        record.insert("status".into(), self.status.as_str().into());
        record.insert("startDate".into(), date_value(self.start_date));
        record.insert("endDate".into(), date_value(self.end_date));
        record
    }
}

/// Write-side task fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskDraft {
    /// Display name
    pub name: String,
    /// Free text description
    pub description: Option<String>,
    /// Owning project
    pub project_id: Option<ProjectId>,
    /// Responsible employee
    pub assignee_id: Option<EmployeeId>,
    /// Start date
    pub start_date: Option<NaiveDate>,
    /// Due date
    pub due_date: Option<NaiveDate>,
    /// Priority
    pub priority: Priority,
    /// Status
    pub status: TaskStatus,
}

impl TaskDraft {
    /// Check required fields
    ///
    /// # Errors
    /// `ModelError::MissingField` when the name or project is missing
    pub fn validate(&self) -> Result<(), ModelError> {
        require_name(EntityKind::Tasks, &self.name)?;
        if self.project_id.is_none() {
            return Err(ModelError::MissingField {
                kind: EntityKind::Tasks,
                field: "projectId",
            });
        }
        Ok(())
    }

    /// Serialise for the store
    #[must_use]
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert("name".into(), self.name.clone().into());
        record.insert(
            "description".into(),
            self.description.clone().unwrap_or_default().into(),
        );
        record.insert(
            "projectId".into(),
            FieldValue::text_or_null(self.project_id.as_ref().map(ProjectId::as_str)),
        );
        record.insert(
            "assigneeId".into(),
            FieldValue::text_or_null(self.assignee_id.as_ref().map(EmployeeId::as_str)),
        );
        record.insert("startDate".into(), date_value(self.start_date));
        record.insert("dueDate".into(), date_value(self.due_date));
        record.insert("priority".into(), self.priority.as_str().into());
        record.insert("status".into(), self.status.as_str().into());
        record
    }
}
