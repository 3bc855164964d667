//! Task sorting
//!
//! Each column maps a task to a [`SortKey`]: a collation key for text
//! columns, a rank for enumerations, a date, or a day count. Keys are
//! computed once per task, then compared; ties are broken by task id so
//! the order is total and `desc` is exactly the reverse of `asc`.

use crate::collate::CollationKey;
use crate::derive::{days_remaining, NO_DUE_DATE_DAYS};
use crate::error::QueryError;
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::str::FromStr;
use tracker_model::{Snapshot, Task};

/// Sortable columns of the task table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortColumn {
    /// Task name
    Name,
    /// Linked project's name
    Project,
    /// Name of the linked project's manager
    Manager,
    /// Assignee's name
    Assignee,
    /// Priority rank
    Priority,
    /// Due date
    DueDate,
    /// Days until due
    DaysRemaining,
    /// Status rank
    Status,
}

impl SortColumn {
    /// Every column
    pub const ALL: [SortColumn; 8] = [
        Self::Name,
        Self::Project,
        Self::Manager,
        Self::Assignee,
        Self::Priority,
        Self::DueDate,
        Self::DaysRemaining,
        Self::Status,
    ];

    /// Column identifier
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Project => "project",
            Self::Manager => "manager",
            Self::Assignee => "assignee",
            Self::Priority => "priority",
            Self::DueDate => "dueDate",
            Self::DaysRemaining => "daysRemaining",
            Self::Status => "status",
        }
    }

    /// Whether the column compares text
    #[must_use]
    pub fn is_text(self) -> bool {
        matches!(
            self,
            Self::Name | Self::Project | Self::Manager | Self::Assignee
        )
    }
}

impl std::fmt::Display for SortColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortColumn {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| QueryError::UnknownColumn(s.to_string()))
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Asc,
    /// Largest first
    Desc,
}

impl SortDirection {
    /// The other direction
    #[inline]
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(QueryError::UnknownDirection(s.to_string())),
        }
    }
}

/// Active sort of the task table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SortState {
    /// Column sorted on
    pub column: SortColumn,
    /// Direction
    pub direction: SortDirection,
}

impl SortState {
    /// Ascending sort on a column
    #[inline]
    #[must_use]
    pub fn new(column: SortColumn) -> Self {
        Self {
            column,
            direction: SortDirection::Asc,
        }
    }

    /// With direction
    #[inline]
    #[must_use]
    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Header click: the same column flips direction, another column
    /// starts ascending
    #[must_use]
    pub fn toggle(current: Option<Self>, column: SortColumn) -> Self {
        match current {
            Some(state) if state.column == column => state.with_direction(state.direction.flip()),
            _ => Self::new(column),
        }
    }
}

/// Comparable value of one task on one column
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    /// Collated text
    Text(CollationKey),
    /// Enumeration rank
    Rank(u8),
    /// Calendar date; unset sorts first
    Date(Option<NaiveDate>),
    /// Signed day count
    Days(i64),
}

impl SortKey {
    /// Key of `task` on `column`
    #[must_use]
    pub fn of(task: &Task, column: SortColumn, snapshot: &Snapshot, today: NaiveDate) -> Self {
        match column {
            SortColumn::Name => Self::text(&task.name),
            SortColumn::Project => Self::text(
                snapshot
                    .project_opt(task.project_id.as_ref())
                    .map_or("", |p| p.name.as_str()),
            ),
            SortColumn::Manager => Self::text(
                snapshot
                    .manager_of_task(task)
                    .map_or("", |e| e.name.as_str()),
            ),
            SortColumn::Assignee => Self::text(
                snapshot
                    .employee_opt(task.assignee_id.as_ref())
                    .map_or("", |e| e.name.as_str()),
            ),
            SortColumn::Priority => Self::Rank(task.priority.rank()),
            SortColumn::Status => Self::Rank(task.status.rank()),
            SortColumn::DueDate => Self::Date(task.due_date),
            SortColumn::DaysRemaining => Self::Days(
                task.due_date
                    .map_or(NO_DUE_DATE_DAYS, |due| days_remaining(due, today)),
            ),
        }
    }

    fn text(value: &str) -> Self {
        Self::Text(CollationKey::new(value))
    }
}

/// Order tasks by one column. Returns a new sequence; the input is untouched.
#[must_use]
pub fn sort_tasks<'a>(
    tasks: &[&'a Task],
    state: SortState,
    snapshot: &Snapshot,
    today: NaiveDate,
) -> Vec<&'a Task> {
    let mut keyed: Vec<(SortKey, &'a Task)> = tasks
        .iter()
        .map(|t| (SortKey::of(t, state.column, snapshot, today), *t))
        .collect();
    keyed.sort_by(|(ka, a), (kb, b)| state.direction.apply(ka.cmp(kb).then_with(|| a.id.cmp(&b.id))));
    tracing::debug!(column = %state.column, direction = ?state.direction, count = keyed.len(), "sorted tasks");
    keyed.into_iter().map(|(_, t)| t).collect()
}
