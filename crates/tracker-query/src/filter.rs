//! Cascading task filters
//!
//! A [`TaskFilter`] is an immutable selection over five dimensions. The
//! dimensions form a small dependency graph:
//!
//! ```text
//! manager ──► project ──► assignee
//!    └────────────────────────▲
//! ```
//!
//! Changing a field through [`TaskFilter::apply_change`] resets every field
//! downstream of it to `all`. Option sets for the select controls are
//! narrowed by the upstream fields, and [`TaskFilter::normalize`] drops any
//! selection that is no longer offered.
//!
//! Every function here is total: an empty result is a value, never an error.

use crate::derive::days_remaining;
use crate::error::QueryError;
use chrono::NaiveDate;
use indexmap::IndexSet;
use serde::Serialize;
use std::collections::HashSet;
use tracker_model::{Choice, Employee, EmployeeId, Project, ProjectId, Snapshot, Task, TaskStatus};

/// One entry of a select control
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OptionItem {
    /// Value submitted when chosen
    pub id: String,
    /// Text shown
    pub name: String,
}

impl From<&Employee> for OptionItem {
    fn from(e: &Employee) -> Self {
        Self {
            id: e.id.to_string(),
            name: e.name.clone(),
        }
    }
}

impl From<&Project> for OptionItem {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
        }
    }
}

fn offers(options: &[OptionItem], id: &str) -> bool {
    options.iter().any(|o| o.id == id)
}

/// Filter dimensions of the task list, in application order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskFilterField {
    /// Manager of the task's project
    Manager,
    /// Owning project
    Project,
    /// Task status
    Status,
    /// Responsible employee
    Assignee,
    /// Upper bound on days remaining
    MaxDays,
}

impl TaskFilterField {
    /// All fields in application order
    pub const ALL: [TaskFilterField; 5] = [
        Self::Manager,
        Self::Project,
        Self::Status,
        Self::Assignee,
        Self::MaxDays,
    ];

    /// Fields reset when this one changes (transitively closed)
    #[must_use]
    pub fn downstream(self) -> &'static [TaskFilterField] {
        match self {
            Self::Manager => &[Self::Project, Self::Assignee],
            Self::Project => &[Self::Assignee],
            Self::Status | Self::Assignee | Self::MaxDays => &[],
        }
    }
}

/// A single user edit to the task filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    /// Select a manager
    Manager(Choice<EmployeeId>),
    /// Select a project
    Project(Choice<ProjectId>),
    /// Select a status
    Status(Choice<TaskStatus>),
    /// Select an assignee
    Assignee(Choice<EmployeeId>),
    /// Set or clear the days window
    MaxDays(Option<i64>),
}

impl FilterChange {
    /// Field this change targets
    #[must_use]
    pub fn field(&self) -> TaskFilterField {
        match self {
            Self::Manager(_) => TaskFilterField::Manager,
            Self::Project(_) => TaskFilterField::Project,
            Self::Status(_) => TaskFilterField::Status,
            Self::Assignee(_) => TaskFilterField::Assignee,
            Self::MaxDays(_) => TaskFilterField::MaxDays,
        }
    }

    /// Parse a raw control value for `field`. `all` and empty mean no
    /// constraint for every field.
    ///
    /// # Errors
    /// `QueryError::InvalidDays` when the days window is not an integer
    pub fn parse(field: TaskFilterField, value: &str) -> Result<Self, QueryError> {
        Ok(match field {
            TaskFilterField::Manager => Self::Manager(Choice::parse(value)),
            TaskFilterField::Project => Self::Project(Choice::parse(value)),
            TaskFilterField::Status => Self::Status(Choice::parse(value)),
            TaskFilterField::Assignee => Self::Assignee(Choice::parse(value)),
            TaskFilterField::MaxDays => Self::MaxDays(parse_days(value)?),
        })
    }
}

fn parse_days(value: &str) -> Result<Option<i64>, QueryError> {
    match value.trim() {
        "" | "all" => Ok(None),
        raw => raw
            .parse()
            .map(Some)
            .map_err(|_| QueryError::InvalidDays(raw.to_string())),
    }
}

/// Option sets offered by the task filter controls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Department heads, never narrowed
    pub managers: Vec<OptionItem>,
    /// Projects of the selected manager, or all
    pub projects: Vec<OptionItem>,
    /// Employees with at least one task passing manager, project and status
    pub assignees: Vec<OptionItem>,
}

/// Current selection of the task list filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TaskFilter {
    /// Manager of the task's project
    pub manager: Choice<EmployeeId>,
    /// Owning project
    pub project: Choice<ProjectId>,
    /// Task status
    pub status: Choice<TaskStatus>,
    /// Responsible employee
    pub assignee: Choice<EmployeeId>,
    /// Keep only tasks due within this many days (overdue included)
    pub max_days: Option<i64>,
}

impl TaskFilter {
    /// Unconstrained filter
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether every field is unconstrained
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }

    /// Reducer: apply one change and reset everything downstream of it
    #[must_use]
    pub fn apply_change(&self, change: FilterChange) -> Self {
        let mut next = self.clone();
        let field = change.field();
        match change {
            FilterChange::Manager(v) => next.manager = v,
            FilterChange::Project(v) => next.project = v,
            FilterChange::Status(v) => next.status = v,
            FilterChange::Assignee(v) => next.assignee = v,
            FilterChange::MaxDays(v) => next.max_days = v,
        }
        for dependent in field.downstream() {
            next.clear(*dependent);
        }
        next
    }

    /// Reset one field to `all` without touching the others
    pub fn clear(&mut self, field: TaskFilterField) {
        match field {
            TaskFilterField::Manager => self.manager = Choice::All,
            TaskFilterField::Project => self.project = Choice::All,
            TaskFilterField::Status => self.status = Choice::All,
            TaskFilterField::Assignee => self.assignee = Choice::All,
            TaskFilterField::MaxDays => self.max_days = None,
        }
    }

    /// Projects run by the selected manager; `None` when unconstrained
    fn managed_projects(&self, snapshot: &Snapshot) -> Option<HashSet<ProjectId>> {
        let manager = self.manager.as_only()?;
        Some(
            snapshot
                .projects_by_manager(manager)
                .map(|p| p.id.clone())
                .collect(),
        )
    }

    /// Manager, project and status predicates
    fn admits_upstream(&self, task: &Task, managed: Option<&HashSet<ProjectId>>) -> bool {
        if let Some(managed) = managed {
            if !task.project_id.as_ref().is_some_and(|p| managed.contains(p)) {
                return false;
            }
        }
        self.project.admits_opt(task.project_id.as_ref()) && self.status.admits(&task.status)
    }

    fn admits_days(&self, task: &Task, today: NaiveDate) -> bool {
        match self.max_days {
            None => true,
            Some(limit) => task
                .due_date
                .is_some_and(|due| days_remaining(due, today) <= limit),
        }
    }

    /// Tasks passing every active predicate, in stored order
    #[must_use]
    pub fn apply<'a>(&self, snapshot: &'a Snapshot, today: NaiveDate) -> Vec<&'a Task> {
        let managed = self.managed_projects(snapshot);
        let tasks: Vec<&Task> = snapshot
            .tasks()
            .iter()
            .filter(|t| self.admits_upstream(t, managed.as_ref()))
            .filter(|t| self.assignee.admits_opt(t.assignee_id.as_ref()))
            .filter(|t| self.admits_days(t, today))
            .collect();
        tracing::debug!(
            total = snapshot.tasks().len(),
            matched = tasks.len(),
            "filtered tasks"
        );
        tasks
    }

    /// Whether a single task passes this filter
    #[must_use]
    pub fn admits(&self, task: &Task, snapshot: &Snapshot, today: NaiveDate) -> bool {
        let managed = self.managed_projects(snapshot);
        self.admits_upstream(task, managed.as_ref())
            && self.assignee.admits_opt(task.assignee_id.as_ref())
            && self.admits_days(task, today)
    }

    /// Option sets for the controls under this selection
    #[must_use]
    pub fn options(&self, snapshot: &Snapshot) -> FilterOptions {
        let managers = snapshot.managers().into_iter().map(OptionItem::from).collect();

        let projects = snapshot
            .projects()
            .iter()
            .filter(|p| self.manager.admits_opt(p.manager_id.as_ref()))
            .map(OptionItem::from)
            .collect();

        let assignees = if snapshot.tasks().is_empty() {
            snapshot.employees().iter().map(OptionItem::from).collect()
        } else {
            let managed = self.managed_projects(snapshot);
            let assigned: IndexSet<&EmployeeId> = snapshot
                .tasks()
                .iter()
                .filter(|t| self.admits_upstream(t, managed.as_ref()))
                .filter_map(|t| t.assignee_id.as_ref())
                .collect();
            snapshot
                .employees()
                .iter()
                .filter(|e| assigned.contains(&e.id))
                .map(OptionItem::from)
                .collect()
        };

        FilterOptions {
            managers,
            projects,
            assignees,
        }
    }

    /// Drop selections that are no longer offered, until stable
    ///
    /// Resetting an upstream field only widens the downstream option sets,
    /// so this settles within one pass per dependency level.
    #[must_use]
    pub fn normalize(&self, snapshot: &Snapshot) -> Self {
        let mut current = self.clone();
        loop {
            let options = current.options(snapshot);
            let mut next = current.clone();
            if let Choice::Only(id) = &current.manager {
                if !offers(&options.managers, id.as_str()) {
                    next.clear(TaskFilterField::Manager);
                }
            }
            if let Choice::Only(id) = &current.project {
                if !offers(&options.projects, id.as_str()) {
                    next.clear(TaskFilterField::Project);
                }
            }
            if let Choice::Only(id) = &current.assignee {
                if !offers(&options.assignees, id.as_str()) {
                    next.clear(TaskFilterField::Assignee);
                }
            }
            if next == current {
                if current != *self {
                    tracing::debug!(before = ?self, after = ?current, "dropped stale selections");
                }
                return current;
            }
            current = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tracker_test_utils::{seed_snapshot, today};

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id.to_string()).collect()
    }

    fn option_ids(options: &[OptionItem]) -> Vec<&str> {
        options.iter().map(|o| o.id.as_str()).collect()
    }

    #[test]
    fn unconstrained_filter_keeps_everything() {
        let snapshot = seed_snapshot();
        let filter = TaskFilter::new();
        assert!(filter.is_unconstrained());
        assert_eq!(filter.apply(&snapshot, today()).len(), 6);
    }

    #[test]
    fn manager_filter_follows_project_ownership() {
        let snapshot = seed_snapshot();
        let filter = TaskFilter::new()
            .apply_change(FilterChange::Manager(Choice::Only(EmployeeId::from("e2"))));

        assert_eq!(ids(&filter.apply(&snapshot, today())), vec!["t5", "t6"]);
    }

    #[test]
    fn predicates_combine() {
        let snapshot = seed_snapshot();
        let filter = TaskFilter {
            project: Choice::Only(ProjectId::from("p1")),
            status: Choice::Only(TaskStatus::Pending),
            assignee: Choice::Only(EmployeeId::from("e3")),
            ..TaskFilter::default()
        };
        assert_eq!(ids(&filter.apply(&snapshot, today())), vec!["t3"]);
    }

    #[test]
    fn days_window_keeps_overdue_and_drops_undated() {
        let snapshot = seed_snapshot();
        let filter = TaskFilter::new().apply_change(FilterChange::MaxDays(Some(5)));

        // t1 and t5 are late, t2 due today, t3 in five days; t6 has no date
        assert_eq!(
            ids(&filter.apply(&snapshot, today())),
            vec!["t1", "t2", "t3", "t5"]
        );
    }

    #[test]
    fn changing_manager_resets_project_and_assignee() {
        let filter = TaskFilter {
            project: Choice::Only(ProjectId::from("p1")),
            assignee: Choice::Only(EmployeeId::from("e3")),
            status: Choice::Only(TaskStatus::Pending),
            max_days: Some(3),
            ..TaskFilter::default()
        };

        let next = filter.apply_change(FilterChange::Manager(Choice::Only(EmployeeId::from("e2"))));

        assert_eq!(next.project, Choice::All);
        assert_eq!(next.assignee, Choice::All);
        assert_eq!(next.status, Choice::Only(TaskStatus::Pending));
        assert_eq!(next.max_days, Some(3));
    }

    #[test]
    fn changing_project_resets_only_assignee() {
        let filter = TaskFilter {
            manager: Choice::Only(EmployeeId::from("e1")),
            assignee: Choice::Only(EmployeeId::from("e3")),
            ..TaskFilter::default()
        };

        let next = filter.apply_change(FilterChange::Project(Choice::Only(ProjectId::from("p2"))));

        assert_eq!(next.manager, Choice::Only(EmployeeId::from("e1")));
        assert_eq!(next.assignee, Choice::All);
    }

    #[test]
    fn project_options_narrow_to_manager() {
        let snapshot = seed_snapshot();
        let filter = TaskFilter::new()
            .apply_change(FilterChange::Manager(Choice::Only(EmployeeId::from("e1"))));

        let options = filter.options(&snapshot);
        assert_eq!(option_ids(&options.projects), vec!["p1", "p2"]);
        assert_eq!(option_ids(&options.managers), vec!["e1", "e2"]);
    }

    #[test]
    fn assignee_options_ignore_own_selection() {
        let snapshot = seed_snapshot();
        let filter = TaskFilter {
            project: Choice::Only(ProjectId::from("p1")),
            assignee: Choice::Only(EmployeeId::from("e3")),
            ..TaskFilter::default()
        };

        let options = filter.options(&snapshot);
        assert_eq!(option_ids(&options.assignees), vec!["e3", "e4"]);
    }

    #[test]
    fn assignee_options_fall_back_to_everyone_without_tasks() {
        let seeded = seed_snapshot();
        let snapshot = seeded.with_tasks(Vec::new());

        let options = TaskFilter::new().options(&snapshot);
        assert_eq!(options.assignees.len(), 6);
    }

    #[test]
    fn normalize_drops_stale_selections() {
        let snapshot = seed_snapshot();
        let filter = TaskFilter {
            manager: Choice::Only(EmployeeId::from("e2")),
            project: Choice::Only(ProjectId::from("p1")),
            assignee: Choice::Only(EmployeeId::from("e3")),
            ..TaskFilter::default()
        };

        let normalized = filter.normalize(&snapshot);
        assert_eq!(normalized.manager, Choice::Only(EmployeeId::from("e2")));
        assert_eq!(normalized.project, Choice::All);
        assert_eq!(normalized.assignee, Choice::All);
    }

    #[test]
    fn normalize_keeps_valid_selection() {
        let snapshot = seed_snapshot();
        let filter = TaskFilter {
            manager: Choice::Only(EmployeeId::from("e1")),
            project: Choice::Only(ProjectId::from("p1")),
            assignee: Choice::Only(EmployeeId::from("e4")),
            ..TaskFilter::default()
        };
        assert_eq!(filter.normalize(&snapshot), filter);
    }

    #[test]
    fn deleted_manager_is_dropped() {
        let seeded = seed_snapshot();
        let employees = seeded
            .employees()
            .iter()
            .filter(|e| e.id.as_str() != "e1")
            .cloned()
            .collect();
        let snapshot = seeded.with_employees(employees);
        let filter = TaskFilter {
            manager: Choice::Only(EmployeeId::from("e1")),
            ..TaskFilter::default()
        };

        assert_eq!(filter.normalize(&snapshot).manager, Choice::All);
    }

    #[test]
    fn parse_change() {
        assert_eq!(
            FilterChange::parse(TaskFilterField::Status, "in-progress").unwrap(),
            FilterChange::Status(Choice::Only(TaskStatus::InProgress))
        );
        assert_eq!(
            FilterChange::parse(TaskFilterField::Manager, "all").unwrap(),
            FilterChange::Manager(Choice::All)
        );
        assert_eq!(
            FilterChange::parse(TaskFilterField::MaxDays, "").unwrap(),
            FilterChange::MaxDays(None)
        );
        assert!(FilterChange::parse(TaskFilterField::MaxDays, "soon").is_err());
    }
}
