//! Query façade over one snapshot
//!
//! [`Board`] is what the presentation layer talks to. It pins a snapshot
//! and a date so that every list, option set and row in one render pass is
//! computed from the same state.

use crate::filter::{FilterOptions, TaskFilter};
use crate::projects::{group_by_manager, ProjectFilter};
use crate::sort::{sort_tasks, SortState};
use crate::view::{task_rows, DashboardView, OrgChart, ProjectSection, TaskRow};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tracker_model::{EmployeeId, Project, Snapshot, Task};

/// Task list page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskListView {
    /// Rows in display order
    pub rows: Vec<TaskRow>,
    /// Options for the filter controls
    pub options: FilterOptions,
    /// Whether the list is empty
    pub is_empty: bool,
}

/// Project list page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectListView {
    /// Sections in manager order
    pub sections: Vec<ProjectSection>,
    /// Whether the list is empty
    pub is_empty: bool,
}

/// Read-only queries over a pinned snapshot
#[derive(Debug, Clone)]
pub struct Board {
    snapshot: Arc<Snapshot>,
    today: NaiveDate,
}

impl Board {
    /// Pin a snapshot and a date
    #[inline]
    #[must_use]
    pub fn new(snapshot: Arc<Snapshot>, today: NaiveDate) -> Self {
        Self { snapshot, today }
    }

    /// Pin a snapshot at the local date
    #[must_use]
    pub fn today(snapshot: Arc<Snapshot>) -> Self {
        Self::new(snapshot, chrono::Local::now().date_naive())
    }

    /// The pinned snapshot
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// The pinned date
    #[inline]
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.today
    }

    /// Filtered tasks, sorted when a sort is active
    #[must_use]
    pub fn filtered_tasks(&self, filter: &TaskFilter, sort: Option<SortState>) -> Vec<&Task> {
        let tasks = filter.apply(&self.snapshot, self.today);
        match sort {
            Some(state) => sort_tasks(&tasks, state, &self.snapshot, self.today),
            None => tasks,
        }
    }

    /// Option sets for the task filter controls
    #[must_use]
    pub fn filter_options(&self, filter: &TaskFilter) -> FilterOptions {
        filter.options(&self.snapshot)
    }

    /// Filtered projects in stored order
    #[must_use]
    pub fn filtered_projects(&self, filter: &ProjectFilter) -> Vec<&Project> {
        filter.apply(&self.snapshot)
    }

    /// Task list page for an already normalised filter
    #[must_use]
    pub fn task_list(&self, filter: &TaskFilter, sort: Option<SortState>) -> TaskListView {
        let tasks = self.filtered_tasks(filter, sort);
        let rows = task_rows(&tasks, &self.snapshot, self.today);
        TaskListView {
            is_empty: rows.is_empty(),
            rows,
            options: self.filter_options(filter),
        }
    }

    /// Project list page, grouped by manager
    #[must_use]
    pub fn project_list(&self, filter: &ProjectFilter, priority: &[EmployeeId]) -> ProjectListView {
        let projects = self.filtered_projects(filter);
        let sections: Vec<ProjectSection> = group_by_manager(&self.snapshot, &projects, priority)
            .iter()
            .map(|group| ProjectSection::build(group, &self.snapshot, self.today))
            .collect();
        ProjectListView {
            is_empty: sections.is_empty(),
            sections,
        }
    }

    /// Dashboard page
    #[must_use]
    pub fn dashboard(&self, window_days: u32, limit: usize) -> DashboardView {
        DashboardView::build(&self.snapshot, self.today, window_days, limit)
    }

    /// Org chart page
    #[must_use]
    pub fn org_chart(&self) -> OrgChart {
        OrgChart::build(&self.snapshot)
    }
}
