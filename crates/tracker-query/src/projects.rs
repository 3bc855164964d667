//! Project list filters and manager grouping

use crate::collate::CollationKey;
use crate::filter::OptionItem;
use indexmap::IndexMap;
use tracker_model::{Choice, Employee, EmployeeId, Project, ProjectStatus, Snapshot};

/// A single user edit to the project filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectFilterChange {
    /// Select a status
    Status(Choice<ProjectStatus>),
    /// Select a manager
    Manager(Choice<EmployeeId>),
}

/// Current selection of the project list filters. The two fields are
/// independent: changing one never resets the other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProjectFilter {
    /// Project status
    pub status: Choice<ProjectStatus>,
    /// Responsible manager
    pub manager: Choice<EmployeeId>,
}

impl ProjectFilter {
    /// Unconstrained filter
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reducer: apply one change
    #[must_use]
    pub fn apply_change(&self, change: ProjectFilterChange) -> Self {
        let mut next = self.clone();
        match change {
            ProjectFilterChange::Status(v) => next.status = v,
            ProjectFilterChange::Manager(v) => next.manager = v,
        }
        next
    }

    /// Projects passing both predicates, in stored order
    #[must_use]
    pub fn apply<'a>(&self, snapshot: &'a Snapshot) -> Vec<&'a Project> {
        snapshot
            .projects()
            .iter()
            .filter(|p| {
                self.status.admits(&p.status) && self.manager.admits_opt(p.manager_id.as_ref())
            })
            .collect()
    }

    /// Manager control options: department heads
    #[must_use]
    pub fn manager_options(snapshot: &Snapshot) -> Vec<OptionItem> {
        snapshot.managers().into_iter().map(OptionItem::from).collect()
    }

    /// Drop a manager selection that is no longer offered
    #[must_use]
    pub fn normalize(&self, snapshot: &Snapshot) -> Self {
        let mut next = self.clone();
        if let Choice::Only(id) = &self.manager {
            if !snapshot.managers().iter().any(|m| &m.id == id) {
                tracing::debug!(manager = %id, "dropped stale manager selection");
                next.manager = Choice::All;
            }
        }
        next
    }
}

/// Projects sharing one manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectGroup<'a> {
    /// The manager; `None` for the unassigned group
    pub manager: Option<&'a Employee>,
    /// Projects in stored order
    pub projects: Vec<&'a Project>,
}

/// Group projects by manager
///
/// Groups appear in this order: managers listed in `priority` (in that
/// order), then the remaining managers by collated name, then one group of
/// projects without a known manager. Empty groups are omitted.
#[must_use]
pub fn group_by_manager<'a>(
    snapshot: &'a Snapshot,
    projects: &[&'a Project],
    priority: &[EmployeeId],
) -> Vec<ProjectGroup<'a>> {
    let mut by_manager: IndexMap<&EmployeeId, (&Employee, Vec<&Project>)> = IndexMap::new();
    let mut unassigned = Vec::new();

    for project in projects {
        match snapshot.employee_opt(project.manager_id.as_ref()) {
            Some(manager) => by_manager
                .entry(&manager.id)
                .or_insert_with(|| (manager, Vec::new()))
                .1
                .push(*project),
            None => unassigned.push(*project),
        }
    }

    let mut groups = Vec::with_capacity(by_manager.len() + 1);
    for id in priority {
        if let Some((manager, projects)) = by_manager.shift_remove(id) {
            groups.push(ProjectGroup {
                manager: Some(manager),
                projects,
            });
        }
    }

    let mut rest: Vec<_> = by_manager.into_values().collect();
    rest.sort_by_cached_key(|(manager, _)| (CollationKey::new(&manager.name), manager.id.clone()));
    groups.extend(rest.into_iter().map(|(manager, projects)| ProjectGroup {
        manager: Some(manager),
        projects,
    }));

    if !unassigned.is_empty() {
        groups.push(ProjectGroup {
            manager: None,
            projects: unassigned,
        });
    }
    groups
}
