//! Render-ready views
//!
//! Plain serialisable structs with every reference already resolved to a
//! display name. Missing links degrade to fixed fallback texts.

use crate::derive::{
    display_date, priority_text, project_status_text, task_status_text, upcoming_tasks,
    DashboardStats, DueInfo, ProjectStats,
};
use crate::projects::ProjectGroup;
use chrono::NaiveDate;
use serde::Serialize;
use tracker_model::{Employee, Priority, Project, Snapshot, Task, TaskStatus};

/// Fallback for a task without a (known) project
pub const NO_PROJECT: &str = "ללא פרויקט";
/// Fallback for a project without a (known) manager
pub const NO_MANAGER: &str = "ללא מנהל";
/// Fallback for an unassigned task
pub const UNASSIGNED: &str = "לא הוקצה";
/// Fallback for a project without a description
pub const NO_DESCRIPTION: &str = "ללא תיאור";

/// Empty-state texts
pub mod empty {
    /// Task list with no rows
    pub const TASKS: &str = "אין משימות להצגה. לחץ על \"משימה חדשה\" להוספת משימה.";
    /// Project list with no cards
    pub const PROJECTS: &str = "אין פרויקטים להצגה. לחץ על \"פרויקט חדש\" להוספת פרויקט.";
    /// Dashboard without upcoming tasks
    pub const UPCOMING: &str = "אין משימות קרובות";
    /// Dashboard without active projects
    pub const ACTIVE_PROJECTS: &str = "אין פרויקטים פעילים";
}

fn name_or(employee: Option<&Employee>, fallback: &str) -> String {
    employee.map_or_else(|| fallback.to_string(), |e| e.name.clone())
}

fn project_name(snapshot: &Snapshot, task: &Task) -> String {
    snapshot
        .project_opt(task.project_id.as_ref())
        .map_or_else(|| NO_PROJECT.to_string(), |p| p.name.clone())
}

/// One row of the task table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    /// Task id
    pub id: String,
    /// Task name
    pub name: String,
    /// Project name or fallback
    pub project: String,
    /// Project manager's name or fallback
    pub manager: String,
    /// Assignee's name or fallback
    pub assignee: String,
    /// Raw priority
    pub priority: Priority,
    /// Priority display text
    pub priority_text: String,
    /// Due date as `DD/MM/YYYY`
    pub due_date: String,
    /// Due-date label and urgency
    pub due: DueInfo,
    /// Raw status
    pub status: TaskStatus,
    /// Status display text
    pub status_text: String,
}

impl TaskRow {
    /// Resolve one task
    #[must_use]
    pub fn build(task: &Task, snapshot: &Snapshot, today: NaiveDate) -> Self {
        Self {
            id: task.id.to_string(),
            name: task.name.clone(),
            project: project_name(snapshot, task),
            manager: name_or(snapshot.manager_of_task(task), NO_MANAGER),
            assignee: name_or(snapshot.employee_opt(task.assignee_id.as_ref()), UNASSIGNED),
            priority: task.priority.clone(),
            priority_text: priority_text(&task.priority).to_string(),
            due_date: display_date(task.due_date),
            due: DueInfo::of_task(task, today),
            status: task.status.clone(),
            status_text: task_status_text(&task.status).to_string(),
        }
    }
}

/// Resolve a task sequence, keeping its order
#[must_use]
pub fn task_rows(tasks: &[&Task], snapshot: &Snapshot, today: NaiveDate) -> Vec<TaskRow> {
    tasks
        .iter()
        .map(|t| TaskRow::build(t, snapshot, today))
        .collect()
}

/// One project card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectCard {
    /// Project id
    pub id: String,
    /// Project name
    pub name: String,
    /// Manager's name or fallback
    pub manager: String,
    /// Description or fallback
    pub description: String,
    /// Status display text
    pub status_text: String,
    /// Start date as `DD/MM/YYYY`
    pub start_date: String,
    /// End date as `DD/MM/YYYY`
    pub end_date: String,
    /// Time left until the end date
    pub due: DueInfo,
    /// Task counters
    pub stats: ProjectStats,
}

impl ProjectCard {
    /// Resolve one project
    #[must_use]
    pub fn build(project: &Project, snapshot: &Snapshot, today: NaiveDate) -> Self {
        Self {
            id: project.id.to_string(),
            name: project.name.clone(),
            manager: name_or(snapshot.employee_opt(project.manager_id.as_ref()), NO_MANAGER),
            description: project
                .description
                .clone()
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            status_text: project_status_text(&project.status).to_string(),
            start_date: display_date(project.start_date),
            end_date: display_date(project.end_date),
            due: DueInfo::of(project.end_date, today),
            stats: ProjectStats::compute(snapshot, &project.id, today),
        }
    }
}

/// A manager heading with its project cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSection {
    /// Manager's name, or the fallback for the unassigned group
    pub title: String,
    /// Cards in stored order
    pub cards: Vec<ProjectCard>,
}

impl ProjectSection {
    /// Resolve one group
    #[must_use]
    pub fn build(group: &ProjectGroup<'_>, snapshot: &Snapshot, today: NaiveDate) -> Self {
        Self {
            title: name_or(group.manager, NO_MANAGER),
            cards: group
                .projects
                .iter()
                .map(|p| ProjectCard::build(p, snapshot, today))
                .collect(),
        }
    }
}

/// Dashboard entry for an upcoming task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingItem {
    /// Task name
    pub name: String,
    /// Project name or fallback
    pub project: String,
    /// Due-date label and urgency
    pub due: DueInfo,
}

/// Dashboard entry for an active project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveProjectItem {
    /// Project name
    pub name: String,
    /// Manager's name or fallback
    pub manager: String,
    /// Status display text
    pub status_text: String,
}

/// Dashboard page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    /// Headline counters
    pub stats: DashboardStats,
    /// Soonest open tasks, capped
    pub upcoming: Vec<UpcomingItem>,
    /// Active projects in stored order, capped
    pub active_projects: Vec<ActiveProjectItem>,
}

impl DashboardView {
    /// Assemble the dashboard
    #[must_use]
    pub fn build(snapshot: &Snapshot, today: NaiveDate, window_days: u32, limit: usize) -> Self {
        let upcoming = upcoming_tasks(snapshot, today, window_days)
            .into_iter()
            .take(limit)
            .map(|t| UpcomingItem {
                name: t.name.clone(),
                project: project_name(snapshot, t),
                due: DueInfo::of(t.due_date, today),
            })
            .collect();
        let active_projects = snapshot
            .active_projects()
            .take(limit)
            .map(|p| ActiveProjectItem {
                name: p.name.clone(),
                manager: name_or(snapshot.employee_opt(p.manager_id.as_ref()), NO_MANAGER),
                status_text: project_status_text(&p.status).to_string(),
            })
            .collect();

        Self {
            stats: DashboardStats::compute(snapshot, today),
            upcoming,
            active_projects,
        }
    }
}

/// An employee in the org chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrgMember {
    /// Employee id
    pub id: String,
    /// Name
    pub name: String,
    /// Job title
    pub role: String,
}

impl From<&Employee> for OrgMember {
    fn from(e: &Employee) -> Self {
        Self {
            id: e.id.to_string(),
            name: e.name.clone(),
            role: e.role.clone(),
        }
    }
}

/// A department head and their direct reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrgDepartment {
    /// Department name
    pub department: String,
    /// Department head
    pub manager: OrgMember,
    /// Direct reports
    pub team: Vec<OrgMember>,
}

/// Organisation chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrgChart {
    /// Division head, if one exists
    pub head: Option<OrgMember>,
    /// One entry per department head
    pub departments: Vec<OrgDepartment>,
}

impl OrgChart {
    /// Assemble the chart
    #[must_use]
    pub fn build(snapshot: &Snapshot) -> Self {
        Self {
            head: snapshot.division_head().map(OrgMember::from),
            departments: snapshot
                .managers()
                .into_iter()
                .map(|manager| OrgDepartment {
                    department: manager.department.clone(),
                    manager: OrgMember::from(manager),
                    team: snapshot
                        .team_of(&manager.id)
                        .into_iter()
                        .map(OrgMember::from)
                        .collect(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::{DueLabel, Urgency};
    use pretty_assertions::assert_eq;
    use tracker_model::{ProjectId, TaskId};
    use tracker_test_utils::{seed_snapshot, task, today};

    #[test]
    fn task_row_resolves_names() {
        let snapshot = seed_snapshot();
        let t1 = snapshot.task(&TaskId::from("t1")).unwrap();

        let row = TaskRow::build(t1, &snapshot, today());
        assert_eq!(row.project, "מערכת הזמנות");
        assert_eq!(row.manager, "דוד לוי");
        assert_eq!(row.assignee, "יוסי מזרחי");
        assert_eq!(row.priority_text, "גבוהה");
        assert_eq!(row.status_text, "בביצוע");
        assert_eq!(row.due_date, "30/05/2024");
        assert_eq!(row.due.label, DueLabel::Overdue(2));
    }

    #[test]
    fn task_row_fallbacks() {
        let snapshot = seed_snapshot();
        let orphan = task("tx", "יתומה", Some("deleted"));

        let row = TaskRow::build(&orphan, &snapshot, today());
        assert_eq!(row.project, NO_PROJECT);
        assert_eq!(row.manager, NO_MANAGER);
        assert_eq!(row.assignee, UNASSIGNED);
        assert_eq!(row.due.label, DueLabel::Unset);
    }

    #[test]
    fn completed_row_shows_done() {
        let snapshot = seed_snapshot();
        let t5 = snapshot.task(&TaskId::from("t5")).unwrap();
        let row = TaskRow::build(t5, &snapshot, today());
        assert_eq!(row.due.label, DueLabel::Completed);
        assert_eq!(row.due.urgency, Urgency::Normal);
    }

    #[test]
    fn project_card_fallbacks_and_counts() {
        let snapshot = seed_snapshot();
        let p2 = snapshot.project(&ProjectId::from("p2")).unwrap();

        let card = ProjectCard::build(p2, &snapshot, today());
        assert_eq!(card.description, NO_DESCRIPTION);
        assert_eq!(card.manager, "דוד לוי");
        assert_eq!(card.status_text, "מושהה");
        assert_eq!(card.stats.task_count, 1);
        assert_eq!(card.due.label, DueLabel::InDays(4));
        assert_eq!(card.due.urgency, Urgency::Warning);
    }

    #[test]
    fn dashboard_caps_lists() {
        let snapshot = seed_snapshot();
        let view = DashboardView::build(&snapshot, today(), 30, 1);

        assert_eq!(view.upcoming.len(), 1);
        assert_eq!(view.upcoming[0].name, "פיתוח API");
        assert_eq!(view.active_projects.len(), 1);
        assert_eq!(view.stats.total_tasks, 6);
    }

    #[test]
    fn org_chart_lists_departments() {
        let chart = OrgChart::build(&seed_snapshot());

        assert_eq!(chart.head.as_ref().map(|h| h.id.as_str()), Some("e0"));
        assert_eq!(chart.departments.len(), 2);
        let dev = &chart.departments[0];
        assert_eq!(dev.department, "פיתוח");
        let team: Vec<&str> = dev.team.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(team, vec!["e3", "e4"]);
    }
}
