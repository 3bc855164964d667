//! Plain-text and JSON rendering of page views

use crate::error::AppError;
use crate::session::{Notice, PageView, SyncStatus};
use serde::Serialize;
use std::fmt::Write;
use tracker_query::view::empty;
use tracker_query::{DashboardView, OrgChart, ProjectListView, TaskListView};

/// Column separator for tables
const SEP: &str = " | ";

/// Task table headings, in column order
const TASK_HEADINGS: [&str; 8] = [
    "משימה",
    "פרויקט",
    "מנהל",
    "אחראי",
    "עדיפות",
    "תאריך יעד",
    "ימים נותרים",
    "סטטוס",
];

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Render a page in the chosen format
///
/// # Errors
/// `AppError::Render` if JSON serialisation fails
pub fn render(view: &PageView, format: Format) -> Result<String, AppError> {
    match format {
        Format::Text => Ok(page_text(view)),
        Format::Json => json(view),
    }
}

/// Pretty JSON for any view
///
/// # Errors
/// `AppError::Render` if serialisation fails
pub fn json<T: Serialize>(value: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Text for a page
#[must_use]
pub fn page_text(view: &PageView) -> String {
    match view {
        PageView::Dashboard(v) => dashboard_text(v),
        PageView::Projects(v) => project_list_text(v),
        PageView::Tasks(v) => task_list_text(v),
        PageView::Org(v) => org_chart_text(v),
    }
}

/// Task table, or the empty-state text
#[must_use]
pub fn task_list_text(view: &TaskListView) -> String {
    if view.is_empty {
        return format!("{}\n", empty::TASKS);
    }
    let mut out = String::new();
    let _ = writeln!(out, "{}", TASK_HEADINGS.join(SEP));
    for row in &view.rows {
        let due = row.due.text();
        let cells = [
            row.name.as_str(),
            row.project.as_str(),
            row.manager.as_str(),
            row.assignee.as_str(),
            row.priority_text.as_str(),
            row.due_date.as_str(),
            due.as_str(),
            row.status_text.as_str(),
        ];
        let _ = writeln!(out, "{}", cells.join(SEP));
    }
    out
}

/// Project cards grouped under manager headings, or the empty-state text
#[must_use]
pub fn project_list_text(view: &ProjectListView) -> String {
    if view.is_empty {
        return format!("{}\n", empty::PROJECTS);
    }
    let mut out = String::new();
    for section in &view.sections {
        let _ = writeln!(out, "== {} ({}) ==", section.title, section.cards.len());
        for card in &section.cards {
            let _ = writeln!(out, "* {} [{}]", card.name, card.status_text);
            let _ = writeln!(out, "  {}", card.description);
            let _ = writeln!(out, "  מנהל: {}", card.manager);
            let _ = writeln!(
                out,
                "  {} - {} ({})",
                card.start_date,
                card.end_date,
                card.due.text()
            );
            let _ = writeln!(
                out,
                "  משימות: {}/{} ({}%), באיחור: {}",
                card.stats.completed, card.stats.task_count, card.stats.percent, card.stats.overdue
            );
        }
    }
    out
}

/// Headline numbers and short lists
#[must_use]
pub fn dashboard_text(view: &DashboardView) -> String {
    let mut out = String::new();
    let stats = &view.stats;
    let _ = writeln!(out, "פרויקטים פעילים: {}", stats.active_projects);
    let _ = writeln!(out, "סה\"כ משימות: {}", stats.total_tasks);
    let _ = writeln!(out, "משימות בביצוע: {}", stats.in_progress_tasks);
    let _ = writeln!(out, "משימות באיחור: {}", stats.overdue_tasks);

    let _ = writeln!(out, "\nמשימות קרובות");
    if view.upcoming.is_empty() {
        let _ = writeln!(out, "  {}", empty::UPCOMING);
    }
    for item in &view.upcoming {
        let _ = writeln!(out, "  {} ({}) {}", item.name, item.project, item.due.text());
    }

    let _ = writeln!(out, "\nפרויקטים פעילים");
    if view.active_projects.is_empty() {
        let _ = writeln!(out, "  {}", empty::ACTIVE_PROJECTS);
    }
    for item in &view.active_projects {
        let _ = writeln!(out, "  {} - {} [{}]", item.name, item.manager, item.status_text);
    }
    out
}

/// Head, then each department with its team
#[must_use]
pub fn org_chart_text(view: &OrgChart) -> String {
    let mut out = String::new();
    if let Some(head) = &view.head {
        let _ = writeln!(out, "{} ({})", head.name, head.role);
    }
    for department in &view.departments {
        let _ = writeln!(
            out,
            "  {}: {} ({})",
            department.department, department.manager.name, department.manager.role
        );
        for member in &department.team {
            let _ = writeln!(out, "    - {} ({})", member.name, member.role);
        }
    }
    out
}

/// Status line; empty while live
#[must_use]
pub fn status_text(status: &SyncStatus) -> String {
    match status {
        SyncStatus::Live => String::new(),
        SyncStatus::Connecting => "מתחבר...".to_string(),
        SyncStatus::Disconnected(text) => text.clone(),
    }
}

/// One line per notice
#[must_use]
pub fn notices_text(notices: &[Notice]) -> String {
    notices
        .iter()
        .map(|n| format!("! {}\n", n.message))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tracker_model::Snapshot;
    use tracker_query::{Board, ProjectFilter, TaskFilter};
    use tracker_test_utils::{seed_snapshot, today};

    fn board() -> Board {
        Board::new(Arc::new(seed_snapshot()), today())
    }

    #[test]
    fn task_table_has_heading_and_rows() {
        let text = task_list_text(&board().task_list(&TaskFilter::new(), None));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with("משימה | פרויקט"));
        assert!(lines.iter().any(|l| l.starts_with("עיצוב | פורטל לקוחות") && l.contains("לא הוקצה")));
    }

    #[test]
    fn empty_views_show_empty_state() {
        let empty_board = Board::new(Arc::new(Snapshot::default()), today());
        let tasks = task_list_text(&empty_board.task_list(&TaskFilter::new(), None));
        assert_eq!(tasks.trim_end(), empty::TASKS);

        let projects = project_list_text(&empty_board.project_list(&ProjectFilter::new(), &[]));
        assert_eq!(projects.trim_end(), empty::PROJECTS);

        let dashboard = dashboard_text(&empty_board.dashboard(14, 5));
        assert!(dashboard.contains(empty::UPCOMING));
        assert!(dashboard.contains(empty::ACTIVE_PROJECTS));
    }

    #[test]
    fn project_sections_render_titles() {
        let text = project_list_text(&board().project_list(&ProjectFilter::new(), &[]));
        assert!(text.contains("== דוד לוי (2) =="));
        assert!(text.contains("== מיכל אברהם (1) =="));
    }

    #[test]
    fn org_chart_nests_team() {
        let text = org_chart_text(&board().org_chart());
        assert!(text.starts_with("רונית כהן"));
        assert!(text.contains("    - יוסי מזרחי"));
    }

    #[test]
    fn json_is_tagged_by_page() {
        let view = PageView::Org(board().org_chart());
        let out = render(&view, Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["page"], "org");
        assert_eq!(value["view"]["departments"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn status_and_notices() {
        assert_eq!(status_text(&SyncStatus::Live), "");
        assert_eq!(
            status_text(&SyncStatus::Disconnected("🔴 שגיאה בחיבור".into())),
            "🔴 שגיאה בחיבור"
        );
        let notices = vec![Notice {
            message: "שגיאה בשמירה. נסה שוב.".into(),
        }];
        assert_eq!(notices_text(&notices), "! שגיאה בשמירה. נסה שוב.\n");
    }
}
