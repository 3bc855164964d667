//! Derivation helpers
//!
//! Pure functions over records: due-date urgency, display texts for
//! enumerated fields, and project/task statistics. `today` is always passed
//! in so results are reproducible.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracker_model::{Priority, ProjectId, ProjectStatus, Snapshot, Task, TaskStatus};

/// Sort position of a task without a due date on the days-remaining column
pub const NO_DUE_DATE_DAYS: i64 = 9999;

/// Signed whole days from `today` until `date`; negative when past
#[inline]
#[must_use]
pub fn days_remaining(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}

/// Urgency bucket of a due date
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Past due
    Overdue,
    /// Due within three days, today included
    Urgent,
    /// Due in four to seven days
    Warning,
    /// Later, unset, or already completed
    Normal,
}

impl Urgency {
    /// Bucket for a signed day count
    #[must_use]
    pub fn from_days(days: i64) -> Self {
        match days {
            d if d < 0 => Self::Overdue,
            0..=3 => Self::Urgent,
            4..=7 => Self::Warning,
            _ => Self::Normal,
        }
    }

    /// Style class name
    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::Urgent => "urgent",
            Self::Warning => "warning",
            Self::Normal => "normal",
        }
    }
}

/// What the due-date cell says
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "days", rename_all = "camelCase")]
pub enum DueLabel {
    /// No date set
    Unset,
    /// Late by this many days
    Overdue(i64),
    /// Due today
    Today,
    /// Due tomorrow
    Tomorrow,
    /// Due in this many days (two or more)
    InDays(i64),
    /// Task is done; the date no longer matters
    Completed,
}

impl std::fmt::Display for DueLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Unset => f.write_str("לא נקבע"),
            Self::Overdue(n) => {
                let unit = if n == 1 { "יום" } else { "ימים" };
                write!(f, "⚠️ איחור של {n} {unit}")
            }
            Self::Today => f.write_str("⏰ היום!"),
            Self::Tomorrow => f.write_str("⏰ מחר"),
            Self::InDays(n) => {
                let icon = match Urgency::from_days(n) {
                    Urgency::Urgent => "⏰",
                    Urgency::Warning => "⚡",
                    Urgency::Overdue | Urgency::Normal => "✓",
                };
                write!(f, "{icon} עוד {n} ימים")
            }
            Self::Completed => f.write_str("הושלם ✓"),
        }
    }
}

/// Label plus urgency for a due date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DueInfo {
    /// Label variant
    pub label: DueLabel,
    /// Urgency bucket
    pub urgency: Urgency,
}

impl DueInfo {
    /// Bucket an optional date relative to `today`
    #[must_use]
    pub fn of(date: Option<NaiveDate>, today: NaiveDate) -> Self {
        let Some(date) = date else {
            return Self {
                label: DueLabel::Unset,
                urgency: Urgency::Normal,
            };
        };
        let days = days_remaining(date, today);
        let label = match days {
            d if d < 0 => DueLabel::Overdue(-d),
            0 => DueLabel::Today,
            1 => DueLabel::Tomorrow,
            d => DueLabel::InDays(d),
        };
        Self {
            label,
            urgency: Urgency::from_days(days),
        }
    }

    /// Due info for a task row: completed tasks show as done
    #[must_use]
    pub fn of_task(task: &Task, today: NaiveDate) -> Self {
        if task.is_completed() {
            return Self {
                label: DueLabel::Completed,
                urgency: Urgency::Normal,
            };
        }
        Self::of(task.due_date, today)
    }

    /// Display text
    #[must_use]
    pub fn text(&self) -> String {
        self.label.to_string()
    }
}

// Display texts

/// Display text for a project status; unknown values render verbatim
#[must_use]
pub fn project_status_text(status: &ProjectStatus) -> &str {
    match status {
        ProjectStatus::Active => "פעיל",
        ProjectStatus::Completed => "הושלם",
        ProjectStatus::Paused => "מושהה",
        ProjectStatus::Other(raw) => raw.as_str(),
    }
}

/// Display text for a task status; unknown values render verbatim
#[must_use]
pub fn task_status_text(status: &TaskStatus) -> &str {
    match status {
        TaskStatus::Pending => "ממתין",
        TaskStatus::InProgress => "בביצוע",
        TaskStatus::Completed => "הושלם",
        TaskStatus::Other(raw) => raw.as_str(),
    }
}

/// Display text for a priority; unknown values render verbatim
#[must_use]
pub fn priority_text(priority: &Priority) -> &str {
    match priority {
        Priority::High => "גבוהה",
        Priority::Medium => "בינונית",
        Priority::Low => "נמוכה",
        Priority::Other(raw) => raw.as_str(),
    }
}

/// `DD/MM/YYYY`, empty when unset
#[must_use]
pub fn display_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_default()
}

// Statistics

/// Past due and still open. Tasks without a due date are never overdue.
#[must_use]
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    !task.is_completed() && task.due_date.is_some_and(|due| due < today)
}

/// Headline counters for the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Projects with status `active`
    pub active_projects: usize,
    /// All tasks
    pub total_tasks: usize,
    /// Tasks with status `in-progress`
    pub in_progress_tasks: usize,
    /// Open tasks past their due date
    pub overdue_tasks: usize,
}

impl DashboardStats {
    /// Compute from a snapshot
    #[must_use]
    pub fn compute(snapshot: &Snapshot, today: NaiveDate) -> Self {
        Self {
            active_projects: snapshot.active_projects().count(),
            total_tasks: snapshot.tasks().len(),
            in_progress_tasks: snapshot.in_progress_tasks().count(),
            overdue_tasks: snapshot
                .tasks()
                .iter()
                .filter(|t| is_overdue(t, today))
                .count(),
        }
    }
}

/// Open tasks due within `[today, today + window_days]`, earliest first.
/// Tasks due the same day keep their stored order.
#[must_use]
pub fn upcoming_tasks(snapshot: &Snapshot, today: NaiveDate, window_days: u32) -> Vec<&Task> {
    let horizon = today + Duration::days(i64::from(window_days));
    let mut upcoming: Vec<&Task> = snapshot
        .tasks()
        .iter()
        .filter(|t| !t.is_completed())
        .filter(|t| t.due_date.is_some_and(|due| due >= today && due <= horizon))
        .collect();
    upcoming.sort_by_key(|t| t.due_date);
    upcoming
}

/// Progress counters for one project
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProjectStats {
    /// Linked tasks
    pub task_count: usize,
    /// Linked tasks that are done
    pub completed: usize,
    /// Rounded completion percentage; 0 without tasks
    pub percent: u8,
    /// Linked open tasks past due
    pub overdue: usize,
}

impl ProjectStats {
    /// Compute for one project
    #[must_use]
    pub fn compute(snapshot: &Snapshot, project: &ProjectId, today: NaiveDate) -> Self {
        let mut stats = Self::default();
        for task in snapshot
            .tasks()
            .iter()
            .filter(|t| t.project_id.as_ref() == Some(project))
        {
            stats.task_count += 1;
            if task.is_completed() {
                stats.completed += 1;
            }
            if is_overdue(task, today) {
                stats.overdue += 1;
            }
        }
        if stats.task_count > 0 {
            let percent = (stats.completed * 100 + stats.task_count / 2) / stats.task_count;
            stats.percent = u8::try_from(percent).unwrap_or(100);
        }
        stats
    }
}
