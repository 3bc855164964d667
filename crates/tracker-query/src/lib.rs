//! Tracker Query - filter, sort and view engine
//!
//! Pure computations over a [`Snapshot`](tracker_model::Snapshot):
//! - [`filter`]: cascading task filters with dependent option narrowing
//! - [`projects`]: project filters and manager grouping
//! - [`sort`]: per-column comparators with direction toggling
//! - [`derive`]: due-date urgency, display texts, statistics
//! - [`view`]: render-ready rows, cards, dashboard and org chart
//! - [`Board`]: one façade over a pinned snapshot and date
//!
//! # Example
//!
//! ```rust,ignore
//! use tracker_query::{Board, FilterChange, SortColumn, SortState, TaskFilter};
//! use tracker_model::Choice;
//!
//! let board = Board::today(store.snapshot());
//! let filter = TaskFilter::new()
//!     .apply_change(FilterChange::Manager(Choice::Only("e1".into())))
//!     .normalize(board.snapshot());
//! let view = board.task_list(&filter, Some(SortState::new(SortColumn::DueDate)));
//! ```

#![warn(unreachable_pub)]

pub mod board;
pub mod collate;
pub mod derive;
pub mod error;
pub mod filter;
pub mod projects;
pub mod sort;
pub mod view;

pub use board::{Board, ProjectListView, TaskListView};
pub use derive::{DashboardStats, DueInfo, DueLabel, ProjectStats, Urgency};
pub use error::QueryError;
pub use filter::{FilterChange, FilterOptions, OptionItem, TaskFilter, TaskFilterField};
pub use projects::{group_by_manager, ProjectFilter, ProjectFilterChange, ProjectGroup};
pub use sort::{sort_tasks, SortColumn, SortDirection, SortKey, SortState};
pub use view::{DashboardView, OrgChart, ProjectCard, ProjectSection, TaskRow};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building views
    pub use crate::{
        Board, FilterChange, ProjectFilter, ProjectFilterChange, SortColumn, SortDirection,
        SortState, TaskFilter, TaskFilterField,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
