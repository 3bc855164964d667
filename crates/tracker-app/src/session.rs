//! Interactive session state
//!
//! A [`Session`] is what a front end holds on to: the entity store, the
//! current filter and sort selections, the page being shown, pending
//! notices and the sync status. Selections are plain values; every change
//! goes through the query crate's reducers and is normalised against the
//! current snapshot before it is stored.
//!
//! Write failures surface as one-shot [`Notice`]s. A failed attach leaves
//! the session running over an empty snapshot with a persistent
//! [`SyncStatus::Disconnected`].

use crate::config::{AppConfig, ViewConfig};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracker_model::{
    EmployeeDraft, EmployeeId, ProjectDraft, ProjectId, Snapshot, TaskDraft, TaskId,
};
use tracker_query::{
    Board, DashboardView, FilterChange, OrgChart, ProjectFilter, ProjectFilterChange,
    ProjectListView, SortColumn, SortState, TaskFilter, TaskListView,
};
use tracker_store::{ChangeBurst, Debouncer, DocumentStore, EntityStore, StoreError};

/// Connection state shown in the header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SyncStatus {
    /// Attaching or waiting for first snapshots
    Connecting,
    /// Mirroring the store
    Live,
    /// Attach failed; holds the status text
    Disconnected(String),
}

impl SyncStatus {
    /// Whether the store is mirrored
    #[inline]
    #[must_use]
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }
}

/// A one-shot message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Text to show
    pub message: String,
}

impl From<&StoreError> for Notice {
    fn from(e: &StoreError) -> Self {
        Self {
            message: e.user_message().to_string(),
        }
    }
}

/// Pages of the tracker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    /// Headline numbers and short lists
    #[default]
    Dashboard,
    /// Project cards grouped by manager
    Projects,
    /// Filterable task table
    Tasks,
    /// Organisation chart
    Org,
}

/// A rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", content = "view", rename_all = "lowercase")]
pub enum PageView {
    /// Dashboard
    Dashboard(DashboardView),
    /// Project list
    Projects(ProjectListView),
    /// Task list
    Tasks(TaskListView),
    /// Org chart
    Org(OrgChart),
}

/// Presentation state over an entity store
#[derive(Debug)]
pub struct Session<S: DocumentStore> {
    store: Option<EntityStore<S>>,
    views: ViewConfig,
    debounce: Duration,
    page: Page,
    task_filter: TaskFilter,
    project_filter: ProjectFilter,
    sort: Option<SortState>,
    notices: VecDeque<Notice>,
    status: SyncStatus,
    today: Option<NaiveDate>,
}

impl<S: DocumentStore> Session<S> {
    /// Attach to `backend` and wait for the first snapshots
    ///
    /// Never fails: an attach error is logged and recorded as
    /// [`SyncStatus::Disconnected`], and the session renders empty views.
    pub async fn connect(backend: Arc<S>, config: &AppConfig) -> Self {
        let mut session = Self::detached(config);
        match EntityStore::attach(backend).await {
            Ok(store) => {
                if !store.ready(config.store.startup_delay()).await {
                    tracing::warn!("rendering before every collection arrived");
                }
                session.store = Some(store);
                session.status = SyncStatus::Live;
                session.refresh();
            }
            Err(e) => {
                tracing::error!("store unavailable: {e}");
                session.status = SyncStatus::Disconnected(e.user_message().to_string());
            }
        }
        session
    }

    fn detached(config: &AppConfig) -> Self {
        Self {
            store: None,
            views: config.views.clone(),
            debounce: config.store.debounce(),
            page: Page::default(),
            task_filter: TaskFilter::new(),
            project_filter: ProjectFilter::new(),
            sort: None,
            notices: VecDeque::new(),
            status: SyncStatus::Connecting,
            today: None,
        }
    }

    /// Pin the date used for every derived value
    #[inline]
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Sync status
    #[inline]
    #[must_use]
    pub fn status(&self) -> &SyncStatus {
        &self.status
    }

    /// The entity store, when attached
    #[inline]
    #[must_use]
    pub fn store(&self) -> Option<&EntityStore<S>> {
        self.store.as_ref()
    }

    /// Current snapshot; empty when detached
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store
            .as_ref()
            .map_or_else(|| Arc::new(Snapshot::default()), EntityStore::snapshot)
    }

    fn board(&self) -> Board {
        let snapshot = self.snapshot();
        match self.today {
            Some(today) => Board::new(snapshot, today),
            None => Board::today(snapshot),
        }
    }

    // Selections

    /// Current task filter
    #[inline]
    #[must_use]
    pub fn task_filter(&self) -> &TaskFilter {
        &self.task_filter
    }

    /// Current project filter
    #[inline]
    #[must_use]
    pub fn project_filter(&self) -> &ProjectFilter {
        &self.project_filter
    }

    /// Current sort
    #[inline]
    #[must_use]
    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    /// Current page
    #[inline]
    #[must_use]
    pub fn page(&self) -> Page {
        self.page
    }

    /// Switch page
    pub fn show(&mut self, page: Page) {
        self.page = page;
    }

    /// Apply one task filter edit, resetting downstream fields
    pub fn change_task_filter(&mut self, change: FilterChange) {
        let snapshot = self.snapshot();
        self.task_filter = self.task_filter.apply_change(change).normalize(&snapshot);
    }

    /// Clear every task filter
    pub fn reset_task_filters(&mut self) {
        self.task_filter = TaskFilter::new();
    }

    /// Apply one project filter edit
    pub fn change_project_filter(&mut self, change: ProjectFilterChange) {
        let snapshot = self.snapshot();
        self.project_filter = self.project_filter.apply_change(change).normalize(&snapshot);
    }

    /// Column header click
    pub fn click_sort_header(&mut self, column: SortColumn) {
        self.sort = Some(SortState::toggle(self.sort, column));
    }

    /// Set the sort outright
    pub fn set_sort(&mut self, sort: Option<SortState>) {
        self.sort = sort;
    }

    /// Re-normalise stored selections against the current snapshot
    pub fn refresh(&mut self) {
        let snapshot = self.snapshot();
        self.task_filter = self.task_filter.normalize(&snapshot);
        self.project_filter = self.project_filter.normalize(&snapshot);
        tracing::debug!(revision = snapshot.revision(), page = ?self.page, "refreshed selections");
    }

    // Views

    /// Task list for the current selections
    #[must_use]
    pub fn task_list(&self) -> TaskListView {
        let board = self.board();
        let filter = self.task_filter.normalize(board.snapshot());
        board.task_list(&filter, self.sort)
    }

    /// Project list for the current selections
    #[must_use]
    pub fn project_list(&self) -> ProjectListView {
        let board = self.board();
        let filter = self.project_filter.normalize(board.snapshot());
        board.project_list(&filter, &self.views.manager_priority)
    }

    /// Dashboard
    #[must_use]
    pub fn dashboard(&self) -> DashboardView {
        self.board()
            .dashboard(self.views.upcoming_window_days, self.views.dashboard_limit)
    }

    /// Org chart
    #[must_use]
    pub fn org_chart(&self) -> OrgChart {
        self.board().org_chart()
    }

    /// The current page, rendered
    #[must_use]
    pub fn current_view(&self) -> PageView {
        match self.page {
            Page::Dashboard => PageView::Dashboard(self.dashboard()),
            Page::Projects => PageView::Projects(self.project_list()),
            Page::Tasks => PageView::Tasks(self.task_list()),
            Page::Org => PageView::Org(self.org_chart()),
        }
    }

    // Notices

    /// Drain pending notices
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    fn store_or_notice(&mut self) -> Option<&EntityStore<S>> {
        if self.store.is_none() {
            let err = StoreError::Closed;
            self.notices.push_back(Notice::from(&err));
        }
        self.store.as_ref()
    }

    fn settle<T>(&mut self, result: Result<T, StoreError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                if e.is_partial() {
                    tracing::warn!("store may be inconsistent: {e}");
                }
                self.notices.push_back(Notice::from(&e));
                None
            }
        }
    }

    // Mutations

    /// Create or update an employee. Returns the id on success.
    pub async fn save_employee(
        &mut self,
        id: Option<&EmployeeId>,
        draft: &EmployeeDraft,
    ) -> Option<EmployeeId> {
        let store = self.store_or_notice()?;
        let result = match id {
            Some(id) => store.update_employee(id, draft).await.map(|()| id.clone()),
            None => store.add_employee(draft).await,
        };
        self.settle(result)
    }

    /// Delete an employee, orphaning their references
    pub async fn delete_employee(&mut self, id: &EmployeeId) -> bool {
        let Some(store) = self.store_or_notice() else {
            return false;
        };
        let result = store.delete_employee(id).await;
        self.settle(result).is_some()
    }

    /// Create or update a project. Returns the id on success.
    pub async fn save_project(
        &mut self,
        id: Option<&ProjectId>,
        draft: &ProjectDraft,
    ) -> Option<ProjectId> {
        let store = self.store_or_notice()?;
        let result = match id {
            Some(id) => store.update_project(id, draft).await.map(|()| id.clone()),
            None => store.add_project(draft).await,
        };
        self.settle(result)
    }

    /// Delete a project and its tasks
    pub async fn delete_project(&mut self, id: &ProjectId) -> bool {
        let Some(store) = self.store_or_notice() else {
            return false;
        };
        let result = store.delete_project(id).await;
        self.settle(result).is_some()
    }

    /// Create or update a task. Returns the id on success.
    pub async fn save_task(&mut self, id: Option<&TaskId>, draft: &TaskDraft) -> Option<TaskId> {
        let store = self.store_or_notice()?;
        let result = match id {
            Some(id) => store.update_task(id, draft).await.map(|()| id.clone()),
            None => store.add_task(draft).await,
        };
        self.settle(result)
    }

    /// Delete a task
    pub async fn delete_task(&mut self, id: &TaskId) -> bool {
        let Some(store) = self.store_or_notice() else {
            return false;
        };
        let result = store.delete_task(id).await;
        self.settle(result).is_some()
    }

    // Refresh loop

    /// Debounced change feed; `None` when detached
    #[must_use]
    pub fn debouncer(&self) -> Option<Debouncer> {
        self.store
            .as_ref()
            .map(|store| Debouncer::new(store.changes(), self.debounce))
    }

    /// Refresh after every settled burst of changes until `shutdown`
    /// resolves or the feed closes. `on_refresh` sees the refreshed session.
    ///
    /// Returns the number of refreshes performed.
    pub async fn run_refresh_loop<F, Fut>(&mut self, mut on_refresh: F, shutdown: Fut) -> usize
    where
        F: FnMut(&Self, &ChangeBurst),
        Fut: Future<Output = ()>,
    {
        let Some(mut debouncer) = self.debouncer() else {
            tracing::warn!(status = ?self.status, "no store attached, refresh loop not started");
            return 0;
        };
        tokio::pin!(shutdown);

        let mut refreshes = 0;
        loop {
            tokio::select! {
                () = &mut shutdown => break,
                burst = debouncer.next_burst() => {
                    let Some(burst) = burst else {
                        tracing::info!("change feed closed");
                        break;
                    };
                    self.refresh();
                    refreshes += 1;
                    on_refresh(&*self, &burst);
                }
            }
        }
        refreshes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tracker_model::{Choice, EntityKind, ProjectStatus};
    use tracker_store::{MemoryDocumentStore, Seed};
    use tracker_test_utils::{seed_documents, today};

    fn seeded_backend() -> Arc<MemoryDocumentStore> {
        let (employees, projects, tasks) = seed_documents();
        Arc::new(MemoryDocumentStore::seeded(&Seed {
            employees,
            projects,
            tasks,
        }))
    }

    async fn session() -> (Arc<MemoryDocumentStore>, Session<MemoryDocumentStore>) {
        let backend = seeded_backend();
        let session = Session::connect(Arc::clone(&backend), &AppConfig::new())
            .await
            .with_today(today());
        (backend, session)
    }

    fn row_ids(view: &TaskListView) -> Vec<String> {
        view.rows.iter().map(|r| r.id.clone()).collect()
    }

    #[tokio::test]
    async fn test_connect_renders_seed() {
        let (_backend, session) = session().await;
        assert!(session.status().is_live());
        assert_eq!(session.task_list().rows.len(), 6);
        assert_eq!(session.dashboard().stats.total_tasks, 6);
        assert_eq!(session.page(), Page::Dashboard);
    }

    #[tokio::test]
    async fn test_offline_store_is_disconnected_not_fatal() {
        let backend = seeded_backend();
        backend.set_offline(true);
        let mut session = Session::connect(backend, &AppConfig::new()).await;

        assert_eq!(
            session.status(),
            &SyncStatus::Disconnected("🔴 שגיאה בחיבור".to_string())
        );
        assert!(session.task_list().is_empty);
        assert!(session.debouncer().is_none());

        assert!(!session.delete_task(&TaskId::from("t1")).await);
        assert_eq!(session.take_notices().len(), 1);
    }

    #[tokio::test]
    async fn test_manager_change_resets_project_and_assignee() {
        let (_backend, mut session) = session().await;
        session.change_task_filter(FilterChange::Project(Choice::Only(ProjectId::from("p3"))));
        session.change_task_filter(FilterChange::Assignee(Choice::Only(EmployeeId::from("e5"))));
        assert_eq!(row_ids(&session.task_list()), vec!["t5", "t6"]);

        session.change_task_filter(FilterChange::Manager(Choice::Only(EmployeeId::from("e1"))));
        let filter = session.task_filter();
        assert_eq!(filter.project, Choice::All);
        assert_eq!(filter.assignee, Choice::All);
        assert_eq!(row_ids(&session.task_list()), vec!["t1", "t2", "t3", "t4"]);

        session.reset_task_filters();
        assert!(session.task_filter().is_unconstrained());
    }

    #[tokio::test]
    async fn test_sort_header_clicks() {
        let (_backend, mut session) = session().await;
        session.click_sort_header(SortColumn::DaysRemaining);
        assert_eq!(row_ids(&session.task_list()), vec!["t5", "t1", "t2", "t3", "t4", "t6"]);

        session.click_sort_header(SortColumn::DaysRemaining);
        assert_eq!(row_ids(&session.task_list()), vec!["t6", "t4", "t3", "t2", "t1", "t5"]);
    }

    #[tokio::test]
    async fn test_project_filter_and_priority() {
        let backend = seeded_backend();
        let config = AppConfig::new().with_manager_priority(vec![EmployeeId::from("e2")]);
        let mut session = Session::connect(backend, &config).await.with_today(today());

        let titles: Vec<String> = session
            .project_list()
            .sections
            .iter()
            .map(|s| s.title.clone())
            .collect();
        assert_eq!(titles, vec!["מיכל אברהם", "דוד לוי"]);

        session.change_project_filter(ProjectFilterChange::Status(Choice::Only(
            ProjectStatus::Paused,
        )));
        let view = session.project_list();
        assert_eq!(view.sections.len(), 1);
        assert_eq!(view.sections[0].cards[0].id, "p2");
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_one_notice() {
        let (backend, mut session) = session().await;
        backend.fail_writes_to(EntityKind::Tasks, "t4");

        assert!(!session.delete_task(&TaskId::from("t4")).await);
        let notices = session.take_notices();
        assert_eq!(
            notices,
            vec![Notice {
                message: "שגיאה במחיקה. נסה שוב.".to_string()
            }]
        );
        assert!(session.take_notices().is_empty());
    }

    #[tokio::test]
    async fn test_successful_save_has_no_notice() {
        let (_backend, mut session) = session().await;
        let draft = EmployeeDraft {
            name: "שירה".to_string(),
            parent_id: Some(EmployeeId::from("e2")),
            ..EmployeeDraft::default()
        };
        assert!(session.save_employee(None, &draft).await.is_some());
        assert!(session.take_notices().is_empty());

        let invalid = TaskDraft::default();
        assert!(session.save_task(None, &invalid).await.is_none());
        assert_eq!(session.take_notices()[0].message, "נא למלא את כל שדות החובה.");
    }

    #[tokio::test]
    async fn test_stale_selection_dropped_on_refresh() {
        let (_backend, mut session) = session().await;
        session.change_task_filter(FilterChange::Project(Choice::Only(ProjectId::from("p2"))));
        assert_eq!(row_ids(&session.task_list()), vec!["t4"]);

        assert!(session.delete_project(&ProjectId::from("p2")).await);
        let mut debouncer = session.debouncer().unwrap();
        // Cascade pushes tasks then projects; wait until the project is gone
        while session.snapshot().project(&ProjectId::from("p2")).is_some() {
            debouncer.next_burst().await.unwrap();
        }

        session.refresh();
        assert_eq!(session.task_filter().project, Choice::All);
        assert_eq!(session.task_list().rows.len(), 5);
    }

    #[tokio::test]
    async fn test_current_page_follows_show() {
        let (_backend, mut session) = session().await;
        session.show(Page::Org);
        let PageView::Org(chart) = session.current_view() else {
            panic!("expected org chart");
        };
        assert_eq!(chart.departments.len(), 2);

        session.show(Page::Tasks);
        assert!(matches!(session.current_view(), PageView::Tasks(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_loop_coalesces_cascade() {
        let (backend, mut session) = session().await;
        session.show(Page::Tasks);

        let writer = Arc::clone(&backend);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            // Three task deletes and the project delete
            let store = writer;
            for id in ["t1", "t2", "t3"] {
                store.delete(EntityKind::Tasks, id).await.unwrap();
            }
            store.delete(EntityKind::Projects, "p1").await.unwrap();
            store
        });

        let mut rendered = Vec::new();
        let refreshes = session
            .run_refresh_loop(
                |s, burst| {
                    if let PageView::Tasks(view) = s.current_view() {
                        rendered.push((view.rows.len(), burst.notifications));
                    }
                },
                tokio::time::sleep(Duration::from_secs(5)),
            )
            .await;

        assert_eq!(refreshes, 1);
        assert_eq!(rendered, vec![(3, 4)]);
    }
}
