//! Entity mirror
//!
//! [`EntityStore`] keeps an in-memory [`Snapshot`] current by pumping the
//! document store's push feeds on a background task. That task is the only
//! writer: it ingests each pushed collection into typed records, swaps the
//! snapshot, then announces the changed kind. Readers take an `Arc` of the
//! current snapshot and never see a collection mid-replacement.

use crate::backend::{CollectionFeed, DocumentStore};
use crate::error::StoreError;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracker_model::{Document, Employee, EntityKind, Project, Snapshot, Task};

/// Capacity of the change-notification channel
const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// Which collections have delivered their first snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadState {
    /// Employees received
    pub employees: bool,
    /// Projects received
    pub projects: bool,
    /// Tasks received
    pub tasks: bool,
}

impl LoadState {
    /// Whether every collection has arrived
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.employees && self.projects && self.tasks
    }

    fn mark(&mut self, kind: EntityKind) {
        match kind {
            EntityKind::Employees => self.employees = true,
            EntityKind::Projects => self.projects = true,
            EntityKind::Tasks => self.tasks = true,
        }
    }
}

/// Shared mirror state written by the pump
#[derive(Debug)]
struct Mirror {
    current: RwLock<Arc<Snapshot>>,
    changes: broadcast::Sender<EntityKind>,
    loaded: watch::Sender<LoadState>,
}

impl Mirror {
    /// Replace one collection wholesale and announce it
    fn apply(&self, kind: EntityKind, documents: &[Document]) {
        let next = {
            let current = self.current.read();
            match kind {
                EntityKind::Employees => {
                    current.with_employees(documents.iter().map(Employee::from_document).collect())
                }
                EntityKind::Projects => {
                    current.with_projects(documents.iter().map(Project::from_document).collect())
                }
                EntityKind::Tasks => {
                    current.with_tasks(documents.iter().map(Task::from_document).collect())
                }
            }
        };
        let revision = next.revision();
        *self.current.write() = Arc::new(next);

        self.loaded.send_modify(|state| state.mark(kind));
        // No receivers just means nobody is rendering yet
        let _ = self.changes.send(kind);

        tracing::debug!(%kind, records = documents.len(), revision, "applied snapshot");
    }
}

/// In-memory mirror of the three collections plus write access to the store
pub struct EntityStore<S: DocumentStore> {
    backend: Arc<S>,
    mirror: Arc<Mirror>,
    loaded: watch::Receiver<LoadState>,
    pump: JoinHandle<()>,
}

impl<S: DocumentStore> std::fmt::Debug for EntityStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("revision", &self.snapshot().revision())
            .field("loaded", &*self.loaded.borrow())
            .finish_non_exhaustive()
    }
}

impl<S: DocumentStore> EntityStore<S> {
    /// Attach to the document store and start mirroring
    ///
    /// Subscribes to every collection (one network round-trip each) and
    /// spawns the pump task. Must be called inside a tokio runtime.
    ///
    /// # Errors
    /// `StoreError::Connection` if any subscription fails; nothing is retried
    pub async fn attach(backend: Arc<S>) -> Result<Self, StoreError> {
        let mut feeds = Vec::with_capacity(EntityKind::ALL.len());
        for kind in EntityKind::ALL {
            let feed = backend.subscribe(kind).await.map_err(|e| {
                tracing::error!(%kind, "attach failed: {e}");
                match e {
                    StoreError::Connection(_) => e,
                    other => StoreError::Connection(other.to_string()),
                }
            })?;
            feeds.push((kind, feed));
        }

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        let (loaded_tx, loaded) = watch::channel(LoadState::default());
        let mirror = Arc::new(Mirror {
            current: RwLock::new(Arc::new(Snapshot::default())),
            changes,
            loaded: loaded_tx,
        });

        let pump = tokio::spawn(pump(Arc::clone(&mirror), feeds));
        tracing::info!("attached to document store");

        Ok(Self {
            backend,
            mirror,
            loaded,
            pump,
        })
    }

    /// Wait until every collection has delivered its first snapshot, for at
    /// most `limit`. Returns whether everything arrived in time.
    pub async fn ready(&self, limit: Duration) -> bool {
        let mut loaded = self.loaded.clone();
        let arrived = tokio::time::timeout(limit, loaded.wait_for(LoadState::is_complete))
            .await
            .is_ok_and(|r| r.is_ok());
        if !arrived {
            tracing::warn!(
                state = ?*self.loaded.borrow(),
                "first snapshots incomplete after {limit:?}"
            );
        }
        arrived
    }

    /// Current load state
    #[must_use]
    pub fn load_state(&self) -> LoadState {
        *self.loaded.borrow()
    }

    /// Current snapshot of all collections
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.mirror.current.read())
    }

    /// Subscribe to change notifications: one message per applied
    /// collection snapshot, carrying its kind
    #[must_use]
    pub fn changes(&self) -> broadcast::Receiver<EntityKind> {
        self.mirror.changes.subscribe()
    }

    /// The underlying document store
    #[inline]
    #[must_use]
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Whether the pump is still running
    #[inline]
    #[must_use]
    pub fn is_live(&self) -> bool {
        !self.pump.is_finished()
    }
}

impl<S: DocumentStore> Drop for EntityStore<S> {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

/// Single writer: drain every feed into the mirror until all feeds close
async fn pump(mirror: Arc<Mirror>, feeds: Vec<(EntityKind, CollectionFeed)>) {
    let mut employees = None;
    let mut projects = None;
    let mut tasks = None;
    for (kind, feed) in feeds {
        match kind {
            EntityKind::Employees => employees = Some(feed),
            EntityKind::Projects => projects = Some(feed),
            EntityKind::Tasks => tasks = Some(feed),
        }
    }
    let (Some(mut employees), Some(mut projects), Some(mut tasks)) = (employees, projects, tasks)
    else {
        tracing::error!("pump started without all three feeds");
        return;
    };

    loop {
        tokio::select! {
            Some(docs) = employees.recv() => mirror.apply(EntityKind::Employees, &docs),
            Some(docs) = projects.recv() => mirror.apply(EntityKind::Projects, &docs),
            Some(docs) = tasks.recv() => mirror.apply(EntityKind::Tasks, &docs),
            else => break,
        }
    }

    tracing::info!("document store feeds closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryDocumentStore, Seed};
    use tracker_test_utils::seed_documents;

    #[tokio::test]
    async fn attach_mirrors_seeded_collections() {
        let backend = Arc::new(MemoryDocumentStore::seeded(&seed()));
        let store = EntityStore::attach(backend).await.unwrap();

        assert!(store.ready(Duration::from_secs(1)).await);
        let snapshot = store.snapshot();
        assert_eq!(snapshot.employees().len(), 6);
        assert_eq!(snapshot.projects().len(), 3);
        assert_eq!(snapshot.tasks().len(), 6);
        assert!(store.load_state().is_complete());
    }

    #[tokio::test]
    async fn attach_fails_when_offline() {
        let backend = Arc::new(MemoryDocumentStore::new());
        backend.set_offline(true);

        let err = EntityStore::attach(backend).await.unwrap_err();
        assert!(err.is_connection());
    }

    #[tokio::test]
    async fn held_snapshot_is_not_torn_by_updates() {
        let backend = Arc::new(MemoryDocumentStore::seeded(&seed()));
        let store = EntityStore::attach(Arc::clone(&backend)).await.unwrap();
        store.ready(Duration::from_secs(1)).await;

        let held = store.snapshot();
        let mut changes = store.changes();
        backend.delete(EntityKind::Tasks, "t1").await.unwrap();
        assert_eq!(changes.recv().await.unwrap(), EntityKind::Tasks);

        assert_eq!(held.tasks().len(), 6);
        assert_eq!(store.snapshot().tasks().len(), 5);
    }

    fn seed() -> Seed {
        let (employees, projects, tasks) = seed_documents();
        Seed {
            employees,
            projects,
            tasks,
        }
    }
}
