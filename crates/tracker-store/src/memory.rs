//! In-process document store
//!
//! Implements [`DocumentStore`] over plain maps. Used by the CLI (seeded
//! from a JSON file) and by tests, which can switch it offline or make
//! writes to chosen documents fail to exercise the error paths.

use crate::backend::{CollectionFeed, DocumentStore};
use crate::error::{StoreError, WriteOp};
use async_trait::async_trait;
use dashmap::DashMap;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tokio::sync::mpsc;
use tracker_model::{Document, EntityKind, Record};

/// Initial contents for a [`MemoryDocumentStore`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Seed {
    /// `employees` documents
    pub employees: Vec<Document>,
    /// `projects` documents
    pub projects: Vec<Document>,
    /// `tasks` documents
    pub tasks: Vec<Document>,
}

impl Seed {
    /// Parse seed JSON
    ///
    /// # Errors
    /// `StoreError::Seed` when the JSON does not match the seed shape
    pub fn from_json(path: &Path, json: &str) -> Result<Self, StoreError> {
        serde_json::from_str(json).map_err(|e| StoreError::Seed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read and parse a seed file
    ///
    /// # Errors
    /// `StoreError::Seed` on I/O or parse failure
    pub async fn load(path: &Path) -> Result<Self, StoreError> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::Seed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Self::from_json(path, &json)
    }

    fn documents(&self, kind: EntityKind) -> &[Document] {
        match kind {
            EntityKind::Employees => &self.employees,
            EntityKind::Projects => &self.projects,
            EntityKind::Tasks => &self.tasks,
        }
    }
}

#[derive(Debug, Default)]
struct Faults {
    offline: bool,
    failing: HashSet<(EntityKind, String)>,
}

/// Document store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    /// Documents per collection, in creation order
    collections: Mutex<HashMap<EntityKind, IndexMap<String, Record>>>,
    /// Live feeds per collection
    subscribers: DashMap<EntityKind, Vec<mpsc::UnboundedSender<Vec<Document>>>>,
    /// Injected failures
    faults: Mutex<Faults>,
}

impl MemoryDocumentStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create store pre-filled with documents
    #[must_use]
    pub fn seeded(seed: &Seed) -> Self {
        let store = Self::new();
        {
            let mut collections = store.collections.lock();
            for kind in EntityKind::ALL {
                let docs = collections.entry(kind).or_default();
                for doc in seed.documents(kind) {
                    docs.insert(doc.id.clone(), doc.fields.clone());
                }
            }
        }
        store
    }

    /// Simulate losing the connection: subscriptions and writes fail
    pub fn set_offline(&self, offline: bool) {
        self.faults.lock().offline = offline;
    }

    /// Make every write touching this document fail
    pub fn fail_writes_to(&self, kind: EntityKind, id: &str) {
        self.faults.lock().failing.insert((kind, id.to_string()));
    }

    /// Stop failing writes to this document
    pub fn clear_failure(&self, kind: EntityKind, id: &str) {
        self.faults.lock().failing.remove(&(kind, id.to_string()));
    }

    /// Current documents of a collection
    #[must_use]
    pub fn documents(&self, kind: EntityKind) -> Vec<Document> {
        self.collections
            .lock()
            .get(&kind)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn check_write(&self, op: WriteOp, kind: EntityKind, id: Option<&str>) -> Result<(), StoreError> {
        let faults = self.faults.lock();
        if faults.offline {
            return Err(StoreError::write(op, kind, id, "store unreachable"));
        }
        if let Some(id) = id {
            if faults.failing.contains(&(kind, id.to_string())) {
                return Err(StoreError::write(op, kind, Some(id), "write rejected"));
            }
        }
        Ok(())
    }

    /// Push the current collection to every live feed, dropping closed ones
    fn publish(&self, kind: EntityKind) {
        let docs = self.documents(kind);
        if let Some(mut feeds) = self.subscribers.get_mut(&kind) {
            feeds.retain(|tx| tx.send(docs.clone()).is_ok());
            tracing::trace!(%kind, feeds = feeds.len(), docs = docs.len(), "published snapshot");
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn subscribe(&self, kind: EntityKind) -> Result<CollectionFeed, StoreError> {
        if self.faults.lock().offline {
            return Err(StoreError::Connection(format!(
                "cannot subscribe to {kind}: store unreachable"
            )));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(self.documents(kind))
            .map_err(|_| StoreError::Closed)?;
        self.subscribers.entry(kind).or_default().push(tx);
        Ok(rx)
    }

    async fn create(&self, kind: EntityKind, record: Record) -> Result<String, StoreError> {
        self.check_write(WriteOp::Create, kind, None)?;

        let id = uuid::Uuid::new_v4().simple().to_string();
        self.collections
            .lock()
            .entry(kind)
            .or_default()
            .insert(id.clone(), record);
        self.publish(kind);
        Ok(id)
    }

    async fn update(&self, kind: EntityKind, id: &str, patch: Record) -> Result<(), StoreError> {
        self.check_write(WriteOp::Update, kind, Some(id))?;

        {
            let mut collections = self.collections.lock();
            let doc = collections
                .get_mut(&kind)
                .and_then(|docs| docs.get_mut(id))
                .ok_or_else(|| StoreError::NotFound {
                    kind,
                    id: id.to_string(),
                })?;
            doc.extend(patch);
        }
        self.publish(kind);
        Ok(())
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), StoreError> {
        self.check_write(WriteOp::Delete, kind, Some(id))?;

        let removed = self
            .collections
            .lock()
            .get_mut(&kind)
            .and_then(|docs| docs.shift_remove(id));
        if removed.is_some() {
            self.publish(kind);
        }
        Ok(())
    }

    async fn find_by_field(
        &self,
        kind: EntityKind,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreError> {
        if self.faults.lock().offline {
            return Err(StoreError::Connection(format!(
                "cannot query {kind}: store unreachable"
            )));
        }

        Ok(self
            .documents(kind)
            .into_iter()
            .filter(|doc| doc.fields.get(field).and_then(|v| v.as_text()) == Some(value))
            .collect())
    }
}
