//! External document store boundary
//!
//! The tracker never owns persistence. It talks to a document store that
//! offers per-collection CRUD, a field-equality query, and a push feed of
//! full collection snapshots.

use crate::error::StoreError;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracker_model::{Document, EntityKind, Record};

/// Push feed for one collection. Every message is the complete current
/// document set, never a delta.
pub type CollectionFeed = mpsc::UnboundedReceiver<Vec<Document>>;

/// Operations the tracker needs from a document store
///
/// Each method is an independent network operation. Nothing here is
/// transactional; cascades are orchestrated by the caller.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Register for snapshots of one collection
    ///
    /// The feed must deliver the then-current document set at least once
    /// after registration.
    ///
    /// # Errors
    /// `StoreError::Connection` when the store cannot be reached
    async fn subscribe(&self, kind: EntityKind) -> Result<CollectionFeed, StoreError>;

    /// Create a document and return its id
    async fn create(&self, kind: EntityKind, record: Record) -> Result<String, StoreError>;

    /// Merge `patch` into an existing document
    async fn update(&self, kind: EntityKind, id: &str, patch: Record) -> Result<(), StoreError>;

    /// Remove a document
    async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), StoreError>;

    /// Documents whose `field` equals `value`
    async fn find_by_field(
        &self,
        kind: EntityKind,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreError>;
}
