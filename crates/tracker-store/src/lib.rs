//! Tracker Store - entity mirror over an external document store
//!
//! Keeps an in-memory copy of employees, projects and tasks current from
//! the store's push feeds, and orchestrates writes:
//! - [`DocumentStore`]: the external boundary (CRUD, query, push feed)
//! - [`MemoryDocumentStore`]: in-process implementation
//! - [`EntityStore`]: snapshot mirror, change notifications, mutators
//! - [`Debouncer`]: folds bursts of notifications into one refresh
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tracker_store::{EntityStore, MemoryDocumentStore, StoreConfig};
//!
//! # async fn example() -> Result<(), tracker_store::StoreError> {
//! let config = StoreConfig::new();
//! let store = EntityStore::attach(Arc::new(MemoryDocumentStore::new())).await?;
//! store.ready(config.startup_delay()).await;
//!
//! let snapshot = store.snapshot();
//! println!("{} tasks", snapshot.tasks().len());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod backend;
pub mod config;
pub mod debounce;
pub mod error;
pub mod memory;
pub mod mirror;
mod mutations;

pub use backend::{CollectionFeed, DocumentStore};
pub use config::StoreConfig;
pub use debounce::{ChangeBurst, Debouncer};
pub use error::{CascadeOp, StoreError, WriteOp};
pub use memory::{MemoryDocumentStore, Seed};
pub use mirror::{EntityStore, LoadState};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
