//! Tracker App - the presentation side of the division tracker
//!
//! Wires the entity store and the query engine into something a user can
//! drive:
//! - [`AppConfig`]: TOML configuration with defaults for every field
//! - [`logging`]: `tracing` subscriber setup
//! - [`Session`]: current selections, notices, sync status, debounced refresh
//! - [`render`]: plain-text and JSON output of page views
//! - [`cli`]: the `tracker` command line
//!
//! # Example
//!
//! ```rust,ignore
//! use tracker_app::{cli, AppConfig, Page, Session};
//!
//! # async fn example() -> tracker_app::Result<()> {
//! let config = AppConfig::new().with_seed("data/seed.json");
//! let backend = cli::open_store(&config).await?;
//! let mut session = Session::connect(backend, &config).await;
//! session.show(Page::Tasks);
//! println!("{}", tracker_app::render::page_text(&session.current_view()));
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod render;
pub mod session;

pub use config::{AppConfig, ConfigError, ConfigSource, LogConfig, ViewConfig};
pub use error::{AppError, Result};
pub use render::Format;
pub use session::{Notice, Page, PageView, Session, SyncStatus};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
