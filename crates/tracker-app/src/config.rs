//! Application configuration
//!
//! Read from a TOML file. Every section and field has a default, so a
//! missing file or an empty one both yield a working configuration.
//!
//! ```toml
//! [store]
//! debounce_ms = 300
//! seed_path = "data/seed.json"
//!
//! [views]
//! manager_priority = ["e1"]
//! upcoming_window_days = 14
//! dashboard_limit = 5
//!
//! [log]
//! filter = "info"
//! json = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracker_model::EmployeeId;
use tracker_store::StoreConfig;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for this shape
    #[error("failed to parse config {path}: {source}")]
    Parse {
        /// Config file path
        path: PathBuf,
        /// TOML error with location
        #[source]
        source: toml::de::Error,
    },

    /// Configuration could not be written back out
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Presentation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Managers whose project groups are listed first, in this order
    pub manager_priority: Vec<EmployeeId>,
    /// Days ahead the dashboard looks for upcoming tasks
    pub upcoming_window_days: u32,
    /// Entries per dashboard list
    pub dashboard_limit: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            manager_priority: Vec::new(),
            upcoming_window_days: 14,
            dashboard_limit: 5,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` filter directive, overridden by `RUST_LOG`
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Entity store timing and seeding
    pub store: StoreConfig,
    /// Presentation
    pub views: ViewConfig,
    /// Logging
    pub log: LogConfig,
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// No file was named
    Defaults,
    /// Read from this file
    File(PathBuf),
    /// The named file does not exist; defaults were used
    Missing(PathBuf),
}

impl ConfigSource {
    /// Log the source; call once logging is initialised
    pub fn report(&self) {
        match self {
            Self::Defaults => tracing::debug!("no config file given, using defaults"),
            Self::File(path) => tracing::debug!(path = %path.display(), "loaded config"),
            Self::Missing(path) => {
                tracing::info!(path = %path.display(), "config file not found, using defaults");
            }
        }
    }
}

impl AppConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a seed file for the in-process store
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, path: impl Into<PathBuf>) -> Self {
        self.store = self.store.with_seed(path);
        self
    }

    /// With manager ordering for the project list
    #[inline]
    #[must_use]
    pub fn with_manager_priority(mut self, managers: Vec<EmployeeId>) -> Self {
        self.views.manager_priority = managers;
        self
    }

    /// Parse TOML text. `origin` is only used in error messages.
    ///
    /// # Errors
    /// `ConfigError::Parse` on malformed input
    pub fn from_toml(origin: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Read a configuration file
    ///
    /// # Errors
    /// `ConfigError::Io` when the file cannot be read, `ConfigError::Parse`
    /// when it is malformed
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(path, &content)
    }

    /// Load from `path` if given; defaults when no path is given or the
    /// file does not exist. Loading runs before logging is set up, so the
    /// caller reports the returned source.
    ///
    /// # Errors
    /// Any read or parse failure of an existing file
    pub fn load(path: Option<&Path>) -> Result<(Self, ConfigSource), ConfigError> {
        match path {
            Some(path) if path.exists() => {
                Ok((Self::from_file(path)?, ConfigSource::File(path.to_path_buf())))
            }
            Some(path) => Ok((Self::default(), ConfigSource::Missing(path.to_path_buf()))),
            None => Ok((Self::default(), ConfigSource::Defaults)),
        }
    }

    /// Render as TOML
    ///
    /// # Errors
    /// `ConfigError::Serialize` if a value has no TOML form
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
