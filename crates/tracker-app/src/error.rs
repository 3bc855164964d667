//! Application error type

use crate::config::ConfigError;
use tracker_query::QueryError;
use tracker_store::StoreError;

/// Errors surfaced by the application layer
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Entity store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Bad filter or sort input
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Logging could not be installed
    #[error("logging setup failed: {0}")]
    Logging(String),

    /// Rendered output could not be produced
    #[error("render failed: {0}")]
    Render(#[from] serde_json::Error),
}

impl AppError {
    /// Message shown to the user for this failure
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Store(e) => e.user_message().to_string(),
            other => other.to_string(),
        }
    }
}

/// Result alias for the application layer
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_model::EntityKind;
    use tracker_store::WriteOp;

    #[test]
    fn store_errors_use_store_messages() {
        let err = AppError::from(StoreError::write(WriteOp::Update, EntityKind::Tasks, Some("t1"), "x"));
        assert_eq!(err.user_message(), "שגיאה בשמירה. נסה שוב.");

        let err = AppError::from(StoreError::Connection("refused".into()));
        assert_eq!(err.user_message(), "🔴 שגיאה בחיבור");
    }

    #[test]
    fn query_errors_describe_input() {
        let err = AppError::from(QueryError::UnknownColumn("size".into()));
        assert!(err.user_message().contains("size"));
    }
}
