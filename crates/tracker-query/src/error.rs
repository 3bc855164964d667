//! Error types for query parameters
//!
//! Filtering and sorting are total; only parsing user-supplied column and
//! direction names can fail.

/// Query parameter errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Unknown sort column name
    #[error("unknown sort column '{0}'")]
    UnknownColumn(String),

    /// Unknown sort direction
    #[error("unknown sort direction '{0}': expected asc or desc")]
    UnknownDirection(String),

    /// Days window is not an integer
    #[error("invalid days window '{0}'")]
    InvalidDays(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_error_display() {
        assert_eq!(
            QueryError::UnknownColumn("size".into()).to_string(),
            "unknown sort column 'size'"
        );
        assert!(QueryError::UnknownDirection("up".into())
            .to_string()
            .contains("asc or desc"));
    }
}
