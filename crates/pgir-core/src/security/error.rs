//! Security-specific error types.

use thiserror::Error;

/// Errors raised while resolving permissions.
#[derive(Debug, Error)]
pub enum SecurityError {
    /// The acting role is not in the catalog's role list.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

/// Result type for security operations.
pub type SecurityResult<T> = Result<T, SecurityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SecurityError::UnknownRole("app_user".to_string());
        assert_eq!(err.to_string(), "unknown role: app_user");
    }
}
