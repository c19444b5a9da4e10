//! Unified error types for the worksafe server.
//!
//! Every failure that reaches the HTTP boundary is one of these variants;
//! the server converts them into the uniform `{success: 0, message}` shape.

/// Unified error types for the worksafe server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or empty required field.
    #[error("missing or empty field: {0}")]
    Validation(String),

    /// Browser navigation or capture failure.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// Requested record or cached sheet does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Filesystem read/write failure.
    #[error("io error: {0}")]
    Io(String),

    /// Malformed JSON on disk or in a request body.
    #[error("invalid JSON: {0}")]
    Json(String),

    /// Authentication provider rejected the operation.
    #[error("auth error: {0}")]
    Auth(String),

    /// Operation conflicts with existing state (duplicate worksite or user).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Validation("name".to_string());
        assert!(err.to_string().contains("missing or empty field"));
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_json_error_conversion() {
        let bad = serde_json::from_str::<serde_json::Value>("{not json");
        let err: Error = bad.unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }
}
