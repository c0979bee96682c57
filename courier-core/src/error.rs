//! Global error types for the Courier client.
//!
//! All error categories across the client are unified into a single
//! `CourierError` enum with conversions from underlying library errors.
//! Failures cross layer boundaries as tagged results, never as panics.

use thiserror::Error;

/// Convenience type alias for Results using CourierError.
pub type CourierResult<T> = Result<T, CourierError>;

/// Unified error type covering all error categories in Courier.
#[derive(Error, Debug)]
pub enum CourierError {
    // -- Configuration errors --
    /// Failed to load or parse application configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required configuration value is missing.
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    // -- Database errors --
    /// SQLite database error.
    #[error("database error: {0}")]
    Database(String),

    /// Database migration failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// Database connection pool error.
    #[error("connection pool error: {0}")]
    Pool(String),

    /// Database integrity check failed.
    #[error("database integrity check failed: {0}")]
    IntegrityCheck(String),

    // -- Network errors --
    /// HTTP request failed.
    #[error("http error: {0}")]
    Http(String),

    /// HTTP request timed out.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Backend returned an error response.
    #[error("backend error (status {status}, label {label}): {message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Machine-readable error label from the backend.
        label: String,
        /// Error message from the backend.
        message: String,
    },

    /// Authentication failed (bad credentials or expired token).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    // -- Session errors --
    /// No session is stored for the requested user.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// No current session exists (user is logged out).
    #[error("not logged in")]
    NotLoggedIn,

    // -- Conversation errors --
    /// Conversation not found in the local store.
    #[error("conversation not found: {0}")]
    ConversationNotFound(String),

    // -- File/IO errors --
    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    // -- Service errors --
    /// A service failed to initialize.
    #[error("service init error: {0}")]
    ServiceInit(String),

    /// A service operation failed.
    #[error("service error: {0}")]
    Service(String),

    // -- Notification errors --
    /// Desktop notification failed.
    #[error("notification error: {0}")]
    Notification(String),

    // -- Generic --
    /// An unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),

    /// Wrapping anyhow errors for interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<serde_json::Error> for CourierError {
    fn from(e: serde_json::Error) -> Self {
        CourierError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for CourierError {
    fn from(e: toml::de::Error) -> Self {
        CourierError::Config(e.to_string())
    }
}

impl CourierError {
    /// Whether this error originated from the network layer.
    ///
    /// Used by callers that must keep serving local data when the remote
    /// side is unavailable.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            CourierError::Http(_)
                | CourierError::Timeout(_)
                | CourierError::Backend { .. }
                | CourierError::AuthFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CourierError::Config("bad value".to_string());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn test_backend_error_display() {
        let err = CourierError::Backend {
            status: 403,
            label: "invalid-credentials".into(),
            message: "Authentication failed".into(),
        };
        let s = err.to_string();
        assert!(s.contains("403"));
        assert!(s.contains("invalid-credentials"));
    }

    #[test]
    fn test_is_remote() {
        assert!(CourierError::Http("boom".into()).is_remote());
        assert!(CourierError::Timeout("slow".into()).is_remote());
        assert!(!CourierError::Database("locked".into()).is_remote());
    }
}
