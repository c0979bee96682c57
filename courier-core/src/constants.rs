//! Application-wide constants.

/// Application name.
pub const APP_NAME: &str = "Courier";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// REST API version prefix.
pub const API_VERSION: &str = "v1";

/// Default backend API timeout in milliseconds.
pub const DEFAULT_API_TIMEOUT_MS: u64 = 30_000;

/// Default page size for the local conversation list.
pub const DEFAULT_LIST_PAGE_SIZE: i64 = 25;

/// Default number of conversations fetched per remote batch.
pub const DEFAULT_CONVERSATION_BATCH_SIZE: u32 = 100;

/// Database schema version.
pub const DB_SCHEMA_VERSION: i32 = 1;

/// Conversation type codes stored in the database.
///
/// The backend reports conversation types as small integers; unknown codes
/// are preserved but rendered as "unknown".
pub mod conversation_type {
    /// Multi-party group conversation.
    pub const GROUP: i32 = 0;
    /// The user's own self-conversation (notes to self).
    pub const SELF: i32 = 1;
    /// Two-party conversation.
    pub const ONE_TO_ONE: i32 = 2;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_codes_distinct() {
        assert_ne!(conversation_type::GROUP, conversation_type::ONE_TO_ONE);
        assert_ne!(conversation_type::GROUP, conversation_type::SELF);
    }

    #[test]
    fn test_app_version_set() {
        assert!(!APP_VERSION.is_empty());
    }
}
