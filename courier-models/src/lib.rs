//! Courier Models - Database schema, models, migrations, and query builders.
//!
//! This crate owns all data persistence: SQLite database initialization,
//! entity models mirroring the backend's conversations, members, and
//! contacts, the session store, versioned migrations, and query builders
//! for the conversation-list aggregation.

pub mod db;
pub mod schema;
pub mod models;
pub mod queries;
pub mod migrations;

// Re-export key types
pub use db::{Database, DbPool};
pub use models::conversation::{Conversation, ConversationType};
pub use models::member::ConversationMember;
pub use models::contact::Contact;
pub use models::session::Session;
pub use queries::ConversationListItem;
