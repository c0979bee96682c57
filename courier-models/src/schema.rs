//! Database schema definitions and table creation.
//!
//! Defines the local mirror of the backend's conversation, membership, and
//! contact data, plus the session store, as relational tables with indexes
//! for the list-aggregation join.

use rusqlite::Connection;
use courier_core::error::{CourierError, CourierResult};
use tracing::info;

/// Create all database tables and indexes if they do not exist.
pub fn create_tables(conn: &Connection) -> CourierResult<()> {
    conn.execute_batch(SCHEMA_SQL)
        .map_err(|e| CourierError::Database(format!("failed to create schema: {e}")))?;
    info!("database schema verified");
    Ok(())
}

/// Drop all tables (used for database reset).
pub fn drop_tables(conn: &Connection) -> CourierResult<()> {
    conn.execute_batch(
        "DROP TABLE IF EXISTS conversation_members;
         DROP TABLE IF EXISTS conversations;
         DROP TABLE IF EXISTS contacts;
         DROP TABLE IF EXISTS sessions;
         DROP TABLE IF EXISTS schema_version;",
    )
    .map_err(|e| CourierError::Database(format!("failed to drop tables: {e}")))?;
    Ok(())
}

/// Complete SQL schema for all tables.
///
/// Conversations and contacts carry the backend's identifiers as primary
/// keys so remote re-fetches replace rather than duplicate.
/// `conversation_members.contact_id` deliberately has no foreign key:
/// membership rows may arrive before their contact is synced, and the list
/// join must keep such conversations visible.
const SCHEMA_SQL: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

-- Conversations
CREATE TABLE IF NOT EXISTS conversations (
    id                              TEXT PRIMARY KEY NOT NULL,
    name                            TEXT NOT NULL DEFAULT '',
    conv_type                       INTEGER NOT NULL DEFAULT 2,
    updated_at                      TEXT
);

CREATE INDEX IF NOT EXISTS idx_conversations_type ON conversations(conv_type);

-- Conversation membership (many-to-many conversation <-> contact)
CREATE TABLE IF NOT EXISTS conversation_members (
    conversation_id                 TEXT NOT NULL REFERENCES conversations(id) ON DELETE CASCADE,
    contact_id                      TEXT NOT NULL,
    PRIMARY KEY (conversation_id, contact_id)
);

CREATE INDEX IF NOT EXISTS idx_members_conversation ON conversation_members(conversation_id);
CREATE INDEX IF NOT EXISTS idx_members_contact ON conversation_members(contact_id);

-- Contacts
CREATE TABLE IF NOT EXISTS contacts (
    id                              TEXT PRIMARY KEY NOT NULL,
    name                            TEXT NOT NULL,
    profile_picture_path            TEXT
);

CREATE INDEX IF NOT EXISTS idx_contacts_name ON contacts(name);

-- Sessions (at most one row has is_current = 1)
CREATE TABLE IF NOT EXISTS sessions (
    user_id                         TEXT PRIMARY KEY NOT NULL,
    access_token                    TEXT NOT NULL,
    token_type                      TEXT NOT NULL DEFAULT 'Bearer',
    refresh_token                   TEXT NOT NULL,
    is_current                      INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_sessions_current ON sessions(is_current);
"#;
