//! Conversation entity model.

use serde::{Deserialize, Serialize};
use rusqlite::{params, Connection, Row};
use courier_core::constants::conversation_type;
use courier_core::error::{CourierError, CourierResult};

/// Kind of conversation as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationType {
    /// Multi-party group conversation.
    Group,
    /// The user's own self-conversation.
    SelfConversation,
    /// Two-party conversation.
    OneToOne,
    /// Unrecognized type code (preserved as OneToOne-like in listings).
    Unknown,
}

impl ConversationType {
    /// Convert a backend integer code to a ConversationType.
    pub fn from_code(code: i32) -> Self {
        match code {
            conversation_type::GROUP => Self::Group,
            conversation_type::SELF => Self::SelfConversation,
            conversation_type::ONE_TO_ONE => Self::OneToOne,
            _ => Self::Unknown,
        }
    }

    /// Get the integer code stored in the database for this type.
    pub fn code(&self) -> i32 {
        match self {
            Self::Group => conversation_type::GROUP,
            Self::SelfConversation => conversation_type::SELF,
            Self::OneToOne => conversation_type::ONE_TO_ONE,
            Self::Unknown => -1,
        }
    }
}

impl std::fmt::Display for ConversationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Group => write!(f, "group"),
            Self::SelfConversation => write!(f, "self"),
            Self::OneToOne => write!(f, "one-to-one"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Represents a conversation mirrored from the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Backend conversation identifier.
    pub id: String,
    /// Display name. Empty for unnamed one-to-one conversations.
    pub name: String,
    /// Conversation kind.
    pub conv_type: ConversationType,
    /// Last local write timestamp (RFC 3339).
    pub updated_at: Option<String>,
}

impl Conversation {
    /// Create a new conversation with the given id, name, and type.
    pub fn new(id: impl Into<String>, name: impl Into<String>, conv_type: ConversationType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            conv_type,
            updated_at: None,
        }
    }

    /// Construct a Conversation from a database row.
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            conv_type: ConversationType::from_code(row.get("conv_type")?),
            updated_at: row.get("updated_at")?,
        })
    }

    // ─── Static finders ──────────────────────────────────────────────────

    /// Find a conversation by its backend identifier.
    pub fn find_by_id(conn: &Connection, id: &str) -> CourierResult<Option<Self>> {
        match conn.query_row(
            "SELECT * FROM conversations WHERE id = ?1",
            [id],
            Self::from_row,
        ) {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(CourierError::Database(e.to_string())),
        }
    }

    /// Load all conversations in id order.
    pub fn all(conn: &Connection) -> CourierResult<Vec<Self>> {
        let mut stmt = conn
            .prepare("SELECT * FROM conversations ORDER BY id")
            .map_err(|e| CourierError::Database(e.to_string()))?;

        let conversations = stmt
            .query_map([], Self::from_row)
            .map_err(|e| CourierError::Database(e.to_string()))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(conversations)
    }

    /// Delete a conversation by id. Membership rows cascade.
    /// Returns true if a row was deleted.
    pub fn delete(conn: &Connection, id: &str) -> CourierResult<bool> {
        let changed = conn
            .execute("DELETE FROM conversations WHERE id = ?1", [id])
            .map_err(|e| CourierError::Database(e.to_string()))?;
        Ok(changed > 0)
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Save this conversation with replace semantics: a duplicate id
    /// overwrites the prior row (last write wins).
    ///
    /// Replacing an existing row clears its membership rows via the cascade,
    /// so batch ingestion re-saves the current member set immediately after.
    pub fn save(&mut self, conn: &Connection) -> CourierResult<()> {
        self.updated_at = Some(chrono::Utc::now().to_rfc3339());
        conn.execute(
            "INSERT OR REPLACE INTO conversations (id, name, conv_type, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![self.id, self.name, self.conv_type.code(), self.updated_at],
        )
        .map_err(|e| CourierError::Database(e.to_string()))?;
        Ok(())
    }

    /// Update the display name of an existing conversation.
    pub fn rename(conn: &Connection, id: &str, name: &str) -> CourierResult<bool> {
        let changed = conn
            .execute(
                "UPDATE conversations SET name = ?1, updated_at = ?2 WHERE id = ?3",
                params![name, chrono::Utc::now().to_rfc3339(), id],
            )
            .map_err(|e| CourierError::Database(e.to_string()))?;
        Ok(changed > 0)
    }

    /// Whether this conversation has an explicit display name.
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys=ON;").unwrap();
        schema::create_tables(&conn).unwrap();
        conn
    }

    #[test]
    fn test_type_codes_roundtrip() {
        assert_eq!(ConversationType::from_code(0), ConversationType::Group);
        assert_eq!(
            ConversationType::from_code(1),
            ConversationType::SelfConversation
        );
        assert_eq!(ConversationType::from_code(2), ConversationType::OneToOne);
        assert_eq!(ConversationType::from_code(99), ConversationType::Unknown);
        assert_eq!(ConversationType::Group.code(), 0);
    }

    #[test]
    fn test_save_and_find() {
        let conn = setup();
        let mut conv = Conversation::new("conv-1", "Android Chapter", ConversationType::Group);
        conv.save(&conn).unwrap();

        let found = Conversation::find_by_id(&conn, "conv-1").unwrap().unwrap();
        assert_eq!(found.name, "Android Chapter");
        assert_eq!(found.conv_type, ConversationType::Group);
        assert!(found.updated_at.is_some());
    }

    #[test]
    fn test_save_replaces_on_duplicate_id() {
        let conn = setup();
        let mut first = Conversation::new("conv-1", "Old Name", ConversationType::Group);
        first.save(&conn).unwrap();

        let mut second = Conversation::new("conv-1", "New Name", ConversationType::Group);
        second.save(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM conversations", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);

        let found = Conversation::find_by_id(&conn, "conv-1").unwrap().unwrap();
        assert_eq!(found.name, "New Name");
    }

    #[test]
    fn test_rename() {
        let conn = setup();
        let mut conv = Conversation::new("conv-1", "Before", ConversationType::OneToOne);
        conv.save(&conn).unwrap();

        assert!(Conversation::rename(&conn, "conv-1", "After").unwrap());
        let found = Conversation::find_by_id(&conn, "conv-1").unwrap().unwrap();
        assert_eq!(found.name, "After");

        assert!(!Conversation::rename(&conn, "missing", "x").unwrap());
    }

    #[test]
    fn test_delete() {
        let conn = setup();
        let mut conv = Conversation::new("conv-1", "Gone", ConversationType::OneToOne);
        conv.save(&conn).unwrap();

        assert!(Conversation::delete(&conn, "conv-1").unwrap());
        assert!(Conversation::find_by_id(&conn, "conv-1").unwrap().is_none());
        assert!(!Conversation::delete(&conn, "conv-1").unwrap());
    }
}
