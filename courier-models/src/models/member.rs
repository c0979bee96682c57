//! Conversation membership entity model.
//!
//! A membership row is a bare (conversation, contact) pairing with no
//! independent lifecycle: rows are written alongside conversation ingestion
//! and removed by the conversation-delete cascade.

use serde::{Deserialize, Serialize};
use rusqlite::{params, Connection, Row};
use courier_core::error::{CourierError, CourierResult};

/// A (conversation, contact) membership pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMember {
    pub conversation_id: String,
    pub contact_id: String,
}

impl ConversationMember {
    /// Create a membership pairing.
    pub fn new(conversation_id: impl Into<String>, contact_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            contact_id: contact_id.into(),
        }
    }

    /// Construct a ConversationMember from a database row.
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            conversation_id: row.get("conversation_id")?,
            contact_id: row.get("contact_id")?,
        })
    }

    /// Save this pairing with replace semantics (duplicates collapse).
    pub fn save(&self, conn: &Connection) -> CourierResult<()> {
        conn.execute(
            "INSERT OR REPLACE INTO conversation_members (conversation_id, contact_id)
             VALUES (?1, ?2)",
            params![self.conversation_id, self.contact_id],
        )
        .map_err(|e| CourierError::Database(e.to_string()))?;
        Ok(())
    }

    /// Save a batch of pairings.
    pub fn save_all(conn: &Connection, members: &[ConversationMember]) -> CourierResult<()> {
        let mut stmt = conn
            .prepare(
                "INSERT OR REPLACE INTO conversation_members (conversation_id, contact_id)
                 VALUES (?1, ?2)",
            )
            .map_err(|e| CourierError::Database(e.to_string()))?;

        for member in members {
            stmt.execute(params![member.conversation_id, member.contact_id])
                .map_err(|e| CourierError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Contact ids of all members of a conversation, resolved or not.
    pub fn contact_ids_for_conversation(
        conn: &Connection,
        conversation_id: &str,
    ) -> CourierResult<Vec<String>> {
        let mut stmt = conn
            .prepare(
                "SELECT contact_id FROM conversation_members
                 WHERE conversation_id = ?1 ORDER BY contact_id",
            )
            .map_err(|e| CourierError::Database(e.to_string()))?;

        let ids = stmt
            .query_map([conversation_id], |row| row.get(0))
            .map_err(|e| CourierError::Database(e.to_string()))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(ids)
    }

    /// Remove all membership rows for a conversation.
    pub fn delete_for_conversation(
        conn: &Connection,
        conversation_id: &str,
    ) -> CourierResult<usize> {
        conn.execute(
            "DELETE FROM conversation_members WHERE conversation_id = ?1",
            [conversation_id],
        )
        .map_err(|e| CourierError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::conversation::{Conversation, ConversationType};
    use crate::schema;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys=ON;").unwrap();
        schema::create_tables(&conn).unwrap();
        let mut conv = Conversation::new("conv-1", "Team", ConversationType::Group);
        conv.save(&conn).unwrap();
        conn
    }

    #[test]
    fn test_save_and_list_contact_ids() {
        let conn = setup();
        ConversationMember::new("conv-1", "contact-b").save(&conn).unwrap();
        ConversationMember::new("conv-1", "contact-a").save(&conn).unwrap();

        let ids = ConversationMember::contact_ids_for_conversation(&conn, "conv-1").unwrap();
        assert_eq!(ids, vec!["contact-a".to_string(), "contact-b".to_string()]);
    }

    #[test]
    fn test_duplicate_pairing_collapses() {
        let conn = setup();
        let member = ConversationMember::new("conv-1", "contact-a");
        member.save(&conn).unwrap();
        member.save(&conn).unwrap();

        let ids = ConversationMember::contact_ids_for_conversation(&conn, "conv-1").unwrap();
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn test_save_all() {
        let conn = setup();
        let members = vec![
            ConversationMember::new("conv-1", "contact-a"),
            ConversationMember::new("conv-1", "contact-b"),
        ];
        ConversationMember::save_all(&conn, &members).unwrap();

        let ids = ConversationMember::contact_ids_for_conversation(&conn, "conv-1").unwrap();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_delete_for_conversation() {
        let conn = setup();
        ConversationMember::new("conv-1", "contact-a").save(&conn).unwrap();
        assert_eq!(
            ConversationMember::delete_for_conversation(&conn, "conv-1").unwrap(),
            1
        );
        assert!(
            ConversationMember::contact_ids_for_conversation(&conn, "conv-1")
                .unwrap()
                .is_empty()
        );
    }
}
