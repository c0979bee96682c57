//! Query builders for common database access patterns.
//!
//! The centerpiece is the conversation-list aggregation: a windowed query
//! over conversations followed by a single batch member/contact join for the
//! window, avoiding N+1 lookups. All queries use parameterized SQL and
//! return domain model types.

use std::collections::HashMap;
use rusqlite::Connection;
use serde::Serialize;
use courier_core::error::{CourierError, CourierResult};

use crate::models::conversation::{Conversation, ConversationType};
use crate::models::contact::Contact;

/// A conversation joined with its resolved member contacts.
///
/// Derived on every query, never persisted. A conversation with no resolved
/// members still yields exactly one item with an empty member list.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationListItem {
    pub conversation: Conversation,
    pub members: Vec<Contact>,
}

/// Load one window of conversation-list items.
///
/// Conversations are ordered by id, which is stable for a given snapshot of
/// the store; the window is re-evaluated on every call rather than holding a
/// live cursor, so writers may interleave freely between calls.
///
/// `exclude_type` filters out a conversation kind entirely (the UI excludes
/// the self-conversation from the list).
pub fn conversation_list_items(
    conn: &Connection,
    offset: i64,
    limit: i64,
    exclude_type: Option<ConversationType>,
) -> CourierResult<Vec<ConversationListItem>> {
    let conversations = match exclude_type {
        Some(t) => {
            let mut stmt = conn
                .prepare(
                    "SELECT * FROM conversations WHERE conv_type != ?1
                     ORDER BY id LIMIT ?2 OFFSET ?3",
                )
                .map_err(|e| CourierError::Database(e.to_string()))?;
            let rows = stmt
                .query_map(
                    rusqlite::params![t.code(), limit, offset],
                    Conversation::from_row,
                )
                .map_err(|e| CourierError::Database(e.to_string()))?;
            rows.filter_map(|r| r.ok()).collect::<Vec<_>>()
        }
        None => {
            let mut stmt = conn
                .prepare("SELECT * FROM conversations ORDER BY id LIMIT ?1 OFFSET ?2")
                .map_err(|e| CourierError::Database(e.to_string()))?;
            let rows = stmt
                .query_map(rusqlite::params![limit, offset], Conversation::from_row)
                .map_err(|e| CourierError::Database(e.to_string()))?;
            rows.filter_map(|r| r.ok()).collect::<Vec<_>>()
        }
    };

    if conversations.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<String> = conversations.iter().map(|c| c.id.clone()).collect();
    let mut members_map = batch_load_members_with_contacts(conn, &ids)?;

    Ok(conversations
        .into_iter()
        .map(|conversation| {
            let members = members_map.remove(&conversation.id).unwrap_or_default();
            ConversationListItem {
                conversation,
                members,
            }
        })
        .collect())
}

/// Batch-load resolved member contacts for multiple conversations.
///
/// Performs a single query joining conversation_members -> contacts.
/// Membership rows whose contact has not been synced yet produce no member
/// (INNER JOIN); the owning conversation stays in the result of
/// `conversation_list_items` with whatever members did resolve.
fn batch_load_members_with_contacts(
    conn: &Connection,
    conversation_ids: &[String],
) -> CourierResult<HashMap<String, Vec<Contact>>> {
    if conversation_ids.is_empty() {
        return Ok(HashMap::new());
    }

    // Build a comma-separated placeholder list for the IN clause
    let placeholders: Vec<String> = (1..=conversation_ids.len()).map(|i| format!("?{i}")).collect();
    let in_clause = placeholders.join(",");

    let sql = format!(
        "SELECT m.conversation_id,
                ct.id AS ct_id,
                ct.name AS ct_name,
                ct.profile_picture_path AS ct_profile_picture_path
         FROM conversation_members m
         INNER JOIN contacts ct ON ct.id = m.contact_id
         WHERE m.conversation_id IN ({in_clause})
         ORDER BY ct.name"
    );

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| CourierError::Database(e.to_string()))?;

    let params: Vec<&dyn rusqlite::types::ToSql> = conversation_ids
        .iter()
        .map(|id| id as &dyn rusqlite::types::ToSql)
        .collect();

    let rows = stmt
        .query_map(params.as_slice(), |row| {
            let conversation_id: String = row.get("conversation_id")?;
            let contact = Contact {
                id: row.get("ct_id")?,
                name: row.get("ct_name")?,
                profile_picture_path: row.get("ct_profile_picture_path")?,
            };
            Ok((conversation_id, contact))
        })
        .map_err(|e| CourierError::Database(e.to_string()))?;

    let mut map: HashMap<String, Vec<Contact>> = HashMap::new();
    for row_result in rows {
        if let Ok((conversation_id, contact)) = row_result {
            map.entry(conversation_id).or_default().push(contact);
        }
    }

    Ok(map)
}

/// Get the total count of conversations, optionally excluding a type.
pub fn count_conversations(
    conn: &Connection,
    exclude_type: Option<ConversationType>,
) -> CourierResult<i64> {
    match exclude_type {
        Some(t) => conn
            .query_row(
                "SELECT COUNT(*) FROM conversations WHERE conv_type != ?1",
                [t.code()],
                |row| row.get(0),
            )
            .map_err(|e| CourierError::Database(e.to_string())),
        None => conn
            .query_row("SELECT COUNT(*) FROM conversations", [], |row| row.get(0))
            .map_err(|e| CourierError::Database(e.to_string())),
    }
}

/// Load the contacts matching the given ids, in name order.
///
/// Ids with no stored contact are silently absent from the result.
pub fn contacts_by_ids(conn: &Connection, ids: &[String]) -> CourierResult<Vec<Contact>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders: Vec<String> = (1..=ids.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "SELECT * FROM contacts WHERE id IN ({}) ORDER BY name",
        placeholders.join(",")
    );

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| CourierError::Database(e.to_string()))?;

    let params: Vec<&dyn rusqlite::types::ToSql> =
        ids.iter().map(|id| id as &dyn rusqlite::types::ToSql).collect();

    let contacts = stmt
        .query_map(params.as_slice(), Contact::from_row)
        .map_err(|e| CourierError::Database(e.to_string()))?
        .filter_map(|r| r.ok())
        .collect();

    Ok(contacts)
}
