//! Contact entity model.
//!
//! Contacts are synced from the backend independently of conversations:
//! a membership row may reference a contact id before (or without) the
//! contact itself ever arriving.

use serde::{Deserialize, Serialize};
use rusqlite::{params, Connection, Row};
use courier_core::error::{CourierError, CourierResult};

/// Represents a contact known to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Backend user identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Path to a locally cached profile picture, if downloaded.
    pub profile_picture_path: Option<String>,
}

impl Contact {
    /// Create a new contact.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            profile_picture_path: None,
        }
    }

    /// Construct a Contact from a database row.
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            profile_picture_path: row.get("profile_picture_path")?,
        })
    }

    // ─── Static finders ──────────────────────────────────────────────────

    /// Find a contact by its backend identifier.
    pub fn find_by_id(conn: &Connection, id: &str) -> CourierResult<Option<Self>> {
        match conn.query_row("SELECT * FROM contacts WHERE id = ?1", [id], Self::from_row) {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(CourierError::Database(e.to_string())),
        }
    }

    /// Load all contacts ordered by display name.
    pub fn all(conn: &Connection) -> CourierResult<Vec<Self>> {
        let mut stmt = conn
            .prepare("SELECT * FROM contacts ORDER BY name")
            .map_err(|e| CourierError::Database(e.to_string()))?;

        let contacts = stmt
            .query_map([], Self::from_row)
            .map_err(|e| CourierError::Database(e.to_string()))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(contacts)
    }

    /// Delete a contact by id. Returns true if a row was deleted.
    pub fn delete(conn: &Connection, id: &str) -> CourierResult<bool> {
        let changed = conn
            .execute("DELETE FROM contacts WHERE id = ?1", [id])
            .map_err(|e| CourierError::Database(e.to_string()))?;
        Ok(changed > 0)
    }

    /// Delete all contacts (used during full contact sync).
    pub fn delete_all(conn: &Connection) -> CourierResult<usize> {
        conn.execute("DELETE FROM contacts", [])
            .map_err(|e| CourierError::Database(e.to_string()))
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Save this contact with replace semantics (last write wins).
    pub fn save(&self, conn: &Connection) -> CourierResult<()> {
        conn.execute(
            "INSERT OR REPLACE INTO contacts (id, name, profile_picture_path)
             VALUES (?1, ?2, ?3)",
            params![self.id, self.name, self.profile_picture_path],
        )
        .map_err(|e| CourierError::Database(e.to_string()))?;
        Ok(())
    }

    /// Record the local path of a downloaded profile picture.
    pub fn set_profile_picture_path(
        conn: &Connection,
        id: &str,
        path: Option<&str>,
    ) -> CourierResult<bool> {
        let changed = conn
            .execute(
                "UPDATE contacts SET profile_picture_path = ?1 WHERE id = ?2",
                params![path, id],
            )
            .map_err(|e| CourierError::Database(e.to_string()))?;
        Ok(changed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::create_tables(&conn).unwrap();
        conn
    }

    #[test]
    fn test_save_and_find() {
        let conn = setup();
        Contact::new("u1", "Alice").save(&conn).unwrap();

        let found = Contact::find_by_id(&conn, "u1").unwrap().unwrap();
        assert_eq!(found.name, "Alice");
        assert!(found.profile_picture_path.is_none());
    }

    #[test]
    fn test_save_replaces_on_duplicate_id() {
        let conn = setup();
        Contact::new("u1", "Alice").save(&conn).unwrap();
        Contact::new("u1", "Alice Smith").save(&conn).unwrap();

        let all = Contact::all(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Alice Smith");
    }

    #[test]
    fn test_all_ordered_by_name() {
        let conn = setup();
        Contact::new("u2", "Bob").save(&conn).unwrap();
        Contact::new("u1", "Alice").save(&conn).unwrap();

        let all = Contact::all(&conn).unwrap();
        assert_eq!(all[0].name, "Alice");
        assert_eq!(all[1].name, "Bob");
    }

    #[test]
    fn test_profile_picture_path() {
        let conn = setup();
        Contact::new("u1", "Alice").save(&conn).unwrap();

        assert!(Contact::set_profile_picture_path(&conn, "u1", Some("/tmp/u1.jpg")).unwrap());
        let found = Contact::find_by_id(&conn, "u1").unwrap().unwrap();
        assert_eq!(found.profile_picture_path.as_deref(), Some("/tmp/u1.jpg"));

        assert!(Contact::set_profile_picture_path(&conn, "u1", None).unwrap());
        let found = Contact::find_by_id(&conn, "u1").unwrap().unwrap();
        assert!(found.profile_picture_path.is_none());
    }

    #[test]
    fn test_delete_all() {
        let conn = setup();
        Contact::new("u1", "Alice").save(&conn).unwrap();
        Contact::new("u2", "Bob").save(&conn).unwrap();

        assert_eq!(Contact::delete_all(&conn).unwrap(), 2);
        assert!(Contact::all(&conn).unwrap().is_empty());
    }
}
