//! Session entity model.
//!
//! Stores the tokens handed back by the backend at login/registration.
//! At most one session carries the `is_current` flag; token refresh itself
//! is the backend client's concern and never happens here.

use serde::{Deserialize, Serialize};
use rusqlite::{params, Connection, Row};
use courier_core::error::{CourierError, CourierResult};

/// An authenticated session for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Backend user identifier.
    pub user_id: String,
    /// Bearer access token.
    pub access_token: String,
    /// Token type, normally "Bearer".
    pub token_type: String,
    /// Refresh token (opaque to the client).
    pub refresh_token: String,
    /// Whether this is the active session.
    pub is_current: bool,
}

impl Session {
    /// Construct a Session from a database row.
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get("user_id")?,
            access_token: row.get("access_token")?,
            token_type: row.get("token_type")?,
            refresh_token: row.get("refresh_token")?,
            is_current: row.get::<_, i32>("is_current")? != 0,
        })
    }

    /// Save this session. When `current` is true, the current flag is moved
    /// to this session atomically with respect to the connection.
    pub fn save(&self, conn: &Connection, current: bool) -> CourierResult<()> {
        if current {
            conn.execute("UPDATE sessions SET is_current = 0", [])
                .map_err(|e| CourierError::Database(e.to_string()))?;
        }

        conn.execute(
            "INSERT OR REPLACE INTO sessions
                (user_id, access_token, token_type, refresh_token, is_current)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                self.user_id,
                self.access_token,
                self.token_type,
                self.refresh_token,
                current as i32,
            ],
        )
        .map_err(|e| CourierError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get the current session, if any.
    pub fn current(conn: &Connection) -> CourierResult<Option<Self>> {
        match conn.query_row(
            "SELECT * FROM sessions WHERE is_current = 1 LIMIT 1",
            [],
            Self::from_row,
        ) {
            Ok(s) => Ok(Some(s)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(CourierError::Database(e.to_string())),
        }
    }

    /// Find the stored session for a specific user.
    pub fn find_by_user(conn: &Connection, user_id: &str) -> CourierResult<Option<Self>> {
        match conn.query_row(
            "SELECT * FROM sessions WHERE user_id = ?1",
            [user_id],
            Self::from_row,
        ) {
            Ok(s) => Ok(Some(s)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(CourierError::Database(e.to_string())),
        }
    }

    /// Move the current flag to the given user's session.
    pub fn set_current(conn: &Connection, user_id: &str) -> CourierResult<()> {
        if Self::find_by_user(conn, user_id)?.is_none() {
            return Err(CourierError::SessionNotFound(user_id.to_string()));
        }
        conn.execute("UPDATE sessions SET is_current = 0", [])
            .map_err(|e| CourierError::Database(e.to_string()))?;
        conn.execute(
            "UPDATE sessions SET is_current = 1 WHERE user_id = ?1",
            [user_id],
        )
        .map_err(|e| CourierError::Database(e.to_string()))?;
        Ok(())
    }

    /// Clear the current flag on all sessions (logout without forgetting).
    pub fn clear_current(conn: &Connection) -> CourierResult<()> {
        conn.execute("UPDATE sessions SET is_current = 0", [])
            .map_err(|e| CourierError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a user's session entirely.
    pub fn delete(conn: &Connection, user_id: &str) -> CourierResult<bool> {
        let changed = conn
            .execute("DELETE FROM sessions WHERE user_id = ?1", [user_id])
            .map_err(|e| CourierError::Database(e.to_string()))?;
        Ok(changed > 0)
    }
}
