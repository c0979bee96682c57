//! Backend response types.
//!
//! The backend returns plain JSON payloads; error responses share a common
//! body shape with a machine-readable label.

use serde::{Deserialize, Serialize};

/// Error body returned by the backend on non-2xx responses.
///
/// ```json
/// { "code": 403, "label": "invalid-credentials", "message": "Authentication failed." }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP-like status code echoed in the body.
    pub code: u16,
    /// Machine-readable error label.
    pub label: String,
    /// Human-readable message.
    pub message: String,
}

/// One page of conversations from a batch fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationsPage {
    pub conversations: Vec<ConversationResponse>,
    pub has_more: bool,
}

/// A conversation as reported by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationResponse {
    pub id: String,
    /// Display name; null/absent for unnamed one-to-one conversations.
    #[serde(default)]
    pub name: Option<String>,
    /// Conversation type code.
    #[serde(rename = "type", default = "default_conversation_type")]
    pub conv_type: i32,
    /// Member references (the requesting user excluded).
    #[serde(default)]
    pub members: Vec<ConversationMemberResponse>,
}

fn default_conversation_type() -> i32 {
    courier_core::constants::conversation_type::ONE_TO_ONE
}

/// A member reference inside a conversation payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMemberResponse {
    pub id: String,
}

/// A contact as reported by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactResponse {
    pub id: String,
    pub name: String,
    /// Asset key of the profile picture, if the contact has one.
    #[serde(default)]
    pub picture: Option<String>,
}

/// Session payload returned by login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user_id: String,
    pub access_token: String,
    pub token_type: String,
    pub refresh_token: String,
}

/// User payload returned by registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_parse() {
        let json = r#"{"code":403,"label":"invalid-credentials","message":"Authentication failed."}"#;
        let err: ErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(err.code, 403);
        assert_eq!(err.label, "invalid-credentials");
    }

    #[test]
    fn test_conversations_page_parse() {
        let json = r#"{
            "conversations": [
                {"id": "c1", "name": "Android Chapter", "type": 0,
                 "members": [{"id": "u1"}, {"id": "u2"}]},
                {"id": "c2", "type": 2, "members": []}
            ],
            "has_more": true
        }"#;
        let page: ConversationsPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.conversations.len(), 2);
        assert!(page.has_more);
        assert_eq!(page.conversations[0].members.len(), 2);
        // Absent name and defaulted type
        assert!(page.conversations[1].name.is_none());
        assert_eq!(page.conversations[1].conv_type, 2);
    }

    #[test]
    fn test_session_response_parse() {
        let json = r#"{
            "user_id": "u1",
            "access_token": "abc",
            "token_type": "Bearer",
            "refresh_token": "def"
        }"#;
        let session: SessionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(session.user_id, "u1");
        assert_eq!(session.token_type, "Bearer");
    }

    #[test]
    fn test_contact_response_parse() {
        let json = r#"{"id": "u1", "name": "Alice"}"#;
        let contact: ContactResponse = serde_json::from_str(json).unwrap();
        assert_eq!(contact.name, "Alice");
        assert!(contact.picture.is_none());
    }
}
