//! Conversation endpoints.

use courier_core::error::CourierResult;
use crate::client::ApiClient;
use crate::response::ConversationsPage;

/// Query parameters for a conversation batch fetch.
#[derive(Debug, Clone)]
pub struct ConversationsQuery {
    /// Id of the last conversation already seen; the page starts after it.
    /// `None` fetches from the beginning.
    pub start: Option<String>,
    /// Maximum number of conversations to return.
    pub size: u32,
}

impl Default for ConversationsQuery {
    fn default() -> Self {
        Self {
            start: None,
            size: courier_core::constants::DEFAULT_CONVERSATION_BATCH_SIZE,
        }
    }
}

impl ApiClient {
    /// Fetch one batch of conversations by cursor (last-seen id) and size.
    pub async fn conversations_batch(
        &self,
        query: &ConversationsQuery,
    ) -> CourierResult<ConversationsPage> {
        let path = match query.start {
            Some(ref start) => format!("/conversations?size={}&start={start}", query.size),
            None => format!("/conversations?size={}", query.size),
        };
        self.get_json(&path).await
    }

    /// Delete a conversation on the backend.
    pub async fn delete_conversation(&self, id: &str) -> CourierResult<()> {
        self.delete(&format!("/conversations/{id}")).await?;
        Ok(())
    }
}
