//! Conversation list aggregation: local paging plus remote batch refresh.
//!
//! The list is served from the local mirror as a lazy, restartable paged
//! sequence. Remote refreshes persist fetched batches into the mirror and
//! report failures out-of-band on the event bus, so a dead backend never
//! interrupts paging over locally available data.

use tracing::{info, warn, debug};

use courier_core::error::{CourierError, CourierResult};
use courier_models::{Database, Conversation, ConversationMember, ConversationType};
use courier_models::queries::{self, ConversationListItem};
use courier_api::ApiClient;
use courier_api::endpoints::conversations::ConversationsQuery;
use courier_api::response::ConversationsPage;

use crate::event_bus::{AppEvent, EventBus};
use crate::service::{Service, ServiceState};

/// Lazy, restartable pager over conversation-list items.
///
/// Each `next_page` call re-queries its window against the store instead of
/// holding a live cursor, so writes interleaved between calls are tolerated:
/// the next window simply reflects the store as it is then. Ordering is by
/// conversation id, stable for a given snapshot.
pub struct ConversationPager {
    database: Database,
    page_size: i64,
    next_offset: i64,
    exclude_type: Option<ConversationType>,
}

impl ConversationPager {
    fn new(database: Database, page_size: i64, exclude_type: Option<ConversationType>) -> Self {
        Self {
            database,
            page_size,
            next_offset: 0,
            exclude_type,
        }
    }

    /// The configured page size.
    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Load the next window of items. An empty result means the end of the
    /// list as of this call; the pager stays usable and a later call will
    /// pick up rows written in the meantime.
    pub fn next_page(&mut self) -> CourierResult<Vec<ConversationListItem>> {
        let conn = self.database.conn()?;
        let items = queries::conversation_list_items(
            &conn,
            self.next_offset,
            self.page_size,
            self.exclude_type,
        )?;
        self.next_offset += items.len() as i64;
        Ok(items)
    }

    /// Restart the sequence from the first window.
    pub fn reset(&mut self) {
        self.next_offset = 0;
    }
}

/// Summary of a remote refresh.
#[derive(Debug, Clone, Default)]
pub struct RefreshOutcome {
    /// Conversations persisted (including overwrites of existing rows).
    pub persisted: usize,
    /// Whether the backend reports more conversations after this batch.
    pub has_more: bool,
    /// Id of the last conversation in the final batch, the cursor for the
    /// next refresh.
    pub last_conversation_id: Option<String>,
}

impl std::fmt::Display for RefreshOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "persisted={}, has_more={}, last_id={}",
            self.persisted,
            self.has_more,
            self.last_conversation_id.as_deref().unwrap_or("-")
        )
    }
}

/// Service producing the paged conversation list and refreshing it from the
/// backend.
pub struct ConversationListService {
    state: ServiceState,
    database: Database,
    event_bus: EventBus,
}

impl ConversationListService {
    /// Create a new ConversationListService.
    pub fn new(database: Database, event_bus: EventBus) -> Self {
        Self {
            state: ServiceState::Created,
            database,
            event_bus,
        }
    }

    /// Paged sequence of list items, excluding the self-conversation.
    pub fn list(&self, page_size: i64) -> ConversationPager {
        ConversationPager::new(
            self.database.clone(),
            page_size,
            Some(ConversationType::SelfConversation),
        )
    }

    /// Paged sequence of list items over every conversation type.
    pub fn list_all(&self, page_size: i64) -> ConversationPager {
        ConversationPager::new(self.database.clone(), page_size, None)
    }

    /// Fetch one batch of conversations from the backend and persist it.
    ///
    /// On remote failure the error is broadcast as
    /// `ConversationRefreshFailed` (out-of-band for pager consumers) and
    /// returned to the caller. Locally persisted data is never touched by a
    /// failure, so in-progress paging keeps serving it.
    pub async fn refresh_batch(
        &self,
        api: &ApiClient,
        after_id: Option<&str>,
        size: u32,
    ) -> CourierResult<RefreshOutcome> {
        let query = ConversationsQuery {
            start: after_id.map(String::from),
            size,
        };

        let page = match api.conversations_batch(&query).await {
            Ok(page) => page,
            Err(e) => {
                warn!("conversation batch fetch failed: {e}");
                self.event_bus.emit(AppEvent::ConversationRefreshFailed {
                    error: e.to_string(),
                });
                return Err(e);
            }
        };

        let outcome = self.persist_batch(&page)?;
        debug!("refreshed conversation batch: {outcome}");

        if outcome.persisted > 0 {
            self.event_bus.emit(AppEvent::ConversationsUpdated {
                count: outcome.persisted,
            });
        }

        Ok(outcome)
    }

    /// Follow `has_more` until the backend is exhausted, starting after the
    /// given cursor. Returns the aggregate outcome; the first failure ends
    /// the walk but leaves every previously persisted batch in place.
    pub async fn refresh_all(
        &self,
        api: &ApiClient,
        after_id: Option<&str>,
        size: u32,
    ) -> CourierResult<RefreshOutcome> {
        let mut total = RefreshOutcome {
            last_conversation_id: after_id.map(String::from),
            ..RefreshOutcome::default()
        };

        loop {
            let batch = self
                .refresh_batch(api, total.last_conversation_id.as_deref(), size)
                .await?;

            total.persisted += batch.persisted;
            total.has_more = batch.has_more;
            if batch.last_conversation_id.is_some() {
                total.last_conversation_id = batch.last_conversation_id;
            }

            if !batch.has_more || batch.persisted == 0 {
                break;
            }
        }

        info!("conversation refresh complete: {total}");
        Ok(total)
    }

    /// Persist one fetched batch into the local mirror.
    ///
    /// Conversations use replace semantics: a duplicate id overwrites the
    /// prior row (last write wins), and its membership set is rewritten to
    /// the batch's member list.
    pub fn persist_batch(&self, page: &ConversationsPage) -> CourierResult<RefreshOutcome> {
        let mut outcome = RefreshOutcome {
            has_more: page.has_more,
            ..RefreshOutcome::default()
        };

        self.database.transaction(|conn| {
            for response in &page.conversations {
                let mut conversation = Conversation::new(
                    &response.id,
                    response.name.as_deref().unwrap_or(""),
                    ConversationType::from_code(response.conv_type),
                );
                conversation.save(conn)?;

                let members: Vec<ConversationMember> = response
                    .members
                    .iter()
                    .map(|m| ConversationMember::new(&response.id, &m.id))
                    .collect();
                ConversationMember::save_all(conn, &members)?;

                outcome.persisted += 1;
                outcome.last_conversation_id = Some(response.id.clone());
            }
            Ok(())
        })?;

        Ok(outcome)
    }

    /// Contact ids of a conversation's members, resolved or not.
    pub fn member_ids(&self, conversation_id: &str) -> CourierResult<Vec<String>> {
        let conn = self.database.conn()?;
        if Conversation::find_by_id(&conn, conversation_id)?.is_none() {
            return Err(CourierError::ConversationNotFound(
                conversation_id.to_string(),
            ));
        }
        ConversationMember::contact_ids_for_conversation(&conn, conversation_id)
    }

    /// Total number of listed conversations (self-conversation excluded).
    pub fn count(&self) -> CourierResult<i64> {
        let conn = self.database.conn()?;
        queries::count_conversations(&conn, Some(ConversationType::SelfConversation))
    }

    /// Remove a conversation from the local mirror.
    pub fn delete_conversation(&self, conversation_id: &str) -> CourierResult<bool> {
        let conn = self.database.conn()?;
        let deleted = Conversation::delete(&conn, conversation_id)?;
        if deleted {
            info!("deleted conversation: {conversation_id}");
        }
        Ok(deleted)
    }
}

impl Service for ConversationListService {
    fn name(&self) -> &str { "conversation_list" }
    fn state(&self) -> ServiceState { self.state }
    fn init(&mut self) -> CourierResult<()> {
        self.state = ServiceState::Running;
        info!("conversation list service initialized");
        Ok(())
    }
    fn shutdown(&mut self) -> CourierResult<()> {
        self.state = ServiceState::Stopped;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_api::response::{ConversationMemberResponse, ConversationResponse};
    use courier_models::Contact;

    fn create_test_db() -> Database {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("test.db");
        let config = courier_core::config::DatabaseConfig::default();
        let db = Database::init(&path, &config).unwrap();
        std::mem::forget(dir);
        db
    }

    fn service() -> (ConversationListService, Database, EventBus) {
        let db = create_test_db();
        let bus = EventBus::new(16);
        let svc = ConversationListService::new(db.clone(), bus.clone());
        (svc, db, bus)
    }

    fn response(id: &str, name: &str, conv_type: i32, member_ids: &[&str]) -> ConversationResponse {
        ConversationResponse {
            id: id.into(),
            name: Some(name.into()),
            conv_type,
            members: member_ids
                .iter()
                .map(|m| ConversationMemberResponse { id: (*m).into() })
                .collect(),
        }
    }

    #[test]
    fn test_persist_batch_and_page() {
        let (svc, _db, _bus) = service();

        let page = ConversationsPage {
            conversations: vec![
                response("c1", "Conversation 1", 0, &["u1"]),
                response("c2", "Conversation 2", 2, &[]),
            ],
            has_more: false,
        };
        let outcome = svc.persist_batch(&page).unwrap();
        assert_eq!(outcome.persisted, 2);
        assert_eq!(outcome.last_conversation_id.as_deref(), Some("c2"));

        let mut pager = svc.list(10);
        let items = pager.next_page().unwrap();
        assert_eq!(items.len(), 2);
        // Member u1 has no synced contact yet, so c1 resolves no members
        assert!(items[0].members.is_empty());
    }

    #[test]
    fn test_duplicate_remote_id_overwrites() {
        let (svc, db, _bus) = service();

        svc.persist_batch(&ConversationsPage {
            conversations: vec![response("c1", "Old Name", 0, &["u1", "u2"])],
            has_more: false,
        })
        .unwrap();

        svc.persist_batch(&ConversationsPage {
            conversations: vec![response("c1", "New Name", 0, &["u3"])],
            has_more: false,
        })
        .unwrap();

        let conn = db.conn().unwrap();
        let conv = Conversation::find_by_id(&conn, "c1").unwrap().unwrap();
        assert_eq!(conv.name, "New Name");

        // Membership was rewritten to the latest batch
        let ids = ConversationMember::contact_ids_for_conversation(&conn, "c1").unwrap();
        assert_eq!(ids, vec!["u3".to_string()]);
    }

    #[test]
    fn test_pager_windows_and_reset() {
        let (svc, _db, _bus) = service();

        let conversations: Vec<ConversationResponse> = (0..5)
            .map(|i| response(&format!("c{i}"), &format!("Conversation {i}"), 0, &[]))
            .collect();
        svc.persist_batch(&ConversationsPage {
            conversations,
            has_more: false,
        })
        .unwrap();

        let mut pager = svc.list(2);
        assert_eq!(pager.next_page().unwrap().len(), 2);
        assert_eq!(pager.next_page().unwrap().len(), 2);
        assert_eq!(pager.next_page().unwrap().len(), 1);
        assert!(pager.next_page().unwrap().is_empty());

        pager.reset();
        let first = pager.next_page().unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].conversation.id, "c0");
    }

    #[test]
    fn test_pager_tolerates_concurrent_writes() {
        let (svc, _db, _bus) = service();

        svc.persist_batch(&ConversationsPage {
            conversations: vec![response("a", "A", 0, &[]), response("b", "B", 0, &[])],
            has_more: false,
        })
        .unwrap();

        let mut pager = svc.list(2);
        assert_eq!(pager.next_page().unwrap().len(), 2);

        // A writer lands a new row while the pager is mid-sequence
        svc.persist_batch(&ConversationsPage {
            conversations: vec![response("z", "Z", 0, &[])],
            has_more: false,
        })
        .unwrap();

        let next = pager.next_page().unwrap();
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].conversation.id, "z");
    }

    #[test]
    fn test_list_excludes_self_conversation() {
        let (svc, _db, _bus) = service();

        svc.persist_batch(&ConversationsPage {
            conversations: vec![response("me", "Notes", 1, &[]), response("t", "Team", 0, &[])],
            has_more: false,
        })
        .unwrap();

        let mut pager = svc.list(10);
        let items = pager.next_page().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].conversation.id, "t");

        let mut all = svc.list_all(10);
        assert_eq!(all.next_page().unwrap().len(), 2);
        assert_eq!(svc.count().unwrap(), 1);
    }

    #[test]
    fn test_members_resolve_after_contact_sync() {
        let (svc, db, _bus) = service();

        svc.persist_batch(&ConversationsPage {
            conversations: vec![response("c1", "Team", 0, &["u1", "u2"])],
            has_more: false,
        })
        .unwrap();

        {
            let conn = db.conn().unwrap();
            Contact::new("u1", "Alice").save(&conn).unwrap();
            Contact::new("u2", "Bob").save(&conn).unwrap();
        }

        let mut pager = svc.list(10);
        let items = pager.next_page().unwrap();
        let mut names: Vec<&str> = items[0].members.iter().map(|m| m.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_member_ids() {
        let (svc, _db, _bus) = service();

        svc.persist_batch(&ConversationsPage {
            conversations: vec![response("c1", "Team", 0, &["u1", "u2"])],
            has_more: false,
        })
        .unwrap();

        let ids = svc.member_ids("c1").unwrap();
        assert_eq!(ids, vec!["u1".to_string(), "u2".to_string()]);

        assert!(matches!(
            svc.member_ids("missing"),
            Err(CourierError::ConversationNotFound(_))
        ));
    }

    #[test]
    fn test_delete_conversation() {
        let (svc, _db, _bus) = service();

        svc.persist_batch(&ConversationsPage {
            conversations: vec![response("c1", "Team", 0, &["u1"])],
            has_more: false,
        })
        .unwrap();

        assert!(svc.delete_conversation("c1").unwrap());
        assert!(!svc.delete_conversation("c1").unwrap());
        assert_eq!(svc.count().unwrap(), 0);
    }
}
