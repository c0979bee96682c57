//! Current-conversation tracking.
//!
//! A process-wide, single-slot cache recording which conversation, if any,
//! is currently visible to the user. The conversation screen sets it on
//! becoming active and clears it on becoming inactive; message senders and
//! the notification presenter read it to answer "am I looking at
//! conversation X".

use std::sync::{Arc, RwLock};
use tracing::debug;

/// Single-slot, last-write-wins cache of the open conversation id.
///
/// Writers are UI-lifecycle callbacks, so there is deliberately no
/// compare-and-swap and no ordering guarantee across concurrent callers:
/// the last caller wins. Updating with the id already stored is a no-op
/// observationally.
#[derive(Clone, Default)]
pub struct CurrentConversationCache {
    slot: Arc<RwLock<Option<String>>>,
}

impl CurrentConversationCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The last-set conversation id, or `None` when no conversation is open.
    pub fn current(&self) -> Option<String> {
        self.slot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Overwrite the slot unconditionally with the given id.
    pub fn update(&self, conversation_id: impl Into<String>) {
        let id = conversation_id.into();
        debug!("current conversation -> {id}");
        *self
            .slot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(id);
    }

    /// Empty the slot (conversation screen went inactive).
    pub fn clear(&self) {
        debug!("current conversation cleared");
        *self
            .slot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }

    /// Whether the given conversation is the one currently open.
    pub fn is_current(&self, conversation_id: &str) -> bool {
        self.slot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_deref()
            == Some(conversation_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let cache = CurrentConversationCache::new();
        assert!(cache.current().is_none());
        assert!(!cache.is_current("c1"));
    }

    #[test]
    fn test_update_and_clear() {
        let cache = CurrentConversationCache::new();
        cache.update("c1");
        assert_eq!(cache.current().as_deref(), Some("c1"));
        assert!(cache.is_current("c1"));

        cache.clear();
        assert!(cache.current().is_none());
    }

    #[test]
    fn test_update_is_idempotent() {
        let cache = CurrentConversationCache::new();
        cache.update("c1");
        let once = cache.current();
        cache.update("c1");
        assert_eq!(cache.current(), once);
    }

    #[test]
    fn test_last_write_wins() {
        let cache = CurrentConversationCache::new();
        cache.update("c1");
        cache.update("c2");
        assert_eq!(cache.current().as_deref(), Some("c2"));
        assert!(!cache.is_current("c1"));
    }

    #[test]
    fn test_clones_share_the_slot() {
        let cache = CurrentConversationCache::new();
        let reader = cache.clone();
        cache.update("c1");
        assert!(reader.is_current("c1"));
    }
}
