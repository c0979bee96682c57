//! Typed event bus for intra-service communication.
//!
//! Uses tokio broadcast channels to decouple services from one another.
//! Any service can emit events without knowing who is listening, and any
//! number of subscribers can independently consume events.

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

/// All application-level event types that flow through the event bus.
///
/// These represent processed, application-meaningful state changes that
/// other services care about, not raw backend payloads.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Conversations were persisted from a remote batch.
    ConversationsUpdated {
        count: usize,
    },
    /// A remote conversation batch fetch failed. Delivered alongside, never
    /// instead of, locally available paged data.
    ConversationRefreshFailed {
        error: String,
    },
    /// The contact mirror was refreshed.
    ContactsUpdated {
        count: usize,
    },
    /// The current session changed (login, logout, account switch).
    SessionChanged {
        user_id: Option<String>,
    },
    /// An incoming message was delivered by the backend push channel.
    MessageReceived {
        conversation_id: String,
        sender_name: String,
        preview: String,
    },
    /// A desktop notification was posted.
    NotificationPosted {
        conversation_id: String,
    },
}

/// Application-wide event bus backed by a tokio broadcast channel.
///
/// Designed for fan-out delivery: every subscriber gets every event.
/// Slow subscribers that fall behind will receive a `Lagged` error
/// and may miss events, which is acceptable for UI-driven consumers.
#[derive(Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<AppEvent>>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity.
    ///
    /// A capacity of 256 is recommended. Events beyond this limit will
    /// cause slow subscribers to lag and miss events.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Subscribe to receive application events.
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Emit an event to all subscribers.
    pub fn emit(&self, event: AppEvent) {
        let label = event_label(&event);
        match self.sender.send(event) {
            Ok(count) => {
                debug!("event_bus: emitted {label} to {count} subscriber(s)");
            }
            Err(_) => {
                debug!("event_bus: no subscribers for {label}");
            }
        }
    }

    /// Get the current number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Human-readable label for an event (for logging).
fn event_label(event: &AppEvent) -> &'static str {
    match event {
        AppEvent::ConversationsUpdated { .. } => "ConversationsUpdated",
        AppEvent::ConversationRefreshFailed { .. } => "ConversationRefreshFailed",
        AppEvent::ContactsUpdated { .. } => "ContactsUpdated",
        AppEvent::SessionChanged { .. } => "SessionChanged",
        AppEvent::MessageReceived { .. } => "MessageReceived",
        AppEvent::NotificationPosted { .. } => "NotificationPosted",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus_emit_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.emit(AppEvent::ConversationsUpdated { count: 3 });

        let event = rx.recv().await.unwrap();
        match event {
            AppEvent::ConversationsUpdated { count } => assert_eq!(count, 3),
            _ => panic!("unexpected event type"),
        }
    }

    #[tokio::test]
    async fn test_event_bus_multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        assert_eq!(bus.subscriber_count(), 2);

        bus.emit(AppEvent::ContactsUpdated { count: 42 });

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();

        match (e1, e2) {
            (AppEvent::ContactsUpdated { count: c1 }, AppEvent::ContactsUpdated { count: c2 }) => {
                assert_eq!(c1, 42);
                assert_eq!(c2, 42);
            }
            _ => panic!("unexpected event types"),
        }
    }

    #[tokio::test]
    async fn test_event_bus_no_subscribers() {
        let bus = EventBus::new(16);
        // Should not panic even with no subscribers
        bus.emit(AppEvent::ConversationRefreshFailed {
            error: "http error: connection refused".into(),
        });
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_event_labels() {
        assert_eq!(
            event_label(&AppEvent::MessageReceived {
                conversation_id: String::new(),
                sender_name: String::new(),
                preview: String::new(),
            }),
            "MessageReceived"
        );
        assert_eq!(
            event_label(&AppEvent::SessionChanged { user_id: None }),
            "SessionChanged"
        );
    }
}
