//! Notification presentation for incoming messages.
//!
//! The backend push channel hands processed message events to this
//! presenter; it decides whether to surface them as desktop notifications.
//! Messages for the conversation the user is currently looking at are
//! suppressed, as are all messages when notifications are disabled.

use tracing::{info, debug};

use courier_core::config::ConfigHandle;
use courier_core::error::{CourierError, CourierResult};

use crate::current_conversation::CurrentConversationCache;
use crate::event_bus::{AppEvent, EventBus};
use crate::service::{Service, ServiceState};

/// Presenter for incoming-message desktop notifications.
pub struct NotificationPresenter {
    state: ServiceState,
    config: ConfigHandle,
    current_conversation: CurrentConversationCache,
    event_bus: EventBus,
}

impl NotificationPresenter {
    /// Create a new NotificationPresenter.
    pub fn new(
        config: ConfigHandle,
        current_conversation: CurrentConversationCache,
        event_bus: EventBus,
    ) -> Self {
        Self {
            state: ServiceState::Created,
            config,
            current_conversation,
            event_bus,
        }
    }

    /// Whether a message in the given conversation should be surfaced.
    pub async fn should_notify(&self, conversation_id: &str) -> bool {
        let config = self.config.read().await;
        if !config.notifications.enabled {
            return false;
        }
        drop(config);

        // Never notify for the conversation the user is looking at
        !self.current_conversation.is_current(conversation_id)
    }

    /// Handle one incoming message. Returns true when a notification was
    /// posted, false when it was suppressed.
    pub async fn handle_message(
        &self,
        conversation_id: &str,
        sender_name: &str,
        preview: &str,
    ) -> CourierResult<bool> {
        if !self.should_notify(conversation_id).await {
            debug!("notification suppressed for conversation {conversation_id}");
            return Ok(false);
        }

        let body = {
            let config = self.config.read().await;
            if config.notifications.hide_message_preview {
                "New message".to_string()
            } else {
                preview.to_string()
            }
        };

        self.show_notification(sender_name, &body)?;
        self.event_bus.emit(AppEvent::NotificationPosted {
            conversation_id: conversation_id.to_string(),
        });
        Ok(true)
    }

    /// Handle an event from the bus, reacting to `MessageReceived`.
    pub async fn handle_event(&self, event: &AppEvent) -> CourierResult<()> {
        if let AppEvent::MessageReceived {
            conversation_id,
            sender_name,
            preview,
        } = event
        {
            self.handle_message(conversation_id, sender_name, preview)
                .await?;
        }
        Ok(())
    }

    /// Post a desktop notification.
    fn show_notification(&self, summary: &str, body: &str) -> CourierResult<()> {
        notify_rust::Notification::new()
            .summary(summary)
            .body(body)
            .appname(courier_core::constants::APP_NAME)
            .show()
            .map_err(|e| CourierError::Notification(e.to_string()))?;
        Ok(())
    }
}

impl Service for NotificationPresenter {
    fn name(&self) -> &str { "notification" }
    fn state(&self) -> ServiceState { self.state }
    fn init(&mut self) -> CourierResult<()> {
        self.state = ServiceState::Running;
        info!("notification presenter initialized");
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
    use courier_core::config::AppConfig;

    fn presenter(enabled: bool) -> (NotificationPresenter, CurrentConversationCache) {
        let mut config = AppConfig::default();
        config.notifications.enabled = enabled;
        let cache = CurrentConversationCache::new();
        let p = NotificationPresenter::new(
            ConfigHandle::new(config),
            cache.clone(),
            EventBus::new(16),
        );
        (p, cache)
    }

    #[tokio::test]
    async fn test_notifies_for_background_conversation() {
        let (p, cache) = presenter(true);
        cache.update("open-conv");
        assert!(p.should_notify("other-conv").await);
    }

    #[tokio::test]
    async fn test_suppressed_for_open_conversation() {
        let (p, cache) = presenter(true);
        cache.update("open-conv");
        assert!(!p.should_notify("open-conv").await);

        let posted = p.handle_message("open-conv", "Alice", "hi").await.unwrap();
        assert!(!posted);
    }

    #[tokio::test]
    async fn test_suppressed_when_disabled() {
        let (p, _cache) = presenter(false);
        assert!(!p.should_notify("any-conv").await);

        let posted = p.handle_message("any-conv", "Alice", "hi").await.unwrap();
        assert!(!posted);
    }

    #[tokio::test]
    async fn test_notifies_after_conversation_closed() {
        let (p, cache) = presenter(true);
        cache.update("conv");
        assert!(!p.should_notify("conv").await);
        cache.clear();
        assert!(p.should_notify("conv").await);
    }

    #[tokio::test]
    async fn test_ignores_unrelated_events() {
        let (p, _cache) = presenter(true);
        p.handle_event(&AppEvent::ContactsUpdated { count: 1 })
            .await
            .unwrap();
    }
}
