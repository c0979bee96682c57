//! Courier Services - Business logic and service layer.
//!
//! This crate provides the service trait and all concrete service
//! implementations covering:
//! - Conversation list aggregation (windowed paging over the local mirror,
//!   remote batch refresh with out-of-band failure reporting)
//! - Current-conversation tracking (single-slot, last-write-wins)
//! - Contact sync (full replace from the backend listing)
//! - Session management (registration flow, login/logout, token install)
//! - Notification presentation (suppressed for the open conversation)
//! - Event bus (typed intra-service communication)

pub mod service;
pub mod event_bus;
pub mod conversation_list;
pub mod current_conversation;
pub mod contact;
pub mod session;
pub mod notification;

// Re-export key types
pub use service::{Service, ServiceState};
pub use event_bus::{AppEvent, EventBus};
pub use conversation_list::{ConversationListService, ConversationPager, RefreshOutcome};
pub use current_conversation::CurrentConversationCache;
pub use contact::ContactService;
pub use session::SessionService;
pub use notification::NotificationPresenter;
