//! Sync command: refresh conversations (and contacts) from the backend.

use console::style;

use courier_core::config::ConfigHandle;
use courier_core::error::CourierResult;
use courier_services::{ContactService, ConversationListService, EventBus};

pub async fn run(config: ConfigHandle, sync_contacts: bool, full: bool) -> CourierResult<()> {
    let db = super::init_database(&config).await?;
    let bus = EventBus::new(64);
    let api = super::create_authenticated_client(&config, &db, &bus).await?;

    let list_service = ConversationListService::new(db.clone(), bus.clone());

    let (cursor, batch_size) = {
        let guard = config.read().await;
        let cursor = if full || guard.sync.last_conversation_id.is_empty() {
            None
        } else {
            Some(guard.sync.last_conversation_id.clone())
        };
        (cursor, guard.sync.conversation_batch_size)
    };

    println!(
        "  {} Fetching conversations from backend...",
        style("...").dim()
    );
    let outcome = list_service
        .refresh_all(&api, cursor.as_deref(), batch_size)
        .await?;
    println!(
        "  {} Synced {} conversation(s).",
        style("OK").green().bold(),
        outcome.persisted
    );

    // Remember where the backend walk ended for the next incremental sync
    if let Some(last_id) = outcome.last_conversation_id {
        let mut guard = config.write().await;
        guard.sync.last_conversation_id = last_id;
    }
    config.save().await?;

    let contacts_wanted =
        sync_contacts || config.read().await.sync.sync_contacts_automatically;
    if contacts_wanted {
        println!("  {} Fetching contacts from backend...", style("...").dim());
        let contact_service = ContactService::new(db, bus);
        let count = contact_service.sync_contacts(&api).await?;
        println!(
            "  {} Synced {} contact(s).",
            style("OK").green().bold(),
            count
        );
    }

    Ok(())
}
