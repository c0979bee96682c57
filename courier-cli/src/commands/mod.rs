//! CLI command implementations.

pub mod auth;
pub mod status;
pub mod sync;
pub mod list;
pub mod contacts;
pub mod db;

use courier_core::config::ConfigHandle;
use courier_core::error::CourierResult;
use courier_api::ApiClient;
use courier_models::Database;
use courier_services::{EventBus, SessionService};

/// Helper to initialize the database from config.
pub async fn init_database(config: &ConfigHandle) -> CourierResult<Database> {
    let guard = config.read().await;
    let db_path = guard.effective_db_path()?;
    let db_config = guard.database.clone();
    drop(guard);
    Database::init(&db_path, &db_config)
}

/// Helper to create an API client from config.
pub async fn create_api_client(config: &ConfigHandle) -> CourierResult<ApiClient> {
    let backend_config = config.read().await.backend.clone();
    ApiClient::new(&backend_config)
}

/// Helper to create an API client with the stored session's token installed.
pub async fn create_authenticated_client(
    config: &ConfigHandle,
    database: &Database,
    event_bus: &EventBus,
) -> CourierResult<ApiClient> {
    let api = create_api_client(config).await?;
    let sessions = SessionService::new(database.clone(), event_bus.clone());
    sessions.restore(&api).await?;
    Ok(api)
}

/// Truncate a string to a maximum length, appending an ellipsis if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        format!("{}...", &s[..max_len - 3])
    } else {
        s[..max_len].to_string()
    }
}
