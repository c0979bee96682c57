//! Status command: backend, session, and database overview.

use console::style;

use courier_core::config::ConfigHandle;
use courier_core::error::CourierResult;
use courier_services::{EventBus, SessionService};
use crate::OutputFormat;

pub async fn run(config: ConfigHandle, format: OutputFormat) -> CourierResult<()> {
    let db = super::init_database(&config).await?;
    let sessions = SessionService::new(db.clone(), EventBus::new(16));

    let guard = config.read().await;
    let backend_address = guard.backend.address.clone();
    let backend_configured = guard.is_backend_configured();
    drop(guard);

    let current = sessions.current_session()?;
    let stats = db.stats()?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "backend": {
                    "address": backend_address,
                    "configured": backend_configured,
                },
                "session": current.as_ref().map(|s| s.user_id.clone()),
                "database": {
                    "conversations": stats.conversations,
                    "members": stats.members,
                    "contacts": stats.contacts,
                    "sessions": stats.sessions,
                },
            });
            println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        }
        OutputFormat::Text => {
            println!("{}", style("Courier status").bold());
            println!();

            if backend_configured {
                println!("  Backend:  {backend_address}");
            } else {
                println!(
                    "  Backend:  {} (set backend.address in the config file)",
                    style("not configured").yellow()
                );
            }

            match current {
                Some(session) => {
                    println!("  Session:  logged in as {}", style(&session.user_id).green())
                }
                None => println!("  Session:  {}", style("logged out").dim()),
            }

            println!("  Database: {stats}");
        }
    }

    Ok(())
}
