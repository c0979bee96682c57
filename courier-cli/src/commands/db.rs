//! Database management commands.

use clap::Subcommand;
use console::style;
use dialoguer::Confirm;

use courier_core::config::ConfigHandle;
use courier_core::error::CourierResult;
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum DbAction {
    /// Show database statistics (row counts per table).
    Stats,
    /// Run a SQLite integrity check.
    Check,
    /// Drop and recreate all tables.
    Reset {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

pub async fn run(config: ConfigHandle, action: DbAction, format: OutputFormat) -> CourierResult<()> {
    let db = super::init_database(&config).await?;

    match action {
        DbAction::Stats => {
            let stats = db.stats()?;
            match format {
                OutputFormat::Json => {
                    let json = serde_json::json!({
                        "conversations": stats.conversations,
                        "members": stats.members,
                        "contacts": stats.contacts,
                        "sessions": stats.sessions,
                    });
                    println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
                }
                OutputFormat::Text => {
                    println!("{stats}");
                }
            }
        }
        DbAction::Check => {
            db.run_integrity_check()?;
            println!("  {} Integrity check passed.", style("OK").green().bold());
        }
        DbAction::Reset { yes } => {
            let confirmed = yes
                || Confirm::new()
                    .with_prompt("This deletes all local data. Continue?")
                    .default(false)
                    .interact()
                    .map_err(|e| courier_core::error::CourierError::Internal(e.to_string()))?;

            if confirmed {
                db.reset()?;
                println!("  {} Database reset.", style("OK").green().bold());
            } else {
                println!("Aborted.");
            }
        }
    }

    Ok(())
}
