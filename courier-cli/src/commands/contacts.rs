//! Contact commands.

use clap::Subcommand;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use console::style;

use courier_core::config::ConfigHandle;
use courier_core::error::CourierResult;
use courier_services::{ContactService, EventBus};
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum ContactsAction {
    /// List all synced contacts.
    List {
        /// Maximum number of contacts to display.
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Sync contacts from the backend.
    Sync,
}

pub async fn run(
    config: ConfigHandle,
    action: ContactsAction,
    format: OutputFormat,
) -> CourierResult<()> {
    let db = super::init_database(&config).await?;
    let bus = EventBus::new(16);

    match action {
        ContactsAction::List { limit } => {
            let service = ContactService::new(db, bus);
            let contacts = service.all_contacts()?;

            let contacts_to_show: Vec<_> = if let Some(lim) = limit {
                contacts.into_iter().take(lim).collect()
            } else {
                contacts
            };

            match format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&contacts_to_show).unwrap_or_default()
                    );
                }
                OutputFormat::Text => {
                    if contacts_to_show.is_empty() {
                        println!("No contacts. Run `courier contacts sync` to fetch from the backend.");
                    } else {
                        let mut table = Table::new();
                        table
                            .load_preset(UTF8_FULL)
                            .apply_modifier(UTF8_ROUND_CORNERS)
                            .set_content_arrangement(ContentArrangement::Dynamic);

                        table.set_header(vec!["Id", "Name", "Picture"]);

                        for c in &contacts_to_show {
                            table.add_row(vec![
                                c.id.clone(),
                                c.name.clone(),
                                c.profile_picture_path
                                    .clone()
                                    .unwrap_or_else(|| "-".to_string()),
                            ]);
                        }

                        println!("{table}");
                        println!("\n{} contact(s) shown", contacts_to_show.len());
                    }
                }
            }
        }
        ContactsAction::Sync => {
            let api = super::create_authenticated_client(&config, &db, &bus).await?;
            let service = ContactService::new(db, bus);

            println!("  {} Fetching contacts from backend...", style("...").dim());
            let count = service.sync_contacts(&api).await?;
            println!(
                "  {} Synced {} contact(s).",
                style("OK").green().bold(),
                count
            );
        }
    }

    Ok(())
}
