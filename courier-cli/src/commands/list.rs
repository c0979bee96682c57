//! List command: page through the local conversation list.

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};

use courier_core::config::ConfigHandle;
use courier_core::constants::DEFAULT_LIST_PAGE_SIZE;
use courier_core::error::CourierResult;
use courier_models::queries::ConversationListItem;
use courier_services::{ConversationListService, EventBus};
use crate::OutputFormat;

pub async fn run(
    config: ConfigHandle,
    page_size: Option<i64>,
    include_self: bool,
    format: OutputFormat,
) -> CourierResult<()> {
    let db = super::init_database(&config).await?;
    let service = ConversationListService::new(db, EventBus::new(16));

    let page_size = page_size.unwrap_or(DEFAULT_LIST_PAGE_SIZE);
    let mut pager = if include_self {
        service.list_all(page_size)
    } else {
        service.list(page_size)
    };

    let mut items: Vec<ConversationListItem> = Vec::new();
    loop {
        let page = pager.next_page()?;
        if page.is_empty() {
            break;
        }
        items.extend(page);
    }

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&items).unwrap_or_default()
            );
        }
        OutputFormat::Text => {
            if items.is_empty() {
                println!("No conversations. Run `courier sync` to fetch from the backend.");
                return Ok(());
            }

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_content_arrangement(ContentArrangement::Dynamic);

            table.set_header(vec!["Id", "Name", "Type", "Members"]);

            for item in &items {
                let members = item
                    .members
                    .iter()
                    .map(|m| m.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                table.add_row(vec![
                    item.conversation.id.clone(),
                    super::truncate(&item.conversation.name, 40),
                    item.conversation.conv_type.to_string(),
                    if members.is_empty() { "-".to_string() } else { members },
                ]);
            }

            println!("{table}");
            println!("\n{} conversation(s)", items.len());
        }
    }

    Ok(())
}
