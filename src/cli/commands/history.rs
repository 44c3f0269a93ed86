use anyhow::Result;

use crate::assistant::AssistantClient;
use crate::cli::args::HistoryCommand;
use crate::config::{ConfigManager, resolve_endpoint};
use crate::history::{ChatRecord, HistoryStore};
use crate::status;
use crate::ui::Style;

pub async fn run_history(command: Option<HistoryCommand>) -> Result<()> {
    let store = HistoryStore::new()?;

    match command {
        None | Some(HistoryCommand::List) => {
            print_records(&store.load());
        }
        Some(HistoryCommand::Sync { endpoint }) => {
            let manager = ConfigManager::new()?;
            let config = manager.load_or_default();
            let endpoint = resolve_endpoint(endpoint.as_deref(), &config)?;

            let client = AssistantClient::new(endpoint);
            let records = client.history_list().await?;
            if records.is_empty() {
                status!("Backend returned no sessions; keeping the local cache.");
            }
            store.replace_from_backend(&records)?;
            print_records(&store.load());
        }
        Some(HistoryCommand::Remove { chat_id }) => {
            store.remove(&chat_id)?;
            println!("{} Removed {}", Style::success("✓"), Style::value(&chat_id));
        }
        Some(HistoryCommand::Clear) => {
            store.clear()?;
            println!("{} Chat history cleared", Style::success("✓"));
        }
    }

    Ok(())
}

fn print_records(records: &[ChatRecord]) {
    if records.is_empty() {
        println!("{}", Style::secondary("No cached chat sessions."));
        return;
    }

    println!("{}", Style::header("Chat history"));
    for record in records {
        println!(
            "  {}  {}",
            Style::value(&record.title),
            Style::secondary(format!(
                "({}, {}, {} messages)",
                record.id, record.time, record.message_count
            ))
        );
    }
}
