//! `agenthub channels` — List channels in the persisted store.

use agenthub_config::AppConfig;
use agenthub_store::{ChannelStore, JsonFileStorage};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let storage = JsonFileStorage::new(config.storage.path.clone());
    let store = ChannelStore::open(Box::new(storage))?;

    let channels = store.list_channels().await;
    if channels.is_empty() {
        println!("No channels yet. Send a first message to create one.");
        return Ok(());
    }

    println!("{:<32} messages", "channel");
    println!("{:-<32} --------", "");
    for ch in channels {
        println!("{:<32} {}", ch.name, ch.message_count);
    }

    Ok(())
}
