//! `agenthub status` — Show configuration and store location.

use agenthub_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("📡 AgentHub Status");
    println!("==================");
    println!("  Config dir: {}", AppConfig::config_dir().display());
    println!(
        "  Gateway:    {}:{}",
        config.gateway.host, config.gateway.port
    );
    println!("  Store file: {}", config.storage.path.display());

    if config.storage.path.exists() {
        println!("  ✅ Store file found");
    } else {
        println!("  (no store file yet — created on first send)");
    }

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file found");
    } else {
        println!("  ⚠️  No config file — run `agenthub onboard` first");
    }

    Ok(())
}
