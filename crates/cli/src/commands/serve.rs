//! `agenthub serve` — Start the HTTP relay server.

use agenthub_config::AppConfig;

pub async fn run(
    port_override: Option<u16>,
    host_override: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }
    if let Some(host) = host_override {
        config.gateway.host = host;
    }

    let base = format!("http://{}:{}", config.gateway.host, config.gateway.port);
    println!("📡 AgentHub relay");
    println!("   Listening:  {base}");
    println!("   Store file: {}", config.storage.path.display());
    println!("   Agent guide: {base}/");
    println!("\n📝 Quick test:");
    println!(
        "curl -X POST {base}/api/send -H \"Content-Type: application/json\" \
         -d '{{\"channel\": \"test\", \"agent\": \"test_agent\", \"text\": \"Hello world!\"}}'"
    );
    println!();

    agenthub_gateway::start(config).await?;

    Ok(())
}
