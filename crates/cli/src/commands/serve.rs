//! `youthdesk serve` — Start the HTTP API gateway.

use youthdesk_config::AppConfig;

pub async fn run(mut config: AppConfig, port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("youthdesk gateway");
    println!("  Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("  Store:     {} ({})", config.store.backend, config.store.path);
    println!("  Generator: {}", config.generator.provider);

    youthdesk_gateway::start(config).await?;

    Ok(())
}
