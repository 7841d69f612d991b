//! Status command handler
//!
//! Shows the configured endpoints, the session and optionally the server.

use crate::cli::session_store;
use crate::config::Config;
use crate::error::Result;
use crate::overpass::OverpassFetcher;
use clap::Args;

/// Status command arguments
#[derive(Args)]
pub struct StatusArgs {
    /// Check if server is running (tries to connect)
    #[arg(long)]
    pub server: bool,
}

/// Run the status command
pub async fn run(args: StatusArgs) -> Result<()> {
    let config = Config::load()?;

    if args.server {
        check_server_status(&config).await;
    }

    println!("hosp-locate v{}", env!("CARGO_PKG_VERSION"));
    println!();

    let fetcher = OverpassFetcher::from_config(&config.overpass)?;
    println!("Overpass endpoints (in order):");
    for (i, endpoint) in fetcher.endpoints().iter().enumerate() {
        let timeout = endpoint
            .timeout_secs
            .map(|t| format!("{}s", t))
            .unwrap_or_else(|| "default".to_string());
        println!("  {}. {} [timeout: {}]", i + 1, endpoint.url, timeout);
    }
    println!("  Query timeout: {}s", config.overpass.timeout_secs);
    println!();

    let store = session_store(&config)?;
    let session = store.load();
    println!("Session ({}):", store.path().display());
    match session.identity.as_ref().filter(|i| i.is_valid()) {
        Some(identity) => println!("  Signed in as {}", identity.name),
        None => println!("  Not signed in"),
    }
    match &session.position {
        Some(position) => println!(
            "  Position: {} via {} at {}",
            position.coords,
            position.source,
            position.located_at.to_rfc3339()
        ),
        None => println!("  No position"),
    }

    Ok(())
}

/// Check if the server is running
async fn check_server_status(config: &Config) {
    let url = format!("http://{}/api/status", config.server_addr());

    match reqwest::get(&url).await {
        Ok(response) if response.status().is_success() => {
            println!("Server: RUNNING on {}", config.server_addr());
            if let Ok(status) = response.json::<serde_json::Value>().await {
                if let Some(version) = status.get("version").and_then(|v| v.as_str()) {
                    println!("  Version: {}", version);
                }
            }
        }
        Ok(response) => println!("Server: ERROR (status {})", response.status()),
        Err(_) => println!("Server: NOT RUNNING on {}", config.server_addr()),
    }
    println!();
}
