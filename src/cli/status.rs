//! Status command handler
//!
//! Shows which services are configured and whether a server is running.

use crate::config::Config;
use crate::error::Result;
use crate::server::routes::StatusResponse;
use clap::Args;

/// Status command arguments
#[derive(Args)]
pub struct StatusArgs {
    /// Check if server is running (tries to connect)
    #[arg(long)]
    pub server: bool,
}

fn configured(flag: bool) -> &'static str {
    if flag {
        "configured"
    } else {
        "NOT CONFIGURED"
    }
}

/// Run the status command
pub async fn run(args: StatusArgs) -> Result<()> {
    let config = Config::load()?;

    println!("pinpoint v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("Search (Mapbox):  {}", configured(config.search_configured()));
    if config.assistant.endpoint.trim().is_empty() {
        println!(
            "Assistant:        {} (OpenAI, {})",
            configured(config.assistant_configured()),
            config.assistant.model
        );
    } else {
        println!("Assistant:        remote at {}", config.assistant.endpoint);
    }
    println!(
        "Search gate:      {} characters, on {}",
        config.search.min_query_chars, config.search.trigger
    );
    println!(
        "Idle rotation:    {}",
        if config.spin.enabled { "on" } else { "off" }
    );
    println!();

    if args.server {
        check_server_status(&config).await;
    }

    Ok(())
}

/// Check if the server is running
async fn check_server_status(config: &Config) {
    let url = format!("http://{}/api/status", config.server_addr());

    match reqwest::get(&url).await {
        Ok(response) => {
            if response.status().is_success() {
                println!("Server: RUNNING on {}", config.server_addr());
                if let Ok(status) = response.json::<StatusResponse>().await {
                    println!("  Version:   {}", status.version);
                    println!("  Model:     {}", status.model);
                    println!("  Assistant: {}", configured(status.assistant_configured));
                }
            } else {
                println!("Server: ERROR (status {})", response.status());
            }
        }
        Err(_) => {
            println!("Server: NOT RUNNING on {}", config.server_addr());
        }
    }
    println!();
}
