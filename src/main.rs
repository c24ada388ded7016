//! pinpoint CLI entry point
//!
//! Map search, geography assistant and viewport coordinator

use pinpoint::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
