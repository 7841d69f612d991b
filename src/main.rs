//! hosp-locate CLI entry point
//!
//! Find nearby hospitals from OpenStreetMap data - CLI + web API

use hosp_locate::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
