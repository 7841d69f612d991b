//! Search command handler
//!
//! Runs a hospital search around the session position and prints it.

use crate::cli::locate::{update_position, LocateArgs};
use crate::cli::session_store;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::url::UrlFormatter;
use crate::format::{available_formats, get_formatter};
use crate::overpass::OverpassFetcher;
use crate::search::search_hospitals;
use clap::Args;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Search radius in meters
    #[arg(long, short = 'r')]
    pub radius: Option<f64>,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Map provider for the url format
    #[arg(long)]
    pub provider: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,

    /// Update the position before searching
    #[command(flatten)]
    pub locate: LocateArgs,
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    if args.list_formats {
        list_formats();
        return Ok(());
    }

    let config = Config::load()?;
    let store = session_store(&config)?;
    let mut session = store.load();

    if args.locate.is_given() {
        update_position(&mut session, &args.locate).await?;
        store.save(&session)?;
    }

    let radius = args.radius.unwrap_or(config.defaults.radius);
    let format = args.format.unwrap_or(config.defaults.format.clone());

    // Resolve the formatter before touching the network
    let formatter = get_formatter(&format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?;

    let fetcher = OverpassFetcher::from_config(&config.overpass)?;
    let result = search_hospitals(&session, &fetcher, radius).await?;

    eprintln!("{}", result.summary());

    let output = match args.provider.as_deref() {
        Some(provider) if formatter.name() == "url" => {
            UrlFormatter.format_with_provider(&result, &config, Some(provider))?
        }
        _ => formatter.format(&result, &config)?,
    };

    if let Some(path) = args.output {
        std::fs::write(&path, &output)?;
        eprintln!("Output written to {}", path);
    } else {
        println!("{}", output);
    }

    Ok(())
}

/// Print available output formats
fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:6} - {}", format.name, format.description);
    }
}
