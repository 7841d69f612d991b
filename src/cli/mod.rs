//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod locate;
pub mod login;
pub mod search;
pub mod serve;
pub mod status;

use crate::config::Config;
use crate::error::Result;
use crate::session::SessionStore;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Find hospitals near you using OpenStreetMap data
#[derive(Parser)]
#[command(name = "hosp-locate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for hospitals around your position
    Search(search::SearchArgs),

    /// Set your position (IP, place name or coordinates)
    Locate(locate::LocateArgs),

    /// Sign in
    Login(login::LoginArgs),

    /// Sign out and forget your position
    Logout,

    /// Show who is signed in
    Whoami,

    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Show endpoints, session and server status
    Status(status::StatusArgs),
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.command {
        Commands::Serve(_) => "info",
        _ => "warn",
    };
    init_logging(default_level);

    match cli.command {
        Commands::Search(args) => search::run(args).await,
        Commands::Locate(args) => locate::run(args).await,
        Commands::Login(args) => login::run(args),
        Commands::Logout => login::logout(),
        Commands::Whoami => login::whoami(),
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
        Commands::Status(args) => status::run(args).await,
    }
}

/// Install the tracing subscriber
///
/// `RUST_LOG` wins over `default_level`. Logs go to stderr.
fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Session store for the configured cache path
pub(crate) fn session_store(config: &Config) -> Result<SessionStore> {
    SessionStore::from_config_path(config.session.cache_path.as_deref())
}
