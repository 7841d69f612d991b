//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::Result;
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "defaults.radius")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    if args.path {
        println!("{}", Config::config_path()?.display());
        return Ok(());
    }

    if args.reset {
        Config::default().save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    match (args.key.as_deref(), args.value.as_deref()) {
        (None, None) => show_all_config(&config),

        (Some(key), None) => match config.get(key) {
            Some(value) => println!("{}", value),
            None => {
                eprintln!("Unknown config key: {}", key);
                eprintln!("\nAvailable keys:");
                for k in Config::available_keys() {
                    eprintln!("  {}", k);
                }
                std::process::exit(1);
            }
        },

        // Validated by Config::set before anything is written
        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save()?;
            println!("{} = {}", key, config.get(key).unwrap_or_default());
        }

        (None, Some(_)) => {
            eprintln!("Error: Must specify a key to set a value");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Display all configuration values
fn show_all_config(config: &Config) {
    println!("[defaults]");
    println!("radius = {}", config.defaults.radius);
    println!("format = \"{}\"", config.defaults.format);
    println!();

    println!("[overpass]");
    println!("timeout_secs = {}", config.overpass.timeout_secs);
    if config.overpass.endpoints.is_empty() {
        println!("# no endpoints: searches will fail");
    }
    for endpoint in &config.overpass.endpoints {
        println!();
        println!("[[overpass.endpoints]]");
        println!("url = \"{}\"", endpoint.url);
        if let Some(timeout) = endpoint.timeout_secs {
            println!("timeout_secs = {}", timeout);
        }
    }
    println!();

    println!("[server]");
    println!("host = \"{}\"", config.server.host);
    println!("port = {}", config.server.port);
    println!();

    println!("[session]");
    match &config.session.cache_path {
        Some(path) => println!("cache_path = \"{}\"", path.display()),
        None => println!("# cache_path: default cache directory"),
    }
    println!();

    println!("[url]");
    println!("default = \"{}\"", config.url.default);
    println!();

    println!("[url.providers]");
    let mut providers: Vec<_> = config.url.providers.iter().collect();
    providers.sort();
    for (name, template) in providers {
        println!("{} = \"{}\"", name, template);
    }
}
