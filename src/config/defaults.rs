//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default search radius in meters
pub const DEFAULT_RADIUS: f64 = 5000.0;

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7879;

/// Default URL provider
pub const DEFAULT_URL_PROVIDER: &str = "openstreetmap";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "hosp-locate";
