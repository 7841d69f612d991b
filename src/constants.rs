//! Centralized constants for the hosp-locate crate
//!
//! Constants used across multiple modules live here so the query builder,
//! config defaults and tests agree on the same values.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in meters
    pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
}

/// External API endpoints
pub mod api {
    /// Overpass mirrors, in priority order
    pub const OVERPASS_ENDPOINTS: [&str; 3] = [
        "https://overpass-api.de/api/interpreter",
        "https://overpass.openstreetmap.fr/api/interpreter",
        "https://overpass.kumi.systems/api/interpreter",
    ];

    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";

    /// User agent sent to public OSM services
    pub const USER_AGENT: &str = concat!("hosp-locate/", env!("CARGO_PKG_VERSION"));
}

/// Overpass query settings
pub mod query {
    /// Server-side timeout hint embedded in every query, in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 25;

    /// Largest timeout hint accepted from configuration, in seconds
    pub const MAX_TIMEOUT_SECS: u64 = 3600;

    /// OSM tag key used to filter facilities
    pub const CATEGORY_KEY: &str = "amenity";

    /// OSM tag value used to filter facilities
    pub const CATEGORY_VALUE: &str = "hospital";

    /// Display name used when an element has neither `name` nor `operator`
    pub const UNNAMED_FACILITY: &str = "Unnamed hospital";
}

/// Session cache settings
pub mod session {
    /// Session cache file name
    pub const SESSION_CACHE_FILE: &str = "session.json";
}
