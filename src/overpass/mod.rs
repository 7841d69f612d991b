//! Overpass geodata retrieval
//!
//! Builds a hospital query around an origin, posts it to an ordered list of
//! Overpass mirrors one at a time, and normalizes the first successful
//! response into [`FacilityRecord`](crate::facility::FacilityRecord)s.
//!
//! ## Fallback
//! Endpoints are tried strictly in order. A transport failure, a non-success
//! status or an unparseable body abandons that endpoint and the next one is
//! tried immediately. There is no retry of the same endpoint and no second
//! pass over the list; when every endpoint has failed the caller gets a single
//! [`Error::AllEndpointsExhausted`](crate::error::Error::AllEndpointsExhausted).

pub mod fetcher;
pub mod response;
pub mod transport;

pub use fetcher::{Attempt, AttemptOutcome, FetchOutcome, OverpassFetcher};
pub use transport::{HttpTransport, OverpassTransport};

use crate::constants::api::OVERPASS_ENDPOINTS;
use crate::constants::query::{CATEGORY_KEY, CATEGORY_VALUE, DEFAULT_TIMEOUT_SECS};
use crate::coord::{validate_radius, Coordinates};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One Overpass mirror
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Interpreter URL (e.g. `https://overpass-api.de/api/interpreter`)
    pub url: String,

    /// Local request deadline for this endpoint, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Endpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: None,
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Host part of the URL, for log lines
    pub fn host(&self) -> &str {
        let rest = self
            .url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.url);
        rest.split('/').next().unwrap_or(rest)
    }
}

/// The public mirrors, in priority order
pub fn default_endpoints() -> Vec<Endpoint> {
    OVERPASS_ENDPOINTS.iter().map(|url| Endpoint::new(*url)).collect()
}

/// A hospital search around an origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HospitalQuery {
    pub origin: Coordinates,
    /// Search radius in meters
    pub radius: f64,
    /// Server-side timeout hint, in seconds
    pub timeout_secs: u64,
}

impl HospitalQuery {
    /// Create a query, validating origin and radius
    pub fn new(origin: Coordinates, radius: f64) -> Result<Self> {
        origin.validate()?;
        validate_radius(radius)?;
        Ok(Self {
            origin,
            radius,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Override the timeout hint embedded in the query
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Timeout hint as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Render the Overpass QL expression
    ///
    /// Covers nodes, ways and relations; `out center tags` makes the server
    /// attach a centroid to ways and relations.
    pub fn to_overpass_ql(&self) -> String {
        let around = format!(
            "(around:{},{},{})",
            self.radius, self.origin.lat, self.origin.lng
        );
        let filter = format!("[\"{}\"=\"{}\"]", CATEGORY_KEY, CATEGORY_VALUE);

        format!(
            "[out:json][timeout:{}];(node{f}{a};way{f}{a};relation{f}{a};);out center tags;",
            self.timeout_secs,
            f = filter,
            a = around
        )
    }
}
