//! Position acquisition
//!
//! Stands in for browser geolocation: the user's position comes from IP
//! geolocation or from geocoding a place name.

pub mod ip_location;
pub mod nominatim;

use crate::coord::Coordinates;
use crate::error::Result;
use crate::session::{Position, PositionSource};
use serde::{Deserialize, Serialize};

/// A geocoded location result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
    /// Display name (address or description)
    pub display_name: String,
}

impl GeoLocation {
    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    /// Turn into a session position
    pub fn into_position(self, source: PositionSource) -> Position {
        Position::new(self.coords(), source).with_display_name(self.display_name)
    }
}

/// Trait for geocoding backends
pub trait GeoBackend: Send + Sync {
    /// Geocode a location string to coordinates
    ///
    /// Returns the best match for the query, or None if not found
    fn geocode(&self, query: &str) -> impl std::future::Future<Output = Result<Option<GeoLocation>>> + Send;
}

/// Get the default geocoding backend
pub fn get_geocoder() -> Result<nominatim::NominatimBackend> {
    nominatim::NominatimBackend::new()
}

/// Get the IP location service
pub fn get_ip_locator() -> ip_location::IpLocator {
    ip_location::IpLocator::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_position() {
        let loc = GeoLocation {
            lat: 40.4168,
            lng: -3.7038,
            display_name: "Madrid, Spain".to_string(),
        };

        let position = loc.into_position(PositionSource::Geocoded);
        assert_eq!(position.coords, Coordinates::new(40.4168, -3.7038));
        assert_eq!(position.source, PositionSource::Geocoded);
        assert_eq!(position.display_name.as_deref(), Some("Madrid, Spain"));
    }
}
