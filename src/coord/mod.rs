//! Geographic coordinates and distance math

pub mod distance;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A geographic coordinate (latitude, longitude) in WGS84 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Validate a search radius in meters
///
/// The upper bound is left to the remote service.
pub fn validate_radius(radius: f64) -> Result<()> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(Error::InvalidRadius(format!(
            "Radius must be a positive number of meters, got {}",
            radius
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ok() {
        assert!(Coordinates::new(40.4168, -3.7038).validate().is_ok());
        assert!(Coordinates::new(-90.0, 180.0).validate().is_ok());
    }

    #[test]
    fn test_validate_out_of_range() {
        assert!(matches!(
            Coordinates::new(91.0, 0.0).validate(),
            Err(Error::InvalidCoordinates(_))
        ));
        assert!(matches!(
            Coordinates::new(0.0, -180.5).validate(),
            Err(Error::InvalidCoordinates(_))
        ));
        assert!(Coordinates::new(f64::NAN, 0.0).validate().is_err());
    }

    #[test]
    fn test_validate_radius() {
        assert!(validate_radius(1000.0).is_ok());
        assert!(matches!(validate_radius(0.0), Err(Error::InvalidRadius(_))));
        assert!(validate_radius(-5.0).is_err());
        assert!(validate_radius(f64::INFINITY).is_err());
    }

    #[test]
    fn test_display() {
        let c = Coordinates::new(40.0, -3.0);
        assert_eq!(c.to_string(), "(40.000000, -3.000000)");
    }
}
