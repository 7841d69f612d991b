//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Turns a place name into a position for `locate --place`.
//! Nominatim's usage policy requires an identifying User-Agent.

use crate::constants::api::{NOMINATIM_URL, USER_AGENT};
use crate::error::{Error, Result};
use crate::geo::{GeoBackend, GeoLocation};
use serde::Deserialize;

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimBackend {
    client: reqwest::Client,
    base_url: String,
}

/// Nominatim search response item
#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    display_name: String,
}

impl NominatimBackend {
    /// Create a backend against the public Nominatim instance
    pub fn new() -> Result<Self> {
        Self::with_base_url(NOMINATIM_URL)
    }

    /// Create a backend against another Nominatim instance
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Geo(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Parse lat/lng strings to f64
    fn parse_coords(lat: &str, lng: &str) -> Result<(f64, f64)> {
        let lat: f64 = lat.parse().map_err(|_| {
            Error::Geo(format!("Invalid latitude: {}", lat))
        })?;
        let lng: f64 = lng.parse().map_err(|_| {
            Error::Geo(format!("Invalid longitude: {}", lng))
        })?;
        Ok((lat, lng))
    }
}

impl GeoBackend for NominatimBackend {
    async fn geocode(&self, query: &str) -> Result<Option<GeoLocation>> {
        let url = format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(query)
        );

        let response = self.client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Geo(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geo(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let results: Vec<NominatimResult> = response
            .json()
            .await
            .map_err(|e| Error::Geo(format!("Failed to parse Nominatim response: {}", e)))?;

        match results.into_iter().next() {
            Some(result) => {
                let (lat, lng) = Self::parse_coords(&result.lat, &result.lon)?;
                Ok(Some(GeoLocation {
                    lat,
                    lng,
                    display_name: result.display_name,
                }))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_parse_coords() {
        let (lat, lng) = NominatimBackend::parse_coords("40.4168", "-3.7038").unwrap();
        assert!((lat - 40.4168).abs() < 0.0001);
        assert!((lng - (-3.7038)).abs() < 0.0001);
    }

    #[test]
    fn test_parse_coords_invalid() {
        assert!(NominatimBackend::parse_coords("invalid", "0").is_err());
        assert!(NominatimBackend::parse_coords("0", "invalid").is_err());
    }

    #[tokio::test]
    async fn test_geocode() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/search")
                    .query_param("q", "Puerta del Sol, Madrid")
                    .query_param("format", "json");
                then.status(200).json_body(serde_json::json!([
                    {"lat": "40.4169", "lon": "-3.7035", "display_name": "Puerta del Sol, Madrid, Spain"}
                ]));
            })
            .await;

        let backend = NominatimBackend::with_base_url(server.base_url()).unwrap();
        let location = backend
            .geocode("Puerta del Sol, Madrid")
            .await
            .unwrap()
            .unwrap();

        mock.assert_async().await;
        assert_eq!(location.display_name, "Puerta del Sol, Madrid, Spain");
        assert!((location.lat - 40.4169).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_geocode_no_match() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search");
                then.status(200).json_body(serde_json::json!([]));
            })
            .await;

        let backend = NominatimBackend::with_base_url(server.base_url()).unwrap();
        assert!(backend.geocode("nowhere at all").await.unwrap().is_none());
    }
}
