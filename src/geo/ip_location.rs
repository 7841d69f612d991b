//! IP-based geolocation
//!
//! Uses ip-api.com. The result is stored in the session like any other
//! position, so there is no separate cache here.

use crate::constants::api::IP_API_URL;
use crate::error::{Error, Result};
use crate::geo::GeoLocation;
use serde::Deserialize;

/// IP location service
#[derive(Debug, Clone)]
pub struct IpLocator {
    client: reqwest::Client,
    url: String,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    #[serde(rename = "regionName")]
    region_name: Option<String>,
    country: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl IpLocator {
    /// Create a locator against ip-api.com
    pub fn new() -> Self {
        Self::with_url(IP_API_URL)
    }

    /// Create a locator against a different ip-api compatible URL
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Get current location based on IP address
    pub async fn locate(&self) -> Result<GeoLocation> {
        let response = self.client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::Geo(format!("IP location request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geo(format!(
                "IP location API returned status: {}",
                response.status()
            )));
        }

        let data: IpApiResponse = response
            .json()
            .await
            .map_err(|e| Error::Geo(format!("Failed to parse IP location response: {}", e)))?;

        Self::into_location(data)
    }

    fn into_location(data: IpApiResponse) -> Result<GeoLocation> {
        if data.status != "success" {
            return Err(Error::Geo(format!(
                "IP location lookup failed: {}",
                data.message.as_deref().unwrap_or("unknown reason")
            )));
        }

        let lat = data.lat.ok_or_else(|| Error::Geo("No latitude in response".to_string()))?;
        let lng = data.lon.ok_or_else(|| Error::Geo("No longitude in response".to_string()))?;

        // Build display name from available fields
        let display_name = [data.city, data.region_name, data.country]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");

        Ok(GeoLocation {
            lat,
            lng,
            display_name: if display_name.is_empty() {
                "Unknown Location".to_string()
            } else {
                display_name
            },
        })
    }
}

impl Default for IpLocator {
    fn default() -> Self {
        Self::new()
    }
}
