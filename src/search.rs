//! Hospital search
//!
//! Ties the session gate, the fetcher and display-time annotation together:
//! signed-in check, last-known position as origin, one fetch, one result set.

use crate::coord::Coordinates;
use crate::error::Result;
use crate::facility::FacilityRecord;
use crate::overpass::{Attempt, OverpassFetcher, OverpassTransport};
use crate::ranking::{annotate, AnnotatedFacility};
use crate::session::Session;
use serde::{Deserialize, Serialize};
use tracing::info;

/// One completed search
///
/// A new search produces a new result; results are never merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Unique ID for this search
    pub id: String,
    pub origin: Coordinates,
    /// Radius in meters
    pub radius: f64,
    /// Endpoint that answered
    pub endpoint: String,
    /// Endpoint attempts in the order they were made
    pub attempts: Vec<Attempt>,
    /// When the search completed (RFC 3339)
    pub timestamp: String,
    /// Facilities in service response order
    pub facilities: Vec<FacilityRecord>,
}

/// Serializable view of a result with distances attached
#[derive(Debug, Serialize)]
pub struct SearchReport<'a> {
    pub id: &'a str,
    pub origin: Coordinates,
    pub radius: f64,
    pub endpoint: &'a str,
    pub attempts: &'a [Attempt],
    pub timestamp: &'a str,
    pub count: usize,
    pub facilities: Vec<AnnotatedFacility<'a>>,
}

impl SearchResult {
    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    /// Facilities with their distance from the origin, in the original order
    pub fn annotated(&self) -> Vec<AnnotatedFacility<'_>> {
        annotate(&self.facilities, Some(self.origin))
    }

    /// Status line shown after a search
    pub fn summary(&self) -> String {
        match self.len() {
            0 => "No hospitals found within this radius".to_string(),
            1 => "1 hospital found".to_string(),
            n => format!("{} hospitals found", n),
        }
    }

    pub fn report(&self) -> SearchReport<'_> {
        SearchReport {
            id: &self.id,
            origin: self.origin,
            radius: self.radius,
            endpoint: &self.endpoint,
            attempts: &self.attempts,
            timestamp: &self.timestamp,
            count: self.len(),
            facilities: self.annotated(),
        }
    }
}

/// Search for hospitals around the session's last-known position
///
/// # Errors
/// * `NotSignedIn` when no identity is present
/// * `NoPosition` when the session has no position yet
/// * `InvalidRadius` for a non-positive radius
/// * `AllEndpointsExhausted` when every endpoint failed
pub async fn search_hospitals<T: OverpassTransport>(
    session: &Session,
    fetcher: &OverpassFetcher<T>,
    radius: f64,
) -> Result<SearchResult> {
    let identity = session.require_identity("search for hospitals")?;
    let origin = session.require_position()?.coords;

    info!(user = %identity.uid, origin = %origin, radius, "Searching for hospitals");

    let outcome = fetcher.fetch_hospitals(origin, radius).await?;

    Ok(SearchResult {
        id: uuid::Uuid::new_v4().to_string(),
        origin,
        radius,
        endpoint: outcome.endpoint,
        attempts: outcome.attempts,
        timestamp: chrono::Utc::now().to_rfc3339(),
        facilities: outcome.records,
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::overpass::Endpoint;
    use crate::session::{Identity, Position, PositionSource};
    use httpmock::prelude::*;

    fn signed_in_at(origin: Coordinates) -> Session {
        let mut session = Session::new();
        session.sign_in(Identity::new("uid-1", "Alice", None));
        session.set_position(Position::new(origin, PositionSource::Manual));
        session
    }

    fn fetcher_for(url: String) -> OverpassFetcher {
        OverpassFetcher::new(
            crate::overpass::HttpTransport::new().unwrap(),
            vec![Endpoint::new(url)],
            25,
        )
    }

    #[tokio::test]
    async fn test_signed_out_makes_no_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).body(r#"{"elements": []}"#);
            })
            .await;

        let mut session = Session::new();
        session.set_position(Position::new(Coordinates::new(0.0, 0.0), PositionSource::Manual));

        let err = search_hospitals(&session, &fetcher_for(server.url("/api/interpreter")), 1000.0)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NotSignedIn(_)));
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_requires_position() {
        let mut session = Session::new();
        session.sign_in(Identity::new("uid-1", "Alice", None));

        let err = search_hospitals(&session, &fetcher_for("http://unused/api".to_string()), 1000.0)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoPosition));
    }

    #[tokio::test]
    async fn test_search_uses_session_position() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/interpreter")
                    .body_contains("(around:1000,0,0)");
                then.status(200).json_body(serde_json::json!({
                    "elements": [
                        {"type": "node", "id": 1, "lat": 0.0, "lon": 0.009, "tags": {"name": "East"}}
                    ]
                }));
            })
            .await;

        let session = signed_in_at(Coordinates::new(0.0, 0.0));
        let result = search_hospitals(&session, &fetcher_for(server.url("/api/interpreter")), 1000.0)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.len(), 1);
        assert_eq!(result.origin, Coordinates::new(0.0, 0.0));
        assert_eq!(result.summary(), "1 hospital found");

        let distance = result.annotated()[0].distance_m.unwrap();
        assert!((distance - 1000.0).abs() < 10.0);
    }

    #[test]
    fn test_summary_empty() {
        let mut result = test_support::sample_result();
        result.facilities.clear();
        assert_eq!(result.summary(), "No hospitals found within this radius");
    }

    #[test]
    fn test_report_shape() {
        let result = test_support::sample_result();
        let json = serde_json::to_value(result.report()).unwrap();

        assert_eq!(json["count"], 2);
        assert_eq!(json["facilities"][0]["name"], "Hospital Central");
        assert!(json["facilities"][0]["distance_m"].as_f64().unwrap() > 990.0);
        assert_eq!(json["attempts"][0]["status"], "success");
    }
}
