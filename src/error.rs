//! Error types for hosp-locate

use thiserror::Error;

/// A single failed endpoint attempt, kept for the aggregated error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointFailure {
    /// Endpoint URL that was tried
    pub endpoint: String,
    /// Human-readable reason
    pub reason: String,
}

impl std::fmt::Display for EndpointFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.endpoint, self.reason)
    }
}

/// Main error type for hosp-locate operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Endpoint unreachable ({endpoint}): {reason}")]
    EndpointUnreachable { endpoint: String, reason: String },

    #[error("Malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    #[error("Could not reach the Overpass API ({} endpoints tried). Try again later.", failures.len())]
    AllEndpointsExhausted { failures: Vec<EndpointFailure> },

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid radius: {0}")]
    InvalidRadius(String),

    #[error("You must sign in to {0}")]
    NotSignedIn(String),

    #[error("No position known yet. Run `hosp-locate locate` first")]
    NoPosition,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Geo error: {0}")]
    Geo(String),
}

impl Error {
    /// Convert a per-endpoint error into the failure record used for aggregation
    ///
    /// Returns None for errors that are not tied to a single endpoint.
    pub fn as_endpoint_failure(&self) -> Option<EndpointFailure> {
        match self {
            Error::EndpointUnreachable { endpoint, reason }
            | Error::MalformedResponse { endpoint, reason } => Some(EndpointFailure {
                endpoint: endpoint.clone(),
                reason: reason.clone(),
            }),
            _ => None,
        }
    }
}

/// Result type alias for hosp-locate operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_message_counts_endpoints() {
        let err = Error::AllEndpointsExhausted {
            failures: vec![
                EndpointFailure {
                    endpoint: "https://a.example/api".to_string(),
                    reason: "HTTP 504".to_string(),
                },
                EndpointFailure {
                    endpoint: "https://b.example/api".to_string(),
                    reason: "timed out".to_string(),
                },
            ],
        };
        assert!(err.to_string().contains("2 endpoints tried"));
    }

    #[test]
    fn test_as_endpoint_failure() {
        let err = Error::MalformedResponse {
            endpoint: "https://a.example/api".to_string(),
            reason: "missing field `elements`".to_string(),
        };
        let failure = err.as_endpoint_failure().unwrap();
        assert_eq!(failure.endpoint, "https://a.example/api");

        assert!(Error::NoPosition.as_endpoint_failure().is_none());
    }
}
