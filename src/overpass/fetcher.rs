//! Sequential endpoint fallback

use crate::config::OverpassConfig;
use crate::constants::query::DEFAULT_TIMEOUT_SECS;
use crate::coord::Coordinates;
use crate::error::{EndpointFailure, Error, Result};
use crate::facility::FacilityRecord;
use crate::overpass::response::OverpassResponse;
use crate::overpass::transport::{HttpTransport, OverpassTransport};
use crate::overpass::{default_endpoints, Endpoint, HospitalQuery};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Extra time the client waits beyond the server-side timeout hint
const REQUEST_GRACE_SECS: u64 = 5;

/// Result of one endpoint attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// Endpoint answered with a parseable body
    Success { elements: usize },
    /// Endpoint was abandoned
    Failed { reason: String },
}

/// One entry of the attempt log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub endpoint: String,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

/// A successful fetch
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// Normalized records in service response order
    pub records: Vec<FacilityRecord>,
    /// URL of the endpoint that answered
    pub endpoint: String,
    /// Every attempt made, in order, ending with the successful one
    pub attempts: Vec<Attempt>,
}

/// Hospital fetcher over an ordered endpoint list
///
/// Configuration is read-only; each call to [`fetch`](Self::fetch) is
/// independent and re-queries the network.
#[derive(Debug, Clone)]
pub struct OverpassFetcher<T = HttpTransport> {
    transport: T,
    endpoints: Vec<Endpoint>,
    timeout_secs: u64,
}

impl OverpassFetcher<HttpTransport> {
    /// Fetcher over the public mirrors with the default timeout
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(
            HttpTransport::new()?,
            default_endpoints(),
            DEFAULT_TIMEOUT_SECS,
        ))
    }

    /// Fetcher over the configured endpoints
    pub fn from_config(config: &OverpassConfig) -> Result<Self> {
        Ok(Self::new(
            HttpTransport::new()?,
            config.endpoints.clone(),
            config.timeout_secs,
        ))
    }
}

impl<T: OverpassTransport> OverpassFetcher<T> {
    /// Create a fetcher
    ///
    /// # Arguments
    /// * `transport` - How queries are sent
    /// * `endpoints` - Endpoints in priority order
    /// * `timeout_secs` - Timeout hint embedded in each query
    pub fn new(transport: T, endpoints: Vec<Endpoint>, timeout_secs: u64) -> Self {
        Self {
            transport,
            endpoints,
            timeout_secs,
        }
    }

    /// Configured endpoints, in priority order
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Find hospitals within `radius` meters of `origin`
    pub async fn fetch_hospitals(&self, origin: Coordinates, radius: f64) -> Result<FetchOutcome> {
        let query = HospitalQuery::new(origin, radius)?.with_timeout(self.timeout_secs);
        self.fetch(&query).await
    }

    /// Run a query against each endpoint in turn until one succeeds
    pub async fn fetch(&self, query: &HospitalQuery) -> Result<FetchOutcome> {
        if self.endpoints.is_empty() {
            return Err(Error::Config("No Overpass endpoints configured".to_string()));
        }

        let ql = query.to_overpass_ql();
        debug!(query = %ql, "Built Overpass query");

        let mut attempts = Vec::with_capacity(self.endpoints.len());
        let mut failures = Vec::new();

        for endpoint in &self.endpoints {
            match self.attempt(endpoint, &ql).await {
                Ok(records) => {
                    info!(
                        endpoint = %endpoint.host(),
                        count = records.len(),
                        "Overpass query succeeded"
                    );
                    attempts.push(Attempt {
                        endpoint: endpoint.url.clone(),
                        outcome: AttemptOutcome::Success {
                            elements: records.len(),
                        },
                    });
                    return Ok(FetchOutcome {
                        records,
                        endpoint: endpoint.url.clone(),
                        attempts,
                    });
                }
                Err(err) => {
                    warn!("Overpass attempt failed: {}", err);
                    let failure = err.as_endpoint_failure().unwrap_or_else(|| EndpointFailure {
                        endpoint: endpoint.url.clone(),
                        reason: err.to_string(),
                    });
                    attempts.push(Attempt {
                        endpoint: endpoint.url.clone(),
                        outcome: AttemptOutcome::Failed {
                            reason: failure.reason.clone(),
                        },
                    });
                    failures.push(failure);
                }
            }
        }

        Err(Error::AllEndpointsExhausted { failures })
    }

    /// Single request to one endpoint, parsed and normalized
    async fn attempt(&self, endpoint: &Endpoint, ql: &str) -> Result<Vec<FacilityRecord>> {
        let timeout = Duration::from_secs(
            endpoint
                .timeout_secs
                .unwrap_or_else(|| self.timeout_secs.saturating_add(REQUEST_GRACE_SECS)),
        );

        let body = self.transport.post_query(endpoint, ql, timeout).await?;

        let response = OverpassResponse::parse(&body).map_err(|e| Error::MalformedResponse {
            endpoint: endpoint.url.clone(),
            reason: e.to_string(),
        })?;

        if let Some(remark) = &response.remark {
            warn!(endpoint = %endpoint.host(), "Overpass remark: {}", remark);
        }

        Ok(response.into_records())
    }
}
