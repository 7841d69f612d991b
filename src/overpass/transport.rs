//! Network transport for Overpass queries
//!
//! The fetcher only needs "post this query to that endpoint and give me the
//! body". Keeping that behind a trait lets tests script endpoint failures
//! without a network.

use crate::constants::api::USER_AGENT;
use crate::error::{Error, Result};
use crate::overpass::Endpoint;
use std::future::Future;
use std::time::Duration;

/// Trait for sending an Overpass query to one endpoint
pub trait OverpassTransport: Send + Sync {
    /// POST the query and return the response body
    ///
    /// Transport failures and non-success statuses are reported as
    /// `Error::EndpointUnreachable`.
    fn post_query(
        &self,
        endpoint: &Endpoint,
        query: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the crate's user agent
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Server(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl OverpassTransport for HttpTransport {
    async fn post_query(&self, endpoint: &Endpoint, query: &str, timeout: Duration) -> Result<String> {
        let fail = |reason: String| Error::EndpointUnreachable {
            endpoint: endpoint.url.clone(),
            reason,
        };

        let response = self
            .client
            .post(&endpoint.url)
            .timeout(timeout)
            .header(reqwest::header::CONTENT_TYPE, "text/plain;charset=UTF-8")
            .body(query.to_string())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    fail(format!("no response within {}s", timeout.as_secs()))
                } else {
                    fail(format!("request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(fail(format!(
                "Overpass error {} ({})",
                status.as_u16(),
                endpoint.host()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| fail(format!("failed to read response body: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_posts_query_as_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/interpreter")
                    .body("[out:json];node(1);out;");
                then.status(200).body(r#"{"elements": []}"#);
            })
            .await;

        let transport = HttpTransport::new().unwrap();
        let endpoint = Endpoint::new(server.url("/api/interpreter"));
        let body = transport
            .post_query(&endpoint, "[out:json];node(1);out;", Duration::from_secs(5))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(body, r#"{"elements": []}"#);
    }

    #[tokio::test]
    async fn test_non_success_status_is_unreachable() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/interpreter");
                then.status(429).body("rate limited");
            })
            .await;

        let transport = HttpTransport::new().unwrap();
        let endpoint = Endpoint::new(server.url("/api/interpreter"));
        let err = transport
            .post_query(&endpoint, "q", Duration::from_secs(5))
            .await
            .unwrap_err();

        match err {
            Error::EndpointUnreachable { endpoint: url, reason } => {
                assert_eq!(url, endpoint.url);
                assert!(reason.contains("429"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_local_deadline_is_unreachable() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/interpreter");
                then.status(200)
                    .delay(Duration::from_secs(3))
                    .body(r#"{"elements": []}"#);
            })
            .await;

        let transport = HttpTransport::new().unwrap();
        let endpoint = Endpoint::new(server.url("/api/interpreter"));
        let err = transport
            .post_query(&endpoint, "q", Duration::from_secs(1))
            .await
            .unwrap_err();

        match err {
            Error::EndpointUnreachable { reason, .. } => assert!(reason.contains("within 1s")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
