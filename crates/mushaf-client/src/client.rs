//! Shared HTTP plumbing for the text and recitation APIs.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};

use crate::config::{Editions, Endpoints};
use crate::error::{ClientError, Result};

/// User agent string for API requests.
pub(crate) const USER_AGENT_VALUE: &str = concat!("mushaf-reader/", env!("CARGO_PKG_VERSION"));

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for both remote data sources.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct MushafClient {
    pub(crate) client: reqwest::Client,
    pub(crate) endpoints: Endpoints,
    pub(crate) editions: Editions,
}

impl MushafClient {
    /// Creates a client for the given endpoints and editions.
    pub fn new(endpoints: Endpoints, editions: Editions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoints,
            editions,
        })
    }

    /// GET `url` and return the body, mapping non-success statuses to errors.
    pub(crate) async fn get_text(&self, url: &str) -> Result<String> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "request failed");
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = MushafClient::new(Endpoints::default(), Editions::default());
        assert!(client.is_ok());
    }
}
