//! Plain HTTP GET fetcher shared by every stage of the pipeline.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use laradocs_shared::{HttpConfig, LaradocsError, Result};

/// HTTP client issuing one GET per call.
///
/// Redirects are followed with reqwest's default policy. Anything other than
/// a 2xx final status is reported as [`LaradocsError::Network`].
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Build a fetcher from the `[http]` config section.
    pub fn new(http: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(http.user_agent.as_str())
            .timeout(Duration::from_secs(http.timeout_secs))
            .build()
            .map_err(|e| LaradocsError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// GET `url` and return the response body as text.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| LaradocsError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LaradocsError::Network(format!("{url}: HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LaradocsError::Network(format!("{url}: body read failed: {e}")))?;

        debug!(status = status.as_u16(), bytes = body.len(), "fetched");
        Ok(body)
    }
}
