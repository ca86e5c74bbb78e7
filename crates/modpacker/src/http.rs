//! Shared HTTP client for page fetches and file downloads.
//!
//! One cookie-carrying [`reqwest::Client`] is built per run and cloned into
//! every adapter; some mirror hops (OptiFine) only work within a session.
//! Requests are issued one at a time by the callers, never overlapped.

use std::time::Duration;

use reqwest::{Client, Response};
use tracing::debug;

use crate::error::{InstallError, Result};
use crate::url::Url;

/// Settings applied to every request in a run.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("modpacker/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Thin wrapper over [`reqwest::Client`] mapping failures into
/// [`InstallError::Network`] with the offending URL attached.
#[derive(Debug, Clone)]
pub struct Http {
    client: Client,
}

impl Http {
    pub fn new(config: HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .cookie_store(true)
            .build()
            .map_err(|source| InstallError::Network {
                url: "building http client".to_string(),
                source,
            })?;
        Ok(Self { client })
    }

    /// GETs a page, returning its final URL (after redirects) and body text.
    pub async fn get_text(&self, url: &Url, query: &[(&str, &str)]) -> Result<(Url, String)> {
        debug!(%url, "fetching page");
        let mut request = self.client.get(url.as_str());
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(|source| InstallError::Network {
                url: url.to_string(),
                source,
            })?;
        let final_url = Url::new(response.url().as_str());
        let body = response.text().await.map_err(|source| InstallError::Network {
            url: final_url.to_string(),
            source,
        })?;
        Ok((final_url, body))
    }

    /// GETs a download, returning the raw response for the caller to drain.
    pub async fn get(&self, url: &Url) -> Result<Response> {
        debug!(%url, "fetching file");
        self.client
            .get(url.as_str())
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(|source| InstallError::Network {
                url: url.to_string(),
                source,
            })
    }
}
