//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeout
//! - GET requests to fetch page content
//! - Error classification (timeout, connection, status, other)
//!
//! Workers only see the [`Fetcher`] trait, so tests and alternative
//! transports can stand in for [`HttpFetcher`].

use crate::config::HttpConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,

    /// HTTP status code
    pub status_code: u16,

    /// Page body content
    pub body: String,
}

/// Reasons a fetch can fail
///
/// None of these abort a crawl: the job still completes, with no outbound links.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP error for {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// The URL the failed request was made for
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url }
            | Self::Connect { url, .. }
            | Self::Status { url, .. }
            | Self::Request { url, .. } => url,
        }
    }

    fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            Self::Timeout { url }
        } else if error.is_connect() {
            Self::Connect {
                url,
                message: error.to_string(),
            }
        } else {
            Self::Request { url, source: error }
        }
    }
}

/// Capability to retrieve a page body for a URL
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration (user agent and timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use site_ripple::config::HttpConfig;
/// use site_ripple::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetcher`] backed by a shared `reqwest::Client`
///
/// The client is safe for unsynchronized concurrent use by every worker.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// Fetches a URL with a single GET request
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx | `Ok(FetchedPage)` |
    /// | Any other status | `FetchError::Status` |
    /// | Timeout | `FetchError::Timeout` |
    /// | Connection refused / DNS / TLS | `FetchError::Connect` |
    /// | Body read failure, anything else | `FetchError::Request` |
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        Ok(FetchedPage {
            url: final_url,
            status_code: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&HttpConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_fetch_error_url() {
        let error = FetchError::Status {
            url: "https://example.com/missing".to_string(),
            status: 404,
        };
        assert_eq!(error.url(), "https://example.com/missing");
        assert_eq!(error.to_string(), "HTTP 404 for https://example.com/missing");
    }

    #[tokio::test]
    async fn test_connection_refused_is_reported() {
        let fetcher = HttpFetcher::new(&HttpConfig {
            timeout_secs: 5,
            ..HttpConfig::default()
        })
        .unwrap();

        // Port 9 (discard) is reserved and not expected to be listening
        let result = fetcher.fetch("http://127.0.0.1:9/").await;
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().url(), "http://127.0.0.1:9/");
    }
}
