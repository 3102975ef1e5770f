//! Shared HTTP transport
//!
//! One `reqwest::Client` (connection pool, timeout, user agent) plus the
//! optional rate limiter, cloned into every catalogue client.

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("hexapi/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("client", &self.client)
            .field("rate_limited", &self.limiter.is_some())
            .finish()
    }
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        let limiter = config
            .requests_per_second
            .map(|rps| Arc::new(RateLimiter::direct(Quota::per_second(rps))));

        Ok(Self { client, limiter })
    }

    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Send a request, waiting for the rate limiter first.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
        let response = request.send().await?;
        debug!(
            url = %without_query(response.url()),
            status = %response.status(),
            "response received"
        );
        Ok(response)
    }

    /// Send and reject any non-success status.
    pub async fn send_ok(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.send(request).await?;
        ensure_success(response)
    }
}

/// Map 403 to [`ClientError::Forbidden`] and other failures to
/// [`ClientError::Status`].
pub fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = without_query(response.url());
    warn!(%url, %status, "request failed");
    if status == StatusCode::FORBIDDEN {
        Err(ClientError::Forbidden { url })
    } else {
        Err(ClientError::Status {
            status: status.as_u16(),
            url,
        })
    }
}

/// URL text safe for logs and errors.
///
/// HEADFinder authenticates with a `user` query parameter, so query strings
/// never leave this module.
pub(crate) fn without_query(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_dropped_from_reported_urls() {
        let url = Url::parse("https://headfinder.example/search-ext-01/?req=d01&user=SECRET").unwrap();
        assert_eq!(without_query(&url), "https://headfinder.example/search-ext-01/");
    }
}
