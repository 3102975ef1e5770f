//! HEADFinder client
//!
//! HEADFinder authenticates with a user key sent as a query parameter, so
//! there is no token exchange and no session.

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::http::HttpClient;
use hexapi_core::headfinder::{encode_query, parse_scene_list};
use hexapi_core::{HeadFinderQuery, SceneList};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct HeadFinderClient {
    http: HttpClient,
    search_url: String,
    user_key: String,
}

impl HeadFinderClient {
    /// Build a client from config.
    ///
    /// # Errors
    ///
    /// [`crate::ClientError::Config`] when no user key is configured.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
            search_url: config.endpoints.headfinder_search.clone(),
            user_key: config.headfinder_key()?.to_string(),
        })
    }

    /// Full request URL for a query.
    pub fn search_url(&self, query: &HeadFinderQuery) -> String {
        let params = query.params(&self.user_key);
        format!("{}?{}", self.search_url, encode_query(&params))
    }

    /// Run a search and return the raw response body.
    pub async fn search_raw(&self, query: &HeadFinderQuery) -> Result<String> {
        let url = self.search_url(query);
        debug!(url = %self.search_url, "HEADFinder search");
        let response = self
            .http
            .send_ok(self.http.inner().get(&url))
            .await
            .map_err(hide_user_key)?;
        response
            .text()
            .await
            .map_err(|e| hide_user_key(ClientError::Http(e)))
    }

    /// Run a search and parse the scene list out of the response.
    pub async fn search(&self, query: &HeadFinderQuery) -> Result<SceneList> {
        let body = self.search_raw(query).await?;
        Ok(parse_scene_list(&body)?)
    }
}

/// Transport errors carry the request URL, user key included.
fn hide_user_key(err: ClientError) -> ClientError {
    match err {
        ClientError::Http(e) => ClientError::Http(e.without_url()),
        other => other,
    }
}
