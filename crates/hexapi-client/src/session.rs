//! Authenticated Airbus session
//!
//! The OneAtlas, GeoStore and Tasking clients all sit on top of one
//! [`AirbusSession`]: the transport, the endpoints and a shared
//! [`Authenticator`]. Connecting fetches a token straight away so a bad key
//! fails at construction rather than on the first search.

use crate::auth::{Authenticator, HeaderSet};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::HttpClient;
use hexapi_core::Endpoints;
use reqwest::Response;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AirbusSession {
    pub(crate) http: HttpClient,
    pub(crate) endpoints: Endpoints,
    pub(crate) auth: Arc<Authenticator>,
    pub(crate) download_dir: Option<PathBuf>,
}

impl AirbusSession {
    /// Build a session and authenticate.
    ///
    /// # Errors
    ///
    /// [`crate::ClientError::Config`] without an API key,
    /// [`crate::ClientError::Unauthorized`] when the key is rejected.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let session = Self::new(config)?;
        session.auth.token().await?;
        Ok(session)
    }

    /// Build a session without contacting the auth server.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = HttpClient::new(config)?;
        let auth = Authenticator::new(
            config.airbus_key()?,
            config.endpoints.clone(),
            http.clone(),
        );
        Ok(Self {
            http,
            endpoints: config.endpoints.clone(),
            auth: Arc::new(auth),
            download_dir: config.download_dir.clone(),
        })
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.auth
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// POST a JSON body with authenticated headers.
    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<Response> {
        self.auth
            .send_authorized(HeaderSet::Json, |headers| {
                self.http.inner().post(url).headers(headers).json(body)
            })
            .await
    }

    /// GET with authenticated headers.
    pub(crate) async fn get_json_headers(&self, url: &str) -> Result<Response> {
        self.auth
            .send_authorized(HeaderSet::Json, |headers| {
                self.http.inner().get(url).headers(headers)
            })
            .await
    }

    /// GET binary content with image headers.
    pub(crate) async fn get_image(&self, url: &str, query: &[(&str, &str)]) -> Result<Vec<u8>> {
        let response = self
            .auth
            .send_authorized(HeaderSet::Image, |headers| {
                self.http.inner().get(url).headers(headers).query(query)
            })
            .await?;
        Ok(response.bytes().await?.to_vec())
    }
}
