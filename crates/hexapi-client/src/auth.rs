//! Airbus authentication
//!
//! Exchanges an API key for a bearer token at the OneAtlas OpenID Connect
//! endpoint and reads account information from the data API.

use crate::error::{ClientError, Result};
use crate::http::{HttpClient, ensure_success};
use hexapi_core::{CoreError, DataUsage, Endpoints, SubscriptionPage};
use reqwest::{RequestBuilder, Response, StatusCode};
use reqwest::header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Tokens are refreshed this long before the server says they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// A bearer token and, when the server told us, its expiry.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: Option<Instant>,
}

impl AccessToken {
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at
            .is_none_or(|expires_at| now + EXPIRY_MARGIN < expires_at)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
}

/// Which authenticated header set a request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeaderSet {
    Json,
    Image,
}

/// Airbus API key authentication.
#[derive(Debug)]
pub struct Authenticator {
    api_key: String,
    endpoints: Endpoints,
    http: HttpClient,
    token: Mutex<Option<AccessToken>>,
}

impl Authenticator {
    pub fn new(api_key: impl Into<String>, endpoints: Endpoints, http: HttpClient) -> Self {
        Self {
            api_key: api_key.into(),
            endpoints,
            http,
            token: Mutex::new(None),
        }
    }

    /// Request a fresh token from the token endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] with the server's error document
    /// when the key is rejected (403).
    pub async fn fetch_token(&self) -> Result<AccessToken> {
        let request = self
            .http
            .inner()
            .post(&self.endpoints.auth)
            .header(CACHE_CONTROL, "no-cache")
            .form(&[
                ("apikey", self.api_key.as_str()),
                ("grant_type", "api_key"),
                ("client_id", "IDP"),
            ]);
        let response = self.http.send(request).await?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            let body = response.json::<Value>().await.unwrap_or(Value::Null);
            return Err(ClientError::Unauthorized { body });
        }
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: self.endpoints.auth.clone(),
            });
        }

        let parsed: TokenResponse = response.json().await?;
        let value = parsed.access_token.filter(|t| !t.is_empty()).ok_or_else(|| {
            CoreError::MalformedResponse("token response has no access_token".to_string())
        })?;
        let expires_at = parsed
            .expires_in
            .map(|secs| Instant::now() + Duration::from_secs(secs));

        info!(expires_in = ?parsed.expires_in, "obtained Airbus access token");
        Ok(AccessToken { value, expires_at })
    }

    /// Current token, fetching or refreshing it when needed.
    pub async fn token(&self) -> Result<String> {
        let mut slot = self.token.lock().await;
        if let Some(token) = slot.as_ref().filter(|t| t.is_fresh(Instant::now())) {
            return Ok(token.value.clone());
        }

        debug!("access token missing or about to expire, refreshing");
        let token = self.fetch_token().await?;
        let value = token.value.clone();
        *slot = Some(token);
        Ok(value)
    }

    /// Drop the cached token so the next request fetches a new one.
    pub async fn invalidate(&self) {
        *self.token.lock().await = None;
    }

    /// Whether the API key is accepted.
    ///
    /// A rejected key is `Ok(false)`; transport failures are still errors.
    pub async fn verify_api_key(&self) -> Result<bool> {
        match self.fetch_token().await {
            Ok(_) => Ok(true),
            Err(ClientError::Unauthorized { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// `Authorization`, JSON `Content-Type` and `Cache-Control: no-cache`.
    pub async fn json_headers(&self) -> Result<HeaderMap> {
        let mut headers = self.image_headers().await?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Same as [`Self::json_headers`] without `Content-Type`.
    pub async fn image_headers(&self) -> Result<HeaderMap> {
        let token = self.token().await?;
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| ClientError::Config(format!("Invalid token header: {e}")))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        Ok(headers)
    }

    async fn headers(&self, set: HeaderSet) -> Result<HeaderMap> {
        match set {
            HeaderSet::Json => self.json_headers().await,
            HeaderSet::Image => self.image_headers().await,
        }
    }

    /// Send an authenticated request and reject any non-success status.
    ///
    /// Tokens without `expires_in` are cached until the server stops
    /// accepting them, so a 401 drops the cached token and the request is
    /// rebuilt and sent once more with a new one.
    pub(crate) async fn send_authorized<F>(&self, set: HeaderSet, build: F) -> Result<Response>
    where
        F: Fn(HeaderMap) -> RequestBuilder,
    {
        let response = self.http.send(build(self.headers(set).await?)).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return ensure_success(response);
        }

        info!("access token rejected, fetching a new one");
        self.invalidate().await;
        let response = self.http.send(build(self.headers(set).await?)).await?;
        ensure_success(response)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .send_authorized(HeaderSet::Image, |headers| {
                self.http.inner().get(url).headers(headers)
            })
            .await?;
        Ok(response.json().await?)
    }

    /// Services available to the account (`/api/v1/me/services`).
    pub async fn roles(&self) -> Result<Value> {
        self.get_json(&self.endpoints.services_url()).await
    }

    /// Account information (`/api/v1/me`).
    pub async fn me(&self) -> Result<Value> {
        self.get_json(&self.endpoints.me_url()).await
    }

    /// `contract.id` of the account, if any.
    pub async fn contract_id(&self) -> Result<Option<String>> {
        let me = self.me().await?;
        Ok(contract_id_of(&me))
    }

    /// Subscriptions of the account's contract.
    pub async fn subscriptions(&self) -> Result<SubscriptionPage> {
        let contract_id = self
            .contract_id()
            .await?
            .ok_or(ClientError::MissingContract)?;
        self.get_json(&self.endpoints.subscriptions_url(&contract_id))
            .await
    }

    /// Usage of the first limited subscription.
    pub async fn usage(&self) -> Result<Option<DataUsage>> {
        let page = self.subscriptions().await?;
        Ok(DataUsage::first_limited(&page.items))
    }
}

fn contract_id_of(me: &Value) -> Option<String> {
    match me.get("contract")?.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn token_without_expiry_stays_fresh() {
        let token = AccessToken {
            value: "t".into(),
            expires_at: None,
        };
        assert!(token.is_fresh(Instant::now()));
    }

    #[test]
    fn token_inside_margin_is_stale() {
        let now = Instant::now();
        let token = AccessToken {
            value: "t".into(),
            expires_at: Some(now + Duration::from_secs(10)),
        };
        assert!(!token.is_fresh(now));

        let token = AccessToken {
            value: "t".into(),
            expires_at: Some(now + Duration::from_secs(3600)),
        };
        assert!(token.is_fresh(now));
    }

    #[test]
    fn contract_id_extraction() {
        assert_eq!(
            contract_id_of(&json!({"contract": {"id": "C-1"}})),
            Some("C-1".to_string())
        );
        assert_eq!(
            contract_id_of(&json!({"contract": {"id": 42}})),
            Some("42".to_string())
        );
        assert_eq!(contract_id_of(&json!({"contract": {"id": ""}})), None);
        assert_eq!(contract_id_of(&json!({"contract": null})), None);
        assert_eq!(contract_id_of(&json!({})), None);
    }
}
