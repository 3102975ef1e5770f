//! Client configuration
//!
//! Credentials, endpoints and transport settings shared by every client.

use crate::error::{ClientError, Result};
use hexapi_core::Endpoints;
use hexapi_core::cache::DEFAULT_TILE_CACHE_SIZE;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the Airbus API key.
pub const ENV_AIRBUS_API_KEY: &str = "HEXAPI_AIRBUS_API_KEY";
/// Environment variable holding the HEADFinder user key.
pub const ENV_HEADFINDER_USER_KEY: &str = "HEXAPI_HEADFINDER_USER_KEY";
/// Environment variable overriding the request timeout, in seconds.
pub const ENV_TIMEOUT_SECS: &str = "HEXAPI_TIMEOUT_SECS";
/// Environment variable enabling a client-side rate limit.
pub const ENV_REQUESTS_PER_SECOND: &str = "HEXAPI_RPS";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings shared by all catalogue clients.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key from https://account.foundation.oneatlas.airbus.com/
    pub airbus_api_key: Option<String>,
    /// User key issued by HEAD Aerospace.
    pub headfinder_user_key: Option<String>,
    pub endpoints: Endpoints,
    pub timeout: Duration,
    /// Client-side cap on outgoing requests. `None` means unlimited.
    pub requests_per_second: Option<NonZeroU32>,
    /// Number of WMTS tiles kept in memory by the OneAtlas client.
    pub tile_cache_size: usize,
    /// Where quicklooks are written. `None` uses the system temp dir.
    pub download_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            airbus_api_key: None,
            headfinder_user_key: None,
            endpoints: Endpoints::default(),
            timeout: DEFAULT_TIMEOUT,
            requests_per_second: None,
            tile_cache_size: DEFAULT_TILE_CACHE_SIZE,
            download_dir: None,
        }
    }
}

impl ClientConfig {
    /// Read credentials and transport settings from the environment.
    ///
    /// Unparseable numeric values are an error rather than silently ignored.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Self::from_env`] with variables taken from `lookup`.
    ///
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self {
            airbus_api_key: var(ENV_AIRBUS_API_KEY),
            headfinder_user_key: var(ENV_HEADFINDER_USER_KEY),
            ..Self::default()
        };

        if let Some(secs) = var(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.parse().map_err(|_| {
                ClientError::Config(format!("{ENV_TIMEOUT_SECS} must be an integer, got '{secs}'"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(rps) = var(ENV_REQUESTS_PER_SECOND) {
            let rps: u32 = rps.parse().map_err(|_| {
                ClientError::Config(format!(
                    "{ENV_REQUESTS_PER_SECOND} must be an integer, got '{rps}'"
                ))
            })?;
            config.requests_per_second = NonZeroU32::new(rps);
        }

        Ok(config)
    }

    #[must_use]
    pub fn with_airbus_key(mut self, key: impl Into<String>) -> Self {
        self.airbus_api_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_headfinder_key(mut self, key: impl Into<String>) -> Self {
        self.headfinder_user_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    #[must_use]
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = Some(dir.into());
        self
    }

    pub(crate) fn airbus_key(&self) -> Result<&str> {
        self.airbus_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                ClientError::Config(format!("Airbus API key not set (use {ENV_AIRBUS_API_KEY})"))
            })
    }

    pub(crate) fn headfinder_key(&self) -> Result<&str> {
        self.headfinder_user_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                ClientError::Config(format!(
                    "HEADFinder user key not set (use {ENV_HEADFINDER_USER_KEY})"
                ))
            })
    }
}
