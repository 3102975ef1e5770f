//! # hexapi-client - The Kit
//!
//! Async clients for satellite imagery catalogues.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hexapi_client::{ClientConfig, OneAtlasClient};
//! use hexapi_core::{BoundingBox, OneAtlasQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), hexapi_client::ClientError> {
//!     let config = ClientConfig::from_env()?;
//!     let oneatlas = OneAtlasClient::connect(&config).await?;
//!
//!     let query = OneAtlasQuery {
//!         bbox: Some(BoundingBox::new(-48.3, -16.0, -47.3, -15.5)),
//!         constellation: vec!["PHR".into()],
//!         cloud_cover: Some(10.0),
//!         ..OneAtlasQuery::default()
//!     };
//!     let page = oneatlas.search(&query).await?;
//!     println!("{} results", page.total_results);
//!     Ok(())
//! }
//! ```
//!
//! ## Layout
//!
//! ```text
//!                     ┌──────────────────┐
//!  OneAtlasClient ──► │                  │   POST token
//!  GeoStoreClient ──► │  AirbusSession   │ ─────────────► Airbus IDP
//!  TaskingClient  ──► │  (Authenticator) │
//!                     └──────────────────┘
//!  HeadFinderClient ─────────────────────────────────────► HEADFinder
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod geostore;
pub mod headfinder;
pub mod http;
pub mod oneatlas;
pub mod quicklook;
pub mod session;
pub mod tasking;

pub use auth::{AccessToken, Authenticator};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use geostore::GeoStoreClient;
pub use headfinder::HeadFinderClient;
pub use oneatlas::OneAtlasClient;
pub use quicklook::ImageSource;
pub use session::AirbusSession;
pub use tasking::TaskingClient;

pub use hexapi_core;
