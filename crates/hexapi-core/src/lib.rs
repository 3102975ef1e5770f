//! # hexapi-core - The Logic
//!
//! Request payloads, filter encoding and response models for the satellite
//! imagery catalogues supported by hexapi:
//!
//! - Airbus OneAtlas (opensearch catalogue, WMTS tiles, data usage)
//! - Airbus GeoStore (federated search, quicklooks)
//! - Airbus Tasking (contract scoped tasking listings)
//! - HEAD Aerospace HEADFinder (scene search)
//!
//! Nothing in this crate performs I/O. The HTTP transport lives in
//! `hexapi-client`, which turns these values into requests.
//!
//! ```text
//! ┌──────────────────┐   payload / URL    ┌──────────────────┐
//! │  hexapi-core     │ ─────────────────► │  hexapi-client   │ ──► HTTPS
//! │  (THE LOGIC)     │ ◄───────────────── │  (THE KIT)       │
//! └──────────────────┘   typed responses  └──────────────────┘
//! ```

pub mod cache;
pub mod endpoints;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod geostore;
pub mod headfinder;
pub mod oneatlas;
pub mod tasking;
pub mod usage;

pub use cache::{CacheStats, LruCache, TileCache, TileKey};
pub use endpoints::{Endpoints, TileCoord};
pub use error::CoreError;
pub use filter::{included_range, less_than_or_equal};
pub use geometry::BoundingBox;
pub use geostore::{GeoStoreFeature, GeoStoreQuery, GeoStoreSearchResponse, ImageSize};
pub use headfinder::{HeadFinderQuery, SceneList};
pub use oneatlas::{OneAtlasFeature, OneAtlasQuery, OneAtlasSearchResponse};
pub use usage::{DataUsage, Subscription, SubscriptionPage};
