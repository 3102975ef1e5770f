//! # Endpoints
//!
//! Service URLs for every catalogue. The defaults point at production;
//! every field can be replaced, which is how the client tests talk to a
//! local mock server.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

/// Everything but RFC 3986 unreserved characters is escaped in a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

/// OpenID Connect token endpoint for Airbus API keys.
pub const AIRBUS_AUTH_URL: &str = "https://authenticate.foundation.api.oneatlas.airbus.com/auth/realms/IDP/protocol/openid-connect/token";

/// Airbus data API (account, services, contracts).
pub const AIRBUS_DATA_API_URL: &str = "https://data.api.oneatlas.airbus.com";

/// OneAtlas opensearch endpoint.
pub const ONEATLAS_SEARCH_URL: &str =
    "https://search.foundation.api.oneatlas.airbus.com/api/v1/opensearch";

/// OneAtlas WMTS tile template.
///
/// Placeholders: `{id}`, `{epsg}`, `{z}`, `{x}`, `{y}`.
pub const ONEATLAS_WMTS_TEMPLATE: &str = "https://access.foundation.api.oneatlas.airbus.com/api/v1/items/{id}/wmts/tiles/1.0.0/default/rgb/EPSG{epsg}/{z}/{x}/{y}.png";

/// Default projection for WMTS tiles (web mercator).
pub const DEFAULT_EPSG: u32 = 3857;

/// GeoStore federated search endpoint.
pub const GEOSTORE_SEARCH_URL: &str = "https://search.federated.geoapi-airbusds.com/api/v1/search";

/// Base URL for the Tasking API.
pub const TASKING_API_URL: &str = "https://search.foundation.api.oneatlas.airbus.com";

/// HEADFinder external search endpoint.
pub const HEADFINDER_SEARCH_URL: &str = "https://headfinder.head-aerospace.eu/search-ext-01/";

/// Every service URL used by the clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub auth: String,
    pub data_api: String,
    pub oneatlas_search: String,
    pub oneatlas_wmts: String,
    pub geostore_search: String,
    pub tasking_api: String,
    pub headfinder_search: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            auth: AIRBUS_AUTH_URL.to_string(),
            data_api: AIRBUS_DATA_API_URL.to_string(),
            oneatlas_search: ONEATLAS_SEARCH_URL.to_string(),
            oneatlas_wmts: ONEATLAS_WMTS_TEMPLATE.to_string(),
            geostore_search: GEOSTORE_SEARCH_URL.to_string(),
            tasking_api: TASKING_API_URL.to_string(),
            headfinder_search: HEADFINDER_SEARCH_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Point every service at one base URL, keeping production paths.
    ///
    /// Used with mock servers: `Endpoints::with_base(&server.uri())`.
    #[must_use]
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            auth: format!("{base}/auth/realms/IDP/protocol/openid-connect/token"),
            data_api: base.to_string(),
            oneatlas_search: format!("{base}/api/v1/opensearch"),
            oneatlas_wmts: format!(
                "{base}/api/v1/items/{{id}}/wmts/tiles/1.0.0/default/rgb/EPSG{{epsg}}/{{z}}/{{x}}/{{y}}.png"
            ),
            geostore_search: format!("{base}/api/v1/search"),
            tasking_api: base.to_string(),
            headfinder_search: format!("{base}/search-ext-01/"),
        }
    }

    /// `/api/v1/me`
    #[must_use]
    pub fn me_url(&self) -> String {
        format!("{}/api/v1/me", self.data_api.trim_end_matches('/'))
    }

    /// `/api/v1/me/services`
    #[must_use]
    pub fn services_url(&self) -> String {
        format!("{}/api/v1/me/services", self.data_api.trim_end_matches('/'))
    }

    /// `/api/v1/contracts/{contract_id}/subscriptions`
    #[must_use]
    pub fn subscriptions_url(&self, contract_id: &str) -> String {
        format!(
            "{}/api/v1/contracts/{contract_id}/subscriptions",
            self.data_api.trim_end_matches('/')
        )
    }

    /// Render the WMTS template for one tile.
    #[must_use]
    pub fn wmts_tile_url(&self, item_id: &str, tile: TileCoord, epsg: u32) -> String {
        wmts_tile_url(&self.oneatlas_wmts, item_id, tile, epsg)
    }
}

/// A tile address in a WMTS grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub z: u32,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    #[must_use]
    pub const fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }
}

/// Fill a WMTS template.
///
/// The item id is escaped as a single path segment and substituted last, so
/// it can neither add path components nor fill another placeholder.
pub fn wmts_tile_url(template: &str, item_id: &str, tile: TileCoord, epsg: u32) -> String {
    let item_id = utf8_percent_encode(item_id, PATH_SEGMENT).to_string();
    template
        .replace("{epsg}", &epsg.to_string())
        .replace("{z}", &tile.z.to_string())
        .replace("{x}", &tile.x.to_string())
        .replace("{y}", &tile.y.to_string())
        .replace("{id}", &item_id)
}
