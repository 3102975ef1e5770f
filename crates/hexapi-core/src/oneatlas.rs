//! # OneAtlas Module
//!
//! Search payload and response model for the OneAtlas opensearch catalogue.
//!
//! Unset filters are left out of the payload entirely. Empty strings, empty
//! lists and zero-valued numeric filters count as unset.

use crate::filter::{date_range, upper_bound};
use crate::geometry::BoundingBox;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default sort order: newest acquisitions first, then least cloudy.
pub const DEFAULT_SORT: &str = "-acquisitionDate,cloudCover";

/// Default page size.
pub const DEFAULT_COUNT: u32 = 20;

/// Filters for a OneAtlas search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneAtlasQuery {
    pub bbox: Option<BoundingBox>,
    /// WKT geometry. Should not duplicate `bbox`.
    pub geometry: Option<String>,
    pub acquisition_date_range: Option<(String, String)>,
    pub publication_date_range: Option<(String, String)>,
    /// Maximum cloud cover percentage.
    pub cloud_cover: Option<f64>,
    /// Maximum snow cover percentage.
    pub snow_cover: Option<f64>,
    pub commercial_reference: Option<String>,
    /// e.g. `["PHR"]` or `["PHR", "SPOT"]`
    pub constellation: Vec<String>,
    /// Maximum incidence angle.
    pub incidence_angle: Option<f64>,
    /// Source id in other catalogues.
    pub parent_identifier: Option<String>,
    pub platform: Vec<String>,
    pub product_type: Vec<String>,
    pub production_status: Vec<String>,
    /// Maximum resolution.
    pub resolution: Option<f64>,
    /// Product identifier.
    pub source_identifier: Option<String>,
    /// Workspace id or name.
    pub workspace: Option<String>,
    /// e.g. `["SENSOR", "ALBUM"]`
    pub processing_level: Vec<String>,
    pub count: u32,
    pub start_page: u32,
    pub sort_key: String,
}

impl Default for OneAtlasQuery {
    fn default() -> Self {
        Self {
            bbox: None,
            geometry: None,
            acquisition_date_range: None,
            publication_date_range: None,
            cloud_cover: Some(100.0),
            snow_cover: Some(100.0),
            commercial_reference: None,
            constellation: vec!["PHR".to_string(), "SPOT".to_string()],
            incidence_angle: None,
            parent_identifier: None,
            platform: Vec::new(),
            product_type: Vec::new(),
            production_status: Vec::new(),
            resolution: None,
            source_identifier: None,
            workspace: None,
            processing_level: vec!["SENSOR".to_string(), "ALBUM".to_string()],
            count: DEFAULT_COUNT,
            start_page: 1,
            sort_key: DEFAULT_SORT.to_string(),
        }
    }
}

impl OneAtlasQuery {
    /// Build the JSON body for `POST /api/v1/opensearch`.
    #[must_use]
    pub fn payload(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("itemsPerPage".into(), self.count.into());
        payload.insert("startPage".into(), self.start_page.into());
        payload.insert("sortBy".into(), self.sort_key.clone().into());

        if let Some(bbox) = &self.bbox {
            payload.insert("bbox".into(), bbox.to_csv().into());
        }
        put_text(&mut payload, "geometry", self.geometry.as_deref());
        put_opt(&mut payload, "incidenceAngle", upper_bound(self.incidence_angle));
        put_opt(
            &mut payload,
            "acquisitionDate",
            date_range(self.acquisition_date_range.as_ref()),
        );
        put_opt(
            &mut payload,
            "publicationDate",
            date_range(self.publication_date_range.as_ref()),
        );
        put_opt(&mut payload, "cloudCover", upper_bound(self.cloud_cover));
        put_opt(&mut payload, "snowCover", upper_bound(self.snow_cover));
        put_text(
            &mut payload,
            "commercialReference",
            self.commercial_reference.as_deref(),
        );
        put_text(
            &mut payload,
            "parentIdentifier",
            self.parent_identifier.as_deref(),
        );
        put_joined(&mut payload, "constellation", &self.constellation);
        put_joined(&mut payload, "platform", &self.platform);
        put_joined(&mut payload, "productType", &self.product_type);
        put_text(
            &mut payload,
            "sourceIdentifier",
            self.source_identifier.as_deref(),
        );
        put_text(&mut payload, "workspace", self.workspace.as_deref());
        put_joined(&mut payload, "processingLevel", &self.processing_level);
        put_joined(&mut payload, "productionStatus", &self.production_status);
        put_opt(&mut payload, "resolution", upper_bound(self.resolution));

        payload
    }
}

fn put_opt(payload: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(value) = value {
        payload.insert(key.to_string(), Value::String(value));
    }
}

fn put_text(payload: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    put_opt(
        payload,
        key,
        value.filter(|v| !v.is_empty()).map(str::to_string),
    );
}

fn put_joined(payload: &mut Map<String, Value>, key: &str, values: &[String]) {
    if !values.is_empty() {
        payload.insert(key.to_string(), Value::String(values.join(",")));
    }
}

// =============================================================================
// RESPONSE TYPES
// =============================================================================

/// A page of OneAtlas search results (GeoJSON feature collection).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneAtlasSearchResponse {
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub items_per_page: u64,
    #[serde(default)]
    pub start_index: Option<u64>,
    #[serde(default)]
    pub features: Vec<OneAtlasFeature>,
}

/// One catalogue item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneAtlasFeature {
    #[serde(default)]
    pub geometry: Value,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(rename = "_links", default)]
    pub links: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OneAtlasFeature {
    /// URL of the quicklook thumbnail (`_links.thumbnail.href`).
    pub fn thumbnail_href(&self) -> Option<&str> {
        self.links.get("thumbnail")?.get("href")?.as_str()
    }

    /// Catalogue id of the item (`properties.id`).
    pub fn id(&self) -> Option<&str> {
        self.properties.get("id")?.as_str()
    }
}
