//! # GeoStore Module
//!
//! Search payload, sort key mapping and response model for the GeoStore
//! federated catalogue.

use crate::filter::{date_range, upper_bound};
use crate::geometry::BoundingBox;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Translate a user sort key into GeoStore `sortKeys`.
///
/// A leading `-` sorts descending. `date` and `cloud_rate` are the only
/// recognised keys; anything else sorts by acquisition date.
///
/// ```
/// use hexapi_core::geostore::sort_keys;
///
/// assert_eq!(sort_keys("-date"), "acquisitionDate,,0");
/// assert_eq!(sort_keys("cloud_rate"), "cloudCover,,1");
/// ```
pub fn sort_keys(sort_key: &str) -> String {
    let (name, order) = match sort_key.strip_prefix('-') {
        Some(rest) => (rest, '0'),
        None => (sort_key, '1'),
    };
    let key = match name {
        "cloud_rate" => "cloudCover",
        _ => "acquisitionDate",
    };
    format!("{key},,{order}")
}

/// Quicklook size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImageSize {
    Small,
    Medium,
    #[default]
    Large,
}

impl ImageSize {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "SMALL",
            Self::Medium => "MEDIUM",
            Self::Large => "LARGE",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SMALL" => Ok(Self::Small),
            "MEDIUM" => Ok(Self::Medium),
            "LARGE" => Ok(Self::Large),
            other => Err(format!("unknown image size '{other}'")),
        }
    }
}

/// Filters for a GeoStore search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoStoreQuery {
    pub bbox: Option<BoundingBox>,
    pub geometry: Option<String>,
    pub constellation: Vec<String>,
    pub acquisition_date_range: Option<(String, String)>,
    pub polarisation_channels: Vec<String>,
    pub product_type: Vec<String>,
    pub resolution: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub snow_cover: Option<f64>,
    pub incidence_angle: Option<f64>,
    pub sensor_type: Option<String>,
    pub antenna_look_direction: Option<String>,
    pub orbit_direction: Option<String>,
    pub count: u32,
    pub start_page: u32,
    /// `date`, `cloud_rate`, optionally prefixed with `-`.
    pub sort_key: String,
}

impl Default for GeoStoreQuery {
    fn default() -> Self {
        Self {
            bbox: None,
            geometry: None,
            constellation: Vec::new(),
            acquisition_date_range: None,
            polarisation_channels: Vec::new(),
            product_type: Vec::new(),
            resolution: None,
            cloud_cover: None,
            snow_cover: None,
            incidence_angle: None,
            sensor_type: None,
            antenna_look_direction: None,
            orbit_direction: None,
            count: 20,
            start_page: 1,
            sort_key: "-date".to_string(),
        }
    }
}

impl GeoStoreQuery {
    /// Build the JSON body for `POST /api/v1/search`.
    #[must_use]
    pub fn payload(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("count".into(), self.count.into());
        payload.insert("startPage".into(), self.start_page.into());
        payload.insert("sortKeys".into(), sort_keys(&self.sort_key).into());

        if let Some(geometry) = self.geometry.as_deref().filter(|g| !g.is_empty()) {
            payload.insert("geometry".into(), geometry.into());
        }
        if let Some(bbox) = &self.bbox {
            payload.insert("bbox".into(), bbox.as_array().to_vec().into());
        }
        put_list(&mut payload, "constellation", &self.constellation);
        if let Some(dates) = date_range(self.acquisition_date_range.as_ref()) {
            payload.insert("acquisitionDate".into(), dates.into());
        }
        put_list(
            &mut payload,
            "polarisationChannels",
            &self.polarisation_channels,
        );
        put_list(&mut payload, "productType", &self.product_type);

        for (key, value) in [
            ("resolution", self.resolution),
            ("cloudCover", self.cloud_cover),
            ("snowCover", self.snow_cover),
            ("incidenceAngle", self.incidence_angle),
        ] {
            if let Some(bound) = upper_bound(value) {
                payload.insert(key.into(), bound.into());
            }
        }

        for (key, value) in [
            ("sensorType", &self.sensor_type),
            ("antennaLookDirection", &self.antenna_look_direction),
            ("orbitDirection", &self.orbit_direction),
        ] {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                payload.insert(key.into(), value.into());
            }
        }

        payload
    }
}

fn put_list(payload: &mut Map<String, Value>, key: &str, values: &[String]) {
    if !values.is_empty() {
        payload.insert(key.to_string(), values.to_vec().into());
    }
}

// =============================================================================
// RESPONSE TYPES
// =============================================================================

/// A page of GeoStore search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoStoreSearchResponse {
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub features: Vec<GeoStoreFeature>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A quicklook reference attached to a GeoStore feature.
///
/// `size` is kept as sent: the catalogue may label quicklooks with sizes
/// beyond the three [`ImageSize`] values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quicklook {
    #[serde(default)]
    pub size: String,
    pub image: String,
}

/// One GeoStore catalogue item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoStoreFeature {
    #[serde(default)]
    pub geometry: Value,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub quicklooks: Vec<Quicklook>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GeoStoreFeature {
    /// Image URL of the first quicklook with the requested size.
    pub fn quicklook(&self, size: ImageSize) -> Option<&str> {
        self.quicklooks
            .iter()
            .find(|q| q.size.eq_ignore_ascii_case(size.as_str()))
            .map(|q| q.image.as_str())
    }
}
