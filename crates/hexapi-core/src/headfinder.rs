//! # HEADFinder Module
//!
//! Query parameters and response parsing for the HEAD Aerospace HEADFinder
//! external search API.
//!
//! HEADFinder takes its filters as a URL query string and answers with a
//! `&key=value` text body in which the scene list is embedded as JSON:
//!
//! ```text
//! &result=ok&jsonscenelist=[{...},{...}]&hits=2&...
//! ```

use crate::error::CoreError;
use crate::geometry::BoundingBox;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Hard server-side cap on `maxscenes`.
pub const MAX_SCENES: u32 = 50;

/// Satellites searched when the caller does not pick any.
pub const DEFAULT_SATELLITES: &[&str] = &["SuperView", "EarthScanner-KF1"];

const SCENE_LIST_MARKER: &str = "&jsonscenelist=";
const HITS_MARKER: &str = "&hits=";

/// Characters left as-is in the query string: unreserved plus `, $ ( )`,
/// which HEADFinder expects unescaped inside `aoi` and `satellites`.
const QUERY_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b',')
    .remove(b'$')
    .remove(b'(')
    .remove(b')');

/// Filters for a HEADFinder scene search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadFinderQuery {
    pub bbox: Option<BoundingBox>,
    /// AOI as a HEAD polygon, e.g. `polygon(((53.7,5.0),(52.0,26.3),...))`.
    /// Takes precedence over `bbox`.
    pub geometry: Option<String>,
    pub satellites: Vec<String>,
    pub scene_name: Option<String>,
    /// Exact match when true, partial otherwise.
    pub scene_name_exact_match: bool,
    /// Clamped to 1..=50.
    pub max_scenes: u32,
    /// `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// `YYYY-MM-DD`
    pub end_date: Option<String>,
    /// Maximum cloud cover percentage; 0 leaves it out.
    pub cloud_cover: u32,
    /// Maximum off-nadir angle; 0 leaves it out.
    pub incidence_angle: u32,
}

impl Default for HeadFinderQuery {
    fn default() -> Self {
        Self {
            bbox: None,
            geometry: None,
            satellites: Vec::new(),
            scene_name: None,
            scene_name_exact_match: true,
            max_scenes: MAX_SCENES,
            start_date: None,
            end_date: None,
            cloud_cover: 100,
            incidence_angle: 60,
        }
    }
}

impl HeadFinderQuery {
    /// Ordered query parameters for `user_key`.
    #[must_use]
    pub fn params(&self, user_key: &str) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = vec![
            ("req".into(), "d01".into()),
            ("category".into(), "searchapi-01".into()),
            ("user".into(), user_key.into()),
            ("overlapmin".into(), "10".into()),
        ];
        let mut push = |key: &str, value: String| params.push((key.to_string(), value));

        if let Some(geometry) = self.geometry.as_deref().filter(|g| !g.is_empty()) {
            push("aoi", geometry.to_string());
        } else if let Some(bbox) = &self.bbox {
            push("aoi", bbox.to_head_rectangle());
        }

        push("satellites", self.satellites_param());

        if let Some(name) = self.scene_name.as_deref().filter(|n| !n.is_empty()) {
            push("scenename", name.to_string());
        }
        let matching = if self.scene_name_exact_match {
            "exact"
        } else {
            "partial"
        };
        push("scenenamematch", matching.to_string());
        push("maxscenes", clamp_max_scenes(self.max_scenes).to_string());

        if let Some(start) = self.start_date.as_deref().filter(|d| !d.is_empty()) {
            push("datestart", start.to_string());
        }
        if let Some(end) = self.end_date.as_deref().filter(|d| !d.is_empty()) {
            push("dateend", end.to_string());
        }
        if self.cloud_cover != 0 {
            push("cloudmax", self.cloud_cover.to_string());
        }
        if self.incidence_angle != 0 {
            push("offnadirmax", self.incidence_angle.to_string());
        }

        params
    }

    /// `$SuperView$EarthScanner-KF1$` style satellite list.
    fn satellites_param(&self) -> String {
        if self.satellites.is_empty() {
            format!("${}$", DEFAULT_SATELLITES.join("$"))
        } else {
            format!("${}$", self.satellites.join("$"))
        }
    }
}

/// Clamp a requested scene count into what the server accepts.
///
/// Zero means "as many as allowed".
#[must_use]
pub const fn clamp_max_scenes(requested: u32) -> u32 {
    if requested == 0 || requested > MAX_SCENES {
        MAX_SCENES
    } else {
        requested
    }
}

/// Form-encode parameters, leaving `, $ ( )` readable.
#[must_use]
pub fn encode_query(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_component(raw: &str) -> String {
    // `+` is already escaped as %2B, so only real spaces turn into `+`.
    utf8_percent_encode(raw, QUERY_SET)
        .to_string()
        .replace("%20", "+")
}

/// Scenes extracted from a HEADFinder response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneList {
    pub scenes: Vec<Value>,
    pub hits: Option<u64>,
}

impl SceneList {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

/// Pull `jsonscenelist` and `hits` out of a response body.
pub fn parse_scene_list(body: &str) -> Result<SceneList, CoreError> {
    let (_, after) = body.split_once(SCENE_LIST_MARKER).ok_or_else(|| {
        CoreError::MalformedResponse("missing jsonscenelist in HEADFinder response".to_string())
    })?;

    let (list, rest) = match after.split_once(HITS_MARKER) {
        Some((list, rest)) => (list, Some(rest)),
        None => (after.split('&').next().unwrap_or_default(), None),
    };

    let scenes: Vec<Value> = if list.trim().is_empty() {
        Vec::new()
    } else {
        serde_json::from_str(list)?
    };

    let hits = rest
        .and_then(|rest| rest.split('&').next())
        .and_then(|hits| hits.trim().parse().ok());

    Ok(SceneList { scenes, hits })
}
