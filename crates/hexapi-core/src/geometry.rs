//! # Geometry Module
//!
//! Areas of interest for catalogue searches. Geometries are passed through
//! as WKT strings; bounding boxes get a proper type because every catalogue
//! wants them in a different shape.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A lon/lat bounding box in EPSG:4326.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    #[must_use]
    pub const fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// `min_lon,min_lat,max_lon,max_lat`, as OneAtlas expects it.
    #[must_use]
    pub fn to_csv(&self) -> String {
        self.to_string()
    }

    /// Raw coordinate array, as GeoStore expects it.
    #[must_use]
    pub const fn as_array(&self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }

    /// HEADFinder rectangle. Note the lat/lon order.
    #[must_use]
    pub fn to_head_rectangle(&self) -> String {
        format!(
            "rectangle(({},{}),({},{}))",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

impl FromStr for BoundingBox {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| CoreError::InvalidBoundingBox {
            input: s.to_string(),
            reason,
        };

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(invalid(format!("expected 4 values, got {}", parts.len())));
        }

        let mut values = [0.0_f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| invalid(format!("'{part}' is not a number")))?;
        }

        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }
}
