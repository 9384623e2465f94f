//! GeoJSON shapes carried by organizations, project groups, services and
//! stations.
//!
//! TDEI only accepts a FeatureCollection holding one Polygon feature. The
//! types stay permissive (plain strings for the `type` tags, `Vec<f64>`
//! positions) so both valid and deliberately malformed polygons can be
//! expressed and round-tripped.

use serde::{Deserialize, Serialize};

pub const FEATURE_COLLECTION: &str = "FeatureCollection";
pub const FEATURE: &str = "Feature";
pub const POLYGON: &str = "Polygon";

/// A GeoJSON position: `[longitude, latitude]`.
pub type Position = Vec<f64>;

/// Polygon geometry: a list of linear rings, the first being the exterior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<Vec<Position>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
    pub geometry: Geometry,
}

/// FeatureCollection wrapper the API calls `polygon`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl Polygon {
    /// Wraps one exterior ring in a single-feature FeatureCollection.
    pub fn from_ring(ring: Vec<Position>) -> Self {
        Polygon {
            kind: FEATURE_COLLECTION.to_string(),
            features: vec![Feature {
                kind: FEATURE.to_string(),
                properties: serde_json::Map::new(),
                geometry: Geometry {
                    kind: POLYGON.to_string(),
                    coordinates: vec![ring],
                },
            }],
        }
    }

    /// Exterior ring of the first feature, if present.
    pub fn exterior_ring(&self) -> Option<&[Position]> {
        self.features
            .first()
            .and_then(|f| f.geometry.coordinates.first())
            .map(Vec::as_slice)
    }

    /// True when this is a one-feature FeatureCollection whose Polygon ring
    /// has at least 4 positions and ends where it starts.
    pub fn is_valid(&self) -> bool {
        self.kind == FEATURE_COLLECTION
            && self.features.len() == 1
            && self.features[0].kind == FEATURE
            && self.features[0].geometry.kind == POLYGON
            && self.exterior_ring().is_some_and(is_closed_ring)
    }
}

/// A ring is closed when it has ≥4 positions and the last equals the first.
pub fn is_closed_ring(ring: &[Position]) -> bool {
    ring.len() >= 4 && ring.first() == ring.last()
}

/// `[min_lon, min_lat, max_lon, max_lat]` filter accepted by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox(pub [f64; 4]);

impl BoundingBox {
    /// Query pairs with the repeated `bbox` key the gateway expects.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        self.0.iter().map(|v| ("bbox", v.to_string())).collect()
    }
}
