//! GeoJSON boundary loading.
//!
//! Only the parts of a FeatureCollection needed to build a boundary lookup
//! are modelled: each feature's properties and its Polygon/MultiPolygon
//! geometry. Other geometry types deserialize to [`GeoJsonGeometry::Other`]
//! and are skipped by the registry.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{GeometryError, GeometryResult};
use crate::polygon::{MultiPolygon, Polygon, Ring};

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

/// A GeoJSON Feature.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,

    #[serde(default)]
    pub geometry: Option<GeoJsonGeometry>,
}

impl Feature {
    /// Read a property as an identifier string. Numbers are accepted and
    /// rendered without a fractional part when integral.
    pub fn identifier(&self, field: &str) -> Option<String> {
        match self.properties.as_ref()?.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// GeoJSON geometry types relevant to area boundaries.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    /// Array of linear rings (first is exterior, rest are holes).
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },

    /// Array of polygons.
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Vec<f64>>>>,
    },

    #[serde(other)]
    Other,
}

impl GeoJsonGeometry {
    /// Convert to a [`MultiPolygon`]; `Ok(None)` for non-areal geometries.
    pub fn to_multipolygon(&self) -> GeometryResult<Option<MultiPolygon>> {
        match self {
            Self::Polygon { coordinates } => {
                Ok(Some(MultiPolygon::from(polygon_from_rings(coordinates)?)))
            }
            Self::MultiPolygon { coordinates } => {
                let polygons = coordinates
                    .iter()
                    .map(|rings| polygon_from_rings(rings))
                    .collect::<GeometryResult<Vec<_>>>()?;
                Ok(Some(MultiPolygon::new(polygons)))
            }
            Self::Other => Ok(None),
        }
    }
}

/// Parse a FeatureCollection from a JSON string.
pub fn parse_feature_collection(json: &str) -> GeometryResult<FeatureCollection> {
    Ok(serde_json::from_str(json)?)
}

fn polygon_from_rings(rings: &[Vec<Vec<f64>>]) -> GeometryResult<Polygon> {
    let mut rings = rings.iter().map(|ring| to_ring(ring));
    let exterior = rings
        .next()
        .ok_or_else(|| GeometryError::DegenerateRing("polygon has no rings".to_string()))??;
    let holes = rings.collect::<GeometryResult<Vec<_>>>()?;
    Polygon::new(exterior, holes)
}

fn to_ring(positions: &[Vec<f64>]) -> GeometryResult<Ring> {
    positions
        .iter()
        .map(|pos| match pos.as_slice() {
            [lon, lat, ..] => Ok((*lon, *lat)),
            _ => Err(GeometryError::InvalidCoordinate(format!(
                "position needs at least 2 values, got {:?}",
                pos
            ))),
        })
        .collect()
}
