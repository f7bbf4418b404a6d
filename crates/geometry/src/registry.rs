//! Administrative-unit boundary lookup.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{GeometryError, GeometryResult};
use crate::geojson::parse_feature_collection;
use crate::polygon::MultiPolygon;

/// Resolves an administrative unit identifier to its boundary.
pub trait GeometryRegistry: Send + Sync {
    fn lookup(&self, unit_id: &str) -> Option<Arc<MultiPolygon>>;
}

/// In-memory registry keyed by unit identifier.
///
/// When an identifier appears more than once the first boundary wins.
#[derive(Debug, Clone, Default)]
pub struct FeatureRegistry {
    features: HashMap<String, Arc<MultiPolygon>>,
}

impl FeatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a boundary. Returns `false` if the identifier was already
    /// registered, in which case the existing boundary is kept.
    pub fn insert(&mut self, unit_id: impl Into<String>, shape: MultiPolygon) -> bool {
        use std::collections::hash_map::Entry;

        match self.features.entry(unit_id.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(shape));
                true
            }
        }
    }

    /// Builder form of [`FeatureRegistry::insert`].
    pub fn with_feature(mut self, unit_id: impl Into<String>, shape: MultiPolygon) -> Self {
        self.insert(unit_id, shape);
        self
    }

    /// Build from a GeoJSON FeatureCollection, keying each areal feature by
    /// `properties[id_field]`. Non-areal features are skipped.
    pub fn from_geojson_str(json: &str, id_field: &str) -> GeometryResult<Self> {
        let collection = parse_feature_collection(json)?;
        let mut registry = Self::new();

        for (index, feature) in collection.features.iter().enumerate() {
            let Some(geometry) = &feature.geometry else {
                debug!(index, "Skipping feature without geometry");
                continue;
            };
            let Some(shape) = geometry.to_multipolygon()? else {
                debug!(index, "Skipping non-polygon feature");
                continue;
            };
            let unit_id = feature
                .identifier(id_field)
                .ok_or_else(|| GeometryError::MissingIdentifier {
                    index,
                    field: id_field.to_string(),
                })?;

            if !registry.insert(unit_id.clone(), shape) {
                debug!(unit_id = %unit_id, "Duplicate identifier; keeping first boundary");
            }
        }

        Ok(registry)
    }

    /// Load a GeoJSON boundary file.
    pub fn from_geojson_file(path: impl AsRef<Path>, id_field: &str) -> GeometryResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let registry = Self::from_geojson_str(&json, id_field)?;

        info!(
            path = %path.display(),
            id_field = id_field,
            features = registry.len(),
            "Loaded boundary registry"
        );

        Ok(registry)
    }

    pub fn contains(&self, unit_id: &str) -> bool {
        self.features.contains_key(unit_id)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl GeometryRegistry for FeatureRegistry {
    fn lookup(&self, unit_id: &str) -> Option<Arc<MultiPolygon>> {
        self.features.get(unit_id).cloned()
    }
}

impl<K: Into<String>> FromIterator<(K, MultiPolygon)> for FeatureRegistry {
    fn from_iter<I: IntoIterator<Item = (K, MultiPolygon)>>(iter: I) -> Self {
        let mut registry = Self::new();
        for (unit_id, shape) in iter {
            registry.insert(unit_id, shape);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::Polygon;

    #[test]
    fn test_first_boundary_wins() {
        let mut registry = FeatureRegistry::new();
        assert!(registry.insert("22", Polygon::rectangle(0.0, 0.0, 1.0, 1.0).into()));
        assert!(!registry.insert("22", Polygon::rectangle(5.0, 5.0, 6.0, 6.0).into()));

        let shape = registry.lookup("22").unwrap();
        assert!(shape.contains_point(0.5, 0.5));
        assert!(!shape.contains_point(5.5, 5.5));
    }

    #[test]
    fn test_lookup_missing() {
        let registry: FeatureRegistry =
            [("22001", MultiPolygon::from(Polygon::rectangle(0.0, 0.0, 1.0, 1.0)))]
                .into_iter()
                .collect();
        assert!(registry.contains("22001"));
        assert!(registry.lookup("22003").is_none());
    }

    #[test]
    fn test_missing_identifier_is_an_error() {
        let json = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"NAME":"x"},
             "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}}
        ]}"#;
        let err = FeatureRegistry::from_geojson_str(json, "GEOID").unwrap_err();
        assert!(matches!(err, GeometryError::MissingIdentifier { index: 0, .. }));
    }
}
