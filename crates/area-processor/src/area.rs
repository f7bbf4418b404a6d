//! Resolving configured areas against a geometry registry.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use climate_common::AreaSet;
use geometry::{GeometryRegistry, MultiPolygon};

use crate::error::{ProcessorError, Result};

/// An area whose unit identifiers have been resolved to boundaries.
#[derive(Debug, Clone)]
pub struct ResolvedArea {
    pub name: String,
    polygons: Vec<Arc<MultiPolygon>>,
    geometry_fingerprint: u64,
}

impl ResolvedArea {
    pub fn new(name: impl Into<String>, polygons: Vec<Arc<MultiPolygon>>) -> Self {
        let mut hasher = DefaultHasher::new();
        polygons.len().hash(&mut hasher);
        for shape in &polygons {
            shape.hash_coordinates(&mut hasher);
        }

        Self {
            name: name.into(),
            polygons,
            geometry_fingerprint: hasher.finish(),
        }
    }

    pub fn polygons(&self) -> &[Arc<MultiPolygon>] {
        &self.polygons
    }

    /// Hash of the boundary coordinates. Areas with the same name but
    /// different boundaries differ here.
    pub fn geometry_fingerprint(&self) -> u64 {
        self.geometry_fingerprint
    }
}

/// Resolve every area's units, in configuration order.
///
/// Fails on the first unit the registry does not know, before any raster
/// is touched.
pub fn resolve_areas<R>(registry: &R, areas: &AreaSet) -> Result<Vec<ResolvedArea>>
where
    R: GeometryRegistry + ?Sized,
{
    areas
        .iter()
        .map(|area| {
            if area.units.is_empty() {
                return Err(ProcessorError::EmptyArea(area.name.clone()));
            }

            let polygons = area
                .unit_ids()
                .map(|unit_id| {
                    registry
                        .lookup(unit_id)
                        .ok_or_else(|| ProcessorError::UnknownUnit {
                            area: area.name.clone(),
                            unit_id: unit_id.to_string(),
                        })
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(ResolvedArea::new(area.name.clone(), polygons))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use climate_common::AreaDefinition;
    use geometry::{FeatureRegistry, Polygon};

    fn registry() -> FeatureRegistry {
        FeatureRegistry::new()
            .with_feature("22033", Polygon::rectangle(-91.3, 30.3, -90.9, 30.6).into())
            .with_feature("22005", Polygon::rectangle(-91.1, 30.0, -90.6, 30.3).into())
    }

    #[test]
    fn test_resolve_in_order() {
        let areas = AreaSet::new()
            .with_area(AreaDefinition::composite(
                "Capital_Region",
                [("22033", "East Baton Rouge"), ("22005", "Ascension")],
            ))
            .with_area(AreaDefinition::single("EBR", "22033", "East Baton Rouge"));

        let resolved = resolve_areas(&registry(), &areas).unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].name, "Capital_Region");
        assert_eq!(resolved[0].polygons().len(), 2);
        assert_eq!(resolved[1].polygons().len(), 1);
    }

    #[test]
    fn test_unknown_unit() {
        let areas = AreaSet::new().with_area(AreaDefinition::composite(
            "Southeast",
            [("22033", "East Baton Rouge"), ("22999", "Nowhere")],
        ));

        let err = resolve_areas(&registry(), &areas).unwrap_err();
        match err {
            ProcessorError::UnknownUnit { area, unit_id } => {
                assert_eq!(area, "Southeast");
                assert_eq!(unit_id, "22999");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_area() {
        let empty: [(&str, &str); 0] = [];
        let areas = AreaSet::new().with_area(AreaDefinition::composite("Nothing", empty));
        assert!(matches!(
            resolve_areas(&registry(), &areas),
            Err(ProcessorError::EmptyArea(name)) if name == "Nothing"
        ));
    }

    #[test]
    fn test_geometry_fingerprint() {
        let areas = AreaSet::new()
            .with_area(AreaDefinition::single("A", "22033", "East Baton Rouge"))
            .with_area(AreaDefinition::single("B", "22033", "East Baton Rouge"))
            .with_area(AreaDefinition::single("C", "22005", "Ascension"));

        let resolved = resolve_areas(&registry(), &areas).unwrap();
        assert_eq!(
            resolved[0].geometry_fingerprint(),
            resolved[1].geometry_fingerprint()
        );
        assert_ne!(
            resolved[0].geometry_fingerprint(),
            resolved[2].geometry_fingerprint()
        );
    }
}
