//! Area masks over a coordinate grid.
//!
//! A cell belongs to an area when its coordinate point `(lon, lat)` lies in
//! any of the area's boundaries. There is no centroid adjustment and no
//! fractional coverage: the grid coordinate is the cell's representative
//! point.

use std::sync::Arc;

use climate_common::CoordinateGrid;
use geometry::MultiPolygon;
use ndarray::Array2;

use crate::area::ResolvedArea;

/// Boolean `(lat, lon)` grid; `true` marks cells inside the area.
pub type Mask = Array2<bool>;

/// Build the union mask of `polygons` over the given axes.
///
/// Pure function of its inputs. An empty polygon set yields an all-false
/// mask.
pub fn build_mask(lats: &[f64], lons: &[f64], polygons: &[Arc<MultiPolygon>]) -> Mask {
    Array2::from_shape_fn((lats.len(), lons.len()), |(i, j)| {
        let (lon, lat) = (lons[j], lats[i]);
        polygons.iter().any(|shape| shape.contains_point(lon, lat))
    })
}

/// Build the mask for one resolved area against a raster's grid.
pub fn area_mask(grid: &CoordinateGrid, area: &ResolvedArea) -> Mask {
    build_mask(grid.lats(), grid.lons(), area.polygons())
}

/// Number of selected cells.
pub fn count_selected(mask: &Mask) -> usize {
    mask.iter().filter(|&&selected| selected).count()
}

/// Supplies masks to file tasks.
///
/// Implementations must return exactly what [`area_mask`] would compute;
/// they differ only in whether and how results are reused.
pub trait MaskProvider: Send + Sync {
    fn mask_for(&self, grid: &CoordinateGrid, area: &ResolvedArea) -> Arc<Mask>;
}

/// Computes every mask from scratch.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectMasks;

impl MaskProvider for DirectMasks {
    fn mask_for(&self, grid: &CoordinateGrid, area: &ResolvedArea) -> Arc<Mask> {
        Arc::new(area_mask(grid, area))
    }
}
