//! Polygon types and point containment.

use std::hash::{Hash, Hasher};

use climate_common::BoundingBox;

use crate::error::{GeometryError, GeometryResult};

/// A closed ring of `(lon, lat)` points. The first and last point coincide.
pub type Ring = Vec<(f64, f64)>;

/// A polygon with one exterior ring and zero or more holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    exterior: Ring,
    holes: Vec<Ring>,
    bbox: BoundingBox,
}

impl Polygon {
    /// Create a polygon. Open rings are closed automatically; every ring
    /// needs at least three distinct vertices and finite coordinates.
    pub fn new(exterior: Ring, holes: Vec<Ring>) -> GeometryResult<Self> {
        let exterior = close_ring(exterior)?;
        let holes = holes
            .into_iter()
            .map(close_ring)
            .collect::<GeometryResult<Vec<_>>>()?;

        let bbox = BoundingBox::from_points(&exterior)
            .ok_or_else(|| GeometryError::DegenerateRing("empty exterior".to_string()))?;

        Ok(Self {
            exterior,
            holes,
            bbox,
        })
    }

    /// Axis-aligned rectangle polygon.
    pub fn rectangle(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        let exterior = vec![
            (min_lon, min_lat),
            (max_lon, min_lat),
            (max_lon, max_lat),
            (min_lon, max_lat),
            (min_lon, min_lat),
        ];
        Self {
            exterior,
            holes: Vec::new(),
            bbox: BoundingBox::new(min_lon, min_lat, max_lon, max_lat),
        }
    }

    pub fn exterior(&self) -> &[(f64, f64)] {
        &self.exterior
    }

    pub fn holes(&self) -> &[Ring] {
        &self.holes
    }

    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    /// Feed every ring's coordinate bit patterns into `state`.
    pub fn hash_coordinates<H: Hasher>(&self, state: &mut H) {
        hash_ring(&self.exterior, state);
        self.holes.len().hash(state);
        for hole in &self.holes {
            hash_ring(hole, state);
        }
    }

    /// Check if a point is strictly inside the polygon: inside the exterior
    /// ring and outside every hole.
    ///
    /// Points on any edge, exterior or hole, are not contained, so a grid
    /// point on a line shared by two adjacent polygons belongs to neither.
    pub fn contains_point(&self, lon: f64, lat: f64) -> bool {
        if !self.bbox.contains_point(lon, lat) {
            return false;
        }

        if on_ring(&self.exterior, lon, lat)
            || self.holes.iter().any(|hole| on_ring(hole, lon, lat))
        {
            return false;
        }

        ring_contains(&self.exterior, lon, lat)
            && !self.holes.iter().any(|hole| ring_contains(hole, lon, lat))
    }
}

/// One or more polygons treated as a single shape.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiPolygon {
    polygons: Vec<Polygon>,
    bbox: Option<BoundingBox>,
}

impl MultiPolygon {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        let bbox = polygons
            .iter()
            .map(Polygon::bbox)
            .reduce(|a, b| a.union(&b));
        Self { polygons, bbox }
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn bbox(&self) -> Option<BoundingBox> {
        self.bbox
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Feed every member polygon's coordinates into `state`. Two shapes with
    /// bit-identical rings hash the same.
    pub fn hash_coordinates<H: Hasher>(&self, state: &mut H) {
        self.polygons.len().hash(state);
        for polygon in &self.polygons {
            polygon.hash_coordinates(state);
        }
    }

    /// Check if a point is inside any member polygon.
    pub fn contains_point(&self, lon: f64, lat: f64) -> bool {
        match self.bbox {
            Some(bbox) if bbox.contains_point(lon, lat) => {
                self.polygons.iter().any(|p| p.contains_point(lon, lat))
            }
            _ => false,
        }
    }
}

impl From<Polygon> for MultiPolygon {
    fn from(polygon: Polygon) -> Self {
        Self::new(vec![polygon])
    }
}

/// Even-odd ray casting against one closed ring.
fn ring_contains(ring: &[(f64, f64)], lon: f64, lat: f64) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;

    for i in 0..n {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];

        if ((yi > lat) != (yj > lat)) && (lon < (xj - xi) * (lat - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// `true` when the point lies on any segment of the closed ring.
fn on_ring(ring: &[(f64, f64)], lon: f64, lat: f64) -> bool {
    ring.windows(2).any(|edge| on_segment(edge[0], edge[1], lon, lat))
}

fn on_segment((x1, y1): (f64, f64), (x2, y2): (f64, f64), lon: f64, lat: f64) -> bool {
    if lon < x1.min(x2) || lon > x1.max(x2) || lat < y1.min(y2) || lat > y1.max(y2) {
        return false;
    }

    let cross = (x2 - x1) * (lat - y1) - (y2 - y1) * (lon - x1);
    let scale = (x2 - x1).abs().max((y2 - y1).abs()).max(1.0);
    cross.abs() <= f64::EPSILON * scale * scale
}

fn hash_ring<H: Hasher>(ring: &[(f64, f64)], state: &mut H) {
    ring.len().hash(state);
    for (x, y) in ring {
        x.to_bits().hash(state);
        y.to_bits().hash(state);
    }
}

fn close_ring(mut ring: Ring) -> GeometryResult<Ring> {
    if let Some(&(x, y)) = ring.iter().find(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return Err(GeometryError::InvalidCoordinate(format!("({}, {})", x, y)));
    }

    if let (Some(&first), Some(&last)) = (ring.first(), ring.last()) {
        if first != last {
            ring.push(first);
        }
    }

    // closed ring: at least 3 distinct vertices plus the repeated first one
    if ring.len() < 4 {
        return Err(GeometryError::DegenerateRing(format!(
            "ring needs at least 3 distinct points, got {}",
            ring.len().saturating_sub(1)
        )));
    }

    Ok(ring)
}
