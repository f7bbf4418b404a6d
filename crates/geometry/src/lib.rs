//! Boundary geometry for administrative areas.
//!
//! This crate provides:
//! - [`Polygon`] / [`MultiPolygon`] with ray-casting point containment
//! - The [`GeometryRegistry`] lookup used to resolve unit identifiers,
//!   with a GeoJSON-backed implementation ([`FeatureRegistry`])
//!
//! Coordinates are always `(lon, lat)` pairs in degrees.

pub mod error;
pub mod geojson;
pub mod polygon;
pub mod registry;

pub use error::{GeometryError, GeometryResult};
pub use polygon::{MultiPolygon, Polygon, Ring};
pub use registry::{FeatureRegistry, GeometryRegistry};
