//! Geographic enrichment for the map view
//!
//! Department centroids come from the geography source when it carries
//! coordinates, otherwise from boundary polygons. The capital-district rule
//! and marker sizing are applied to department totals before rendering.

pub mod capital;
pub mod centroid;
pub mod markers;

use serde::Serialize;

pub use capital::{CAPITAL_DISTRICT_CODE, SURROUNDING_DEPARTMENT_CODE, consolidate_capital};
pub use centroid::{BoundaryCentroids, mercator_forward, mercator_inverse};
pub use markers::{DepartmentMarker, MapView, department_map, marker_radius};

/// A point in geographic coordinates (EPSG:4326)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Centroid {
    pub latitude: f64,
    pub longitude: f64,
}
