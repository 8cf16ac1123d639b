//! Department centroids from boundary polygons
//!
//! Polygons are projected to Web Mercator (EPSG:3857), their area-weighted
//! centroid is computed there and projected back to EPSG:4326. Results are
//! keyed by the accent-folded department name.

use std::f64::consts::FRAC_PI_4;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::error::util::safe_open_file;
use crate::error::{DashboardError, Result};
use crate::geo::Centroid;
use crate::reconcile::fold_name;
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// WGS 84 semi-major axis used by Web Mercator, in metres
const EARTH_RADIUS: f64 = 6_378_137.0;

/// Feature properties that may carry the department name, in priority order
const NAME_PROPERTIES: [&str; 3] = ["NOMBRE_DPT", "DPTO_CNMBR", "name"];

/// Project longitude/latitude degrees to Web Mercator metres
#[must_use]
pub fn mercator_forward(longitude: f64, latitude: f64) -> (f64, f64) {
    let x = EARTH_RADIUS * longitude.to_radians();
    let y = EARTH_RADIUS * (FRAC_PI_4 + latitude.to_radians() / 2.0).tan().ln();
    (x, y)
}

/// Project Web Mercator metres back to longitude/latitude degrees
#[must_use]
pub fn mercator_inverse(x: f64, y: f64) -> (f64, f64) {
    let longitude = (x / EARTH_RADIUS).to_degrees();
    let latitude = (2.0 * (y / EARTH_RADIUS).exp().atan() - 2.0 * FRAC_PI_4).to_degrees();
    (longitude, latitude)
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<serde_json::Map<String, serde_json::Value>>,
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: serde_json::Value,
}

type Ring = Vec<Vec<f64>>;

impl Geometry {
    /// Polygons of the geometry as lists of rings; other geometry types are empty
    fn polygons(&self) -> Vec<Vec<Ring>> {
        let coordinates = self.coordinates.clone();
        match self.kind.as_str() {
            "Polygon" => serde_json::from_value::<Vec<Ring>>(coordinates)
                .map(|p| vec![p])
                .unwrap_or_default(),
            "MultiPolygon" => serde_json::from_value(coordinates).unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

/// Signed area and area-weighted centroid sums of a projected ring (shoelace)
fn ring_moments(ring: &[(f64, f64)]) -> (f64, f64, f64) {
    let mut area = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for (i, &(x0, y0)) in ring.iter().enumerate() {
        let (x1, y1) = ring[(i + 1) % ring.len()];
        let cross = x0 * y1 - x1 * y0;
        area += cross;
        cx += (x0 + x1) * cross;
        cy += (y0 + y1) * cross;
    }
    (area / 2.0, cx / 6.0, cy / 6.0)
}

/// Centroid of a set of polygons (exterior ring first, then holes)
fn polygons_centroid(polygons: &[Vec<Ring>]) -> Option<Centroid> {
    let mut total_area = 0.0;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut vertices: Vec<(f64, f64)> = Vec::new();

    for polygon in polygons {
        for (ring_index, ring) in polygon.iter().enumerate() {
            let projected: Vec<(f64, f64)> = ring
                .iter()
                .filter(|p| p.len() >= 2 && p[0].is_finite() && p[1].is_finite())
                .map(|p| mercator_forward(p[0], p[1]))
                .collect();
            if projected.len() < 3 {
                continue;
            }
            vertices.extend_from_slice(&projected);
            let (area, mx, my) = ring_moments(&projected);
            // exterior adds, holes subtract, whatever the winding
            let sign = (if ring_index == 0 { 1.0 } else { -1.0 }) * area.signum();
            total_area += sign * area;
            sum_x += sign * mx;
            sum_y += sign * my;
        }
    }

    let (x, y) = if total_area.abs() > f64::EPSILON {
        (sum_x / total_area, sum_y / total_area)
    } else if vertices.is_empty() {
        return None;
    } else {
        #[allow(clippy::cast_precision_loss)]
        let n = vertices.len() as f64;
        (
            vertices.iter().map(|v| v.0).sum::<f64>() / n,
            vertices.iter().map(|v| v.1).sum::<f64>() / n,
        )
    };
    let (longitude, latitude) = mercator_inverse(x, y);
    (longitude.is_finite() && latitude.is_finite()).then_some(Centroid {
        latitude,
        longitude,
    })
}

/// Department centroids derived from a boundary GeoJSON
#[derive(Debug, Clone, Default)]
pub struct BoundaryCentroids {
    by_name: FxHashMap<String, Centroid>,
}

impl BoundaryCentroids {
    /// Read and derive centroids from a GeoJSON `FeatureCollection`
    pub fn load(path: &Path) -> Result<Self> {
        log_operation_start("Deriving department centroids from", path);
        let start = Instant::now();
        let file = safe_open_file(path, "department boundaries")?;
        let collection: FeatureCollection = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| DashboardError::parse(path, format!("invalid GeoJSON: {e}")))?;
        let centroids = Self::from_features(collection.features);
        log_operation_complete("derived", path, centroids.len(), Some(start.elapsed()));
        Ok(centroids)
    }

    /// Derive centroids from GeoJSON text
    pub fn from_geojson_str(geojson: &str) -> Result<Self> {
        let collection: FeatureCollection = serde_json::from_str(geojson)
            .map_err(|e| DashboardError::parse("<geojson>", format!("invalid GeoJSON: {e}")))?;
        Ok(Self::from_features(collection.features))
    }

    fn from_features(features: Vec<Feature>) -> Self {
        let mut by_name = FxHashMap::default();
        let mut skipped = 0usize;
        for feature in features {
            let name = NAME_PROPERTIES
                .iter()
                .find_map(|key| {
                    feature
                        .properties
                        .as_ref()
                        .and_then(|p| p.get(*key))
                        .and_then(|v| v.as_str())
                });
            let centroid = feature
                .geometry
                .as_ref()
                .and_then(|g| polygons_centroid(&g.polygons()));
            match (name, centroid) {
                (Some(name), Some(centroid)) => {
                    by_name.entry(fold_name(name)).or_insert(centroid);
                }
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            log::warn!("Skipped {skipped} boundary features without a name or polygon");
        }
        Self { by_name }
    }

    /// Centroid of a department, matched by accent-folded name
    #[must_use]
    pub fn get(&self, department_name: &str) -> Option<Centroid> {
        self.by_name.get(&fold_name(department_name)).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
