//! Department markers of the map view

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::aggregate::{DepartmentCount, DepartmentTotals, ViewResult};
use crate::config::{DashboardConfig, RadiusBounds};
use crate::geo::{BoundaryCentroids, Centroid, consolidate_capital};
use crate::reconcile::{GeographyIndex, JoinExclusions, left_join, split_unmatched};
use crate::utils::logging::log_exclusions;

/// Marker radius for `count`, interpolated linearly between the bounds
///
/// When every department has the same count the midpoint radius is used.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn marker_radius(count: usize, min_count: usize, max_count: usize, bounds: RadiusBounds) -> f64 {
    if max_count == min_count {
        return bounds.midpoint();
    }
    let position = count.saturating_sub(min_count) as f64 / (max_count - min_count) as f64;
    bounds.min + (bounds.max - bounds.min) * position
}

/// One circle on the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentMarker {
    pub department_code: String,
    pub department_name: String,
    pub deaths: usize,
    pub latitude: f64,
    pub longitude: f64,
    /// Metres
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: Centroid,
    /// Sorted by department code
    pub markers: Vec<DepartmentMarker>,
    /// Whether the capital district was folded into its department
    pub capital_consolidated: bool,
    /// Departments left off the map for lack of a name or centroid
    pub missing_coordinates: JoinExclusions,
}

/// Build the map payload from department totals
///
/// Departments without a centroid are dropped first, so the capital rule
/// only fires when both the capital and its surrounding department are on
/// the map. Centroids come from the geography source, falling back to
/// `boundaries`. When no department can be placed the result is
/// `Incomplete`, carrying the departments that lacked coordinates.
#[must_use]
pub fn department_map(
    totals: &DepartmentTotals,
    geography: &GeographyIndex,
    boundaries: Option<&BoundaryCentroids>,
    config: &DashboardConfig,
) -> ViewResult<MapView> {
    let joined = left_join(
        totals.rows.iter().map(|r| (r.department_code.clone(), r.deaths)),
        |code| {
            let name = geography.department_name(code)?;
            let centroid = geography
                .centroid(code)
                .or_else(|| boundaries.and_then(|b| b.get(name)))?;
            Some((name.to_string(), centroid))
        },
    );
    let (located, missing_coordinates) = split_unmatched(joined);
    log_exclusions("Department map", "department without centroid", missing_coordinates.excluded_records);
    if !missing_coordinates.is_complete() {
        log::debug!("Departments missing from the map: {:?}", missing_coordinates.unmatched_keys);
    }
    if located.is_empty() {
        return ViewResult::Incomplete(missing_coordinates);
    }

    let mut places: FxHashMap<String, (String, Centroid)> = FxHashMap::default();
    let located_totals: Vec<DepartmentCount> = located
        .into_iter()
        .map(|(department_code, deaths, place)| {
            places.insert(department_code.clone(), place);
            DepartmentCount {
                department_code,
                deaths,
            }
        })
        .collect();
    let (rows, capital_consolidated) = consolidate_capital(&located_totals);

    let (Some(min_count), Some(max_count)) = (
        rows.iter().map(|r| r.deaths).min(),
        rows.iter().map(|r| r.deaths).max(),
    ) else {
        return ViewResult::Incomplete(missing_coordinates);
    };

    let mut markers: Vec<DepartmentMarker> = rows
        .into_iter()
        .filter_map(|row| {
            let (department_name, centroid) = places.remove(&row.department_code)?;
            Some(DepartmentMarker {
                radius: marker_radius(row.deaths, min_count, max_count, config.radius),
                department_code: row.department_code,
                department_name,
                deaths: row.deaths,
                latitude: centroid.latitude,
                longitude: centroid.longitude,
            })
        })
        .collect();
    markers.sort_by(|a, b| a.department_code.cmp(&b.department_code));

    let (latitude, longitude) = config.map_center;
    ViewResult::Rows(MapView {
        center: Centroid {
            latitude,
            longitude,
        },
        markers,
        capital_consolidated,
        missing_coordinates,
    })
}
