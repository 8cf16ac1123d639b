//! Responses handed to the presentation layer

use serde::Serialize;

use crate::aggregate::{
    AgeSexTable, CauseTable, CityTable, DepartmentSexTable, MonthlyTable, ViewResult,
};
use crate::error::Result;
use crate::filter::FilterSelection;
use crate::geo::MapView;
use crate::reconcile::JoinExclusions;

pub const VIEW_MAP: &str = "department_map";
pub const VIEW_DEPARTMENT_SEX: &str = "department_sex";
pub const VIEW_VIOLENT_CITIES: &str = "violent_cities";
pub const VIEW_LOWEST_CITIES: &str = "lowest_mortality_cities";
pub const VIEW_CAUSES: &str = "top_causes";
pub const VIEW_AGE_SEX: &str = "age_sex";
pub const VIEW_MONTHLY: &str = "monthly_deaths";

/// Message shown for a selection without matching records
pub const NO_DATA_MESSAGE: &str = "No data for the current selection";
/// Message shown when no department of the selection can be placed on the map
pub const NO_COORDINATES_MESSAGE: &str = "No coordinates available for the departments in the current selection";
/// Message shown when no key of the selection matched its reference table
pub const INCOMPLETE_MESSAGE: &str = "Reference data is missing for every record in the current selection";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStatus {
    Ok,
    /// The selection matched no record
    NoData,
    /// Records matched but none could be joined to reference data
    Incomplete,
    /// The view failed; other views are unaffected
    Error,
}

/// Outcome of one view, ready to serialize
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewResponse<T> {
    pub view: &'static str,
    pub status: ViewStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Keys without reference data, set for an `incomplete` status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusions: Option<JoinExclusions>,
}

impl<T> ViewResponse<T> {
    /// Turn an aggregation outcome into a response
    ///
    /// Errors become an `error` status carrying the message instead of
    /// propagating.
    pub fn from_result(view: &'static str, result: Result<ViewResult<T>>) -> Self {
        match result {
            Ok(ViewResult::Rows(data)) => Self {
                view,
                status: ViewStatus::Ok,
                message: None,
                data: Some(data),
                exclusions: None,
            },
            Ok(ViewResult::Empty) => Self {
                view,
                status: ViewStatus::NoData,
                message: Some(NO_DATA_MESSAGE.to_string()),
                data: None,
                exclusions: None,
            },
            Ok(ViewResult::Incomplete(exclusions)) => {
                let message = if view == VIEW_MAP {
                    NO_COORDINATES_MESSAGE
                } else {
                    INCOMPLETE_MESSAGE
                };
                log::warn!("View {view} has no rows: {}", exclusions.unmatched_keys.join(", "));
                Self {
                    view,
                    status: ViewStatus::Incomplete,
                    message: Some(message.to_string()),
                    data: None,
                    exclusions: Some(exclusions),
                }
            }
            Err(e) => {
                log::error!("View {view} failed: {e}");
                Self {
                    view,
                    status: ViewStatus::Error,
                    message: Some(e.to_string()),
                    data: None,
                    exclusions: None,
                }
            }
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == ViewStatus::Ok
    }
}

/// Every view for one selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub selection: FilterSelection,
    pub map: ViewResponse<MapView>,
    pub department_sex: ViewResponse<DepartmentSexTable>,
    pub violent_cities: ViewResponse<CityTable>,
    pub lowest_cities: ViewResponse<CityTable>,
    pub causes: ViewResponse<CauseTable>,
    pub age_sex: ViewResponse<AgeSexTable>,
    pub monthly: ViewResponse<MonthlyTable>,
}
