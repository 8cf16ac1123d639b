//! Pipeline-facing interface of the dashboard
//!
//! A [`Dashboard`] owns the immutable base tables and reference indexes.
//! Each view takes a [`FilterSelection`], filters into a fresh batch and
//! aggregates it; nothing is written back, so views can run concurrently.

pub mod response;

use std::collections::BTreeSet;
use std::sync::Arc;

use arrow::array::Array;
use arrow::record_batch::RecordBatch;
use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::aggregate::{
    AgeSexTable, CauseTable, CityTable, DepartmentSexTable, DepartmentTotals, MonthlyTable,
    ViewResult, age_sex_counts, department_sex_counts, department_totals,
    lowest_mortality_cities, monthly_deaths, top_causes, violent_death_cities,
};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::filter::{ALL_OPTION, FilterSelection, apply_filters};
use crate::geo::{BoundaryCentroids, MapView, department_map};
use crate::loader::{DataSources, LoadReport, load_sources, load_sources_async};
use crate::models::Sex;
use crate::models::age_band::{BAND_ORDER, UNKNOWN_BAND};
use crate::reconcile::{CauseIndex, GeographyIndex};
use crate::schema::columns::{COD_MUERTE, TABLE_DEATHS};
use crate::utils::arrow_utils::{string_at, string_column};
use crate::utils::logging::log_warning;

pub use response::{DashboardSnapshot, ViewResponse, ViewStatus};

pub use crate::aggregate::monthly::DEFAULT_MANNER;

/// Values offered by the dashboard's dropdowns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Sorted unique department names from the geography
    pub departments: Vec<String>,
    /// Sorted unique cause codes present in the death records
    pub cause_codes: Vec<String>,
    /// Age bands in canonical order, without "Unknown"
    pub age_bands: Vec<&'static str>,
    /// "Todos" followed by the sex labels
    pub sexes: Vec<&'static str>,
}

/// Loaded, immutable dashboard state
#[derive(Debug)]
pub struct Dashboard {
    config: DashboardConfig,
    deaths: RecordBatch,
    geography: GeographyIndex,
    causes: CauseIndex,
    reports: Vec<LoadReport>,
    boundaries: OnceCell<Option<Arc<BoundaryCentroids>>>,
}

impl Dashboard {
    /// Build the indexes over already-loaded sources
    pub fn new(sources: DataSources, config: DashboardConfig) -> Result<Self> {
        config.validate()?;
        let geography = GeographyIndex::from_batch(&sources.geography)?;
        let causes = CauseIndex::from_batch(&sources.causes)?;
        log::info!(
            "Dashboard ready: {} death records, {} departments, {} cause descriptions",
            sources.deaths.num_rows(),
            geography.department_names().len(),
            causes.len()
        );
        Ok(Self {
            config,
            deaths: sources.deaths,
            geography,
            causes,
            reports: sources.reports,
            boundaries: OnceCell::new(),
        })
    }

    /// Load every source and build the dashboard
    pub fn load(config: DashboardConfig) -> Result<Self> {
        config.validate()?;
        let sources = load_sources(&config.sources)?;
        Self::new(sources, config)
    }

    /// Load every source concurrently and build the dashboard
    pub async fn load_async(config: DashboardConfig) -> Result<Self> {
        config.validate()?;
        let sources = load_sources_async(&config.sources).await?;
        Self::new(sources, config)
    }

    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// The unfiltered death records
    #[must_use]
    pub fn records(&self) -> &RecordBatch {
        &self.deaths
    }

    #[must_use]
    pub fn geography(&self) -> &GeographyIndex {
        &self.geography
    }

    #[must_use]
    pub fn causes(&self) -> &CauseIndex {
        &self.causes
    }

    /// Row accounting of the startup load
    #[must_use]
    pub fn load_reports(&self) -> &[LoadReport] {
        &self.reports
    }

    /// Death records matching a selection
    pub fn filtered(&self, selection: &FilterSelection) -> Result<RecordBatch> {
        apply_filters(&self.deaths, &self.geography, selection)
    }

    /// Deaths per department code
    pub fn department_totals(&self, selection: &FilterSelection) -> Result<ViewResult<DepartmentTotals>> {
        department_totals(&self.filtered(selection)?)
    }

    /// Department markers, capital district folded in
    pub fn map_view(&self, selection: &FilterSelection) -> Result<ViewResult<MapView>> {
        let ViewResult::Rows(totals) = self.department_totals(selection)? else {
            return Ok(ViewResult::Empty);
        };
        let boundaries = self.boundaries()?;
        Ok(department_map(
            &totals,
            &self.geography,
            boundaries.as_deref(),
            &self.config,
        ))
    }

    pub fn department_sex_view(&self, selection: &FilterSelection) -> Result<ViewResult<DepartmentSexTable>> {
        department_sex_counts(&self.filtered(selection)?, &self.geography)
    }

    pub fn violent_cities_view(&self, selection: &FilterSelection) -> Result<ViewResult<CityTable>> {
        violent_death_cities(
            &self.filtered(selection)?,
            &self.geography,
            self.config.violent_city_limit,
        )
    }

    pub fn lowest_cities_view(&self, selection: &FilterSelection) -> Result<ViewResult<CityTable>> {
        lowest_mortality_cities(
            &self.filtered(selection)?,
            &self.geography,
            self.config.lowest_city_limit,
        )
    }

    pub fn cause_view(&self, selection: &FilterSelection) -> Result<ViewResult<CauseTable>> {
        top_causes(&self.filtered(selection)?, &self.causes, self.config.cause_limit)
    }

    pub fn age_sex_view(&self, selection: &FilterSelection) -> Result<ViewResult<AgeSexTable>> {
        age_sex_counts(&self.filtered(selection)?)
    }

    pub fn monthly_view(
        &self,
        selection: &FilterSelection,
        manner: &str,
    ) -> Result<ViewResult<MonthlyTable>> {
        monthly_deaths(&self.filtered(selection)?, manner)
    }

    /// Dropdown values
    pub fn filter_options(&self) -> Result<FilterOptions> {
        let codes = string_column(&self.deaths, TABLE_DEATHS, COD_MUERTE)?;
        let cause_codes: BTreeSet<&str> = (0..codes.len())
            .filter_map(|row| string_at(codes, row))
            .collect();
        Ok(FilterOptions {
            departments: self.geography.department_names(),
            cause_codes: cause_codes.into_iter().map(str::to_string).collect(),
            age_bands: BAND_ORDER
                .into_iter()
                .filter(|band| *band != UNKNOWN_BAND)
                .collect(),
            sexes: std::iter::once(ALL_OPTION)
                .chain(Sex::ALL.map(Sex::label))
                .collect(),
        })
    }

    /// Evaluate every view for one selection in parallel
    ///
    /// A failing view is reported in its own response; the others still render.
    #[must_use]
    pub fn render_all(&self, selection: &FilterSelection) -> DashboardSnapshot {
        let mut map = None;
        let mut department_sex = None;
        let mut violent_cities = None;
        let mut lowest_cities = None;
        let mut causes = None;
        let mut age_sex = None;
        let mut monthly = None;

        rayon::scope(|s| {
            s.spawn(|_| {
                map = Some(ViewResponse::from_result(response::VIEW_MAP, self.map_view(selection)));
            });
            s.spawn(|_| {
                department_sex = Some(ViewResponse::from_result(
                    response::VIEW_DEPARTMENT_SEX,
                    self.department_sex_view(selection),
                ));
            });
            s.spawn(|_| {
                violent_cities = Some(ViewResponse::from_result(
                    response::VIEW_VIOLENT_CITIES,
                    self.violent_cities_view(selection),
                ));
            });
            s.spawn(|_| {
                lowest_cities = Some(ViewResponse::from_result(
                    response::VIEW_LOWEST_CITIES,
                    self.lowest_cities_view(selection),
                ));
            });
            s.spawn(|_| {
                causes = Some(ViewResponse::from_result(
                    response::VIEW_CAUSES,
                    self.cause_view(selection),
                ));
            });
            s.spawn(|_| {
                age_sex = Some(ViewResponse::from_result(
                    response::VIEW_AGE_SEX,
                    self.age_sex_view(selection),
                ));
            });
            s.spawn(|_| {
                monthly = Some(ViewResponse::from_result(
                    response::VIEW_MONTHLY,
                    self.monthly_view(selection, DEFAULT_MANNER),
                ));
            });
        });

        // every spawned task has finished once the scope returns
        DashboardSnapshot {
            selection: selection.clone(),
            map: rendered(map, response::VIEW_MAP),
            department_sex: rendered(department_sex, response::VIEW_DEPARTMENT_SEX),
            violent_cities: rendered(violent_cities, response::VIEW_VIOLENT_CITIES),
            lowest_cities: rendered(lowest_cities, response::VIEW_LOWEST_CITIES),
            causes: rendered(causes, response::VIEW_CAUSES),
            age_sex: rendered(age_sex, response::VIEW_AGE_SEX),
            monthly: rendered(monthly, response::VIEW_MONTHLY),
        }
    }

    /// Boundary centroids, derived once on first use
    ///
    /// Only read when some department lacks a centroid in the geography
    /// source and a boundary file exists.
    fn boundaries(&self) -> Result<Option<Arc<BoundaryCentroids>>> {
        self.boundaries
            .get_or_try_init(|| {
                let needs_boundaries = self
                    .geography
                    .departments()
                    .any(|(code, _)| self.geography.centroid(code).is_none());
                if !needs_boundaries {
                    return Ok(None);
                }
                match self.config.existing_boundaries() {
                    Some(path) => BoundaryCentroids::load(path).map(|b| Some(Arc::new(b))),
                    None => {
                        log_warning(
                            "Geography lacks centroids for some departments and the boundary file is unavailable",
                            self.config.sources.boundaries.as_deref(),
                        );
                        Ok(None)
                    }
                }
            })
            .cloned()
    }
}

fn rendered<T>(response: Option<ViewResponse<T>>, view: &'static str) -> ViewResponse<T> {
    response.unwrap_or_else(|| {
        ViewResponse::from_result(
            view,
            Err(DashboardError::Config(format!("view {view} was not rendered"))),
        )
    })
}
