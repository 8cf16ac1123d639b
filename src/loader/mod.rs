//! Loading of the three base sources
//!
//! Each source is read into raw string cells ([`raw::RawTable`]), normalized
//! into typed rows and materialized as an Arrow batch with a fixed schema.
//! Any missing or malformed source aborts startup.

pub mod causes;
pub mod deaths;
pub mod geography;
pub mod raw;

use std::time::Instant;

use arrow::record_batch::RecordBatch;
use serde::Serialize;

use crate::config::SourcePaths;
use crate::error::{DashboardError, Result};

pub use causes::load_cause_codes;
pub use deaths::load_death_records;
pub use geography::load_geography;
pub use raw::{RawTable, SourceFormat};

/// Row accounting of one loaded source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Which source the report describes
    pub source: String,
    /// Non-blank data rows read
    pub rows_read: usize,
    /// Rows in the normalized table
    pub rows_kept: usize,
    /// Rows whose every cell was blank
    pub dropped_empty: usize,
    pub dropped_null_cause: usize,
    /// Rows without a usable municipality or department code
    pub dropped_missing_location: usize,
    /// Exact duplicates after normalization
    pub dropped_duplicates: usize,
    /// Kept rows whose year or month did not form a date
    pub unresolved_dates: usize,
    /// Rows whose explicit department code disagreed with the municipality prefix
    pub department_mismatches: usize,
}

impl LoadReport {
    pub(crate) fn new(source: &str, raw: &RawTable) -> Self {
        Self {
            source: source.to_string(),
            rows_read: raw.len(),
            dropped_empty: raw.empty_rows,
            ..Self::default()
        }
    }
}

/// The three normalized base tables
///
/// Batches are reference-counted; cloning shares the column buffers.
#[derive(Debug, Clone)]
pub struct DataSources {
    pub deaths: RecordBatch,
    pub causes: RecordBatch,
    pub geography: RecordBatch,
    /// Load reports in the order deaths, causes, geography
    pub reports: Vec<LoadReport>,
}

/// Load all three sources, failing on the first missing or malformed one
pub fn load_sources(paths: &SourcePaths) -> Result<DataSources> {
    let start = Instant::now();
    let (deaths, deaths_report) = load_death_records(&paths.deaths)?;
    let (causes, causes_report) = load_cause_codes(&paths.causes)?;
    let (geography, geography_report) = load_geography(&paths.geography)?;
    log::info!("All sources loaded in {:?}", start.elapsed());

    Ok(DataSources {
        deaths,
        causes,
        geography,
        reports: vec![deaths_report, causes_report, geography_report],
    })
}

/// Load the three sources concurrently on the blocking pool
pub async fn load_sources_async(paths: &SourcePaths) -> Result<DataSources> {
    let start = Instant::now();
    let deaths_path = paths.deaths.clone();
    let causes_path = paths.causes.clone();
    let geography_path = paths.geography.clone();

    let (deaths, causes, geography) = tokio::try_join!(
        flatten(tokio::task::spawn_blocking(move || load_death_records(&deaths_path))),
        flatten(tokio::task::spawn_blocking(move || load_cause_codes(&causes_path))),
        flatten(tokio::task::spawn_blocking(move || load_geography(&geography_path))),
    )?;
    log::info!("All sources loaded concurrently in {:?}", start.elapsed());

    Ok(DataSources {
        deaths: deaths.0,
        causes: causes.0,
        geography: geography.0,
        reports: vec![deaths.1, causes.1, geography.1],
    })
}

async fn flatten<T>(handle: tokio::task::JoinHandle<Result<T>>) -> Result<T> {
    match handle.await {
        Ok(result) => result,
        Err(e) => Err(DashboardError::Io(std::io::Error::other(format!(
            "loader task failed: {e}"
        )))),
    }
}
