//! Deaths per month for one manner of death

use arrow::record_batch::RecordBatch;
use serde::Serialize;

use crate::aggregate::{ViewResult, has_rows};
use crate::error::Result;
use crate::filter::{BatchFilter, MannerOfDeathFilter};
use crate::schema::columns::{MANERA_MUERTE, MES, TABLE_DEATHS};
use crate::utils::arrow_utils::{int32_at, int32_column};
use crate::utils::logging::log_exclusions;

/// Manner of death charted when none is given
pub const DEFAULT_MANNER: &str = "Natural";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    /// 1 to 12
    pub month: u32,
    pub deaths: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTable {
    pub manner_of_death: String,
    /// All twelve months in calendar order, zeros included
    pub rows: Vec<MonthCount>,
    /// Records of this manner whose month was null or outside 1-12
    pub excluded_invalid_month: usize,
}

impl MonthlyTable {
    #[must_use]
    pub fn total(&self) -> usize {
        self.rows.iter().map(|r| r.deaths).sum()
    }
}

/// Count deaths of `manner` per month
pub fn monthly_deaths(records: &RecordBatch, manner: &str) -> Result<ViewResult<MonthlyTable>> {
    if !has_rows(records, &[MANERA_MUERTE, MES])? {
        return Ok(ViewResult::Empty);
    }
    let of_manner = MannerOfDeathFilter::new(manner).filter(records)?;
    if of_manner.num_rows() == 0 {
        return Ok(ViewResult::Empty);
    }

    let months = int32_column(&of_manner, TABLE_DEATHS, MES)?;
    let mut per_month = [0usize; 12];
    let mut excluded = 0usize;
    for row in 0..of_manner.num_rows() {
        match int32_at(months, row).and_then(|m| usize::try_from(m).ok()) {
            Some(month @ 1..=12) => per_month[month - 1] += 1,
            _ => excluded += 1,
        }
    }
    log_exclusions("Monthly deaths", "null or invalid month", excluded);

    let rows = (1u32..)
        .zip(per_month)
        .map(|(month, deaths)| MonthCount { month, deaths })
        .collect();
    Ok(ViewResult::Rows(MonthlyTable {
        manner_of_death: manner.trim().to_string(),
        rows,
        excluded_invalid_month: excluded,
    }))
}
