//! Aggregators, one per dashboard view
//!
//! Every aggregator is a pure function of an already-filtered death-records
//! batch and the read-only reference indexes. Required columns are checked
//! first, so schema drift fails with `SchemaMismatch` even on empty input;
//! only then does an empty batch become [`ViewResult::Empty`].

pub mod age;
pub mod causes;
pub mod cities;
pub mod department;
pub mod monthly;

use std::hash::Hash;

use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::error::Result;
use crate::reconcile::JoinExclusions;
use crate::schema::columns::TABLE_DEATHS;
use crate::schema::require_columns;
use crate::utils::arrow_utils::{string_at, string_column};

pub use age::{AgeBandCount, AgeSexTable, age_sex_counts};
pub use causes::{CauseCount, CauseTable, top_causes};
pub use cities::{CityCount, CityTable, lowest_mortality_cities, violent_death_cities};
pub use department::{
    DepartmentCount, DepartmentSexCount, DepartmentSexTable, DepartmentTotals,
    department_sex_counts, department_totals,
};
pub use monthly::{MonthCount, MonthlyTable, monthly_deaths};

/// Outcome of an aggregation that did not fail
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum ViewResult<T> {
    /// The aggregated table
    Rows(T),
    /// No record matched the selection
    Empty,
    /// Records matched, but none of their keys found a reference row
    Incomplete(JoinExclusions),
}

impl<T> ViewResult<T> {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub const fn is_incomplete(&self) -> bool {
        matches!(self, Self::Incomplete(_))
    }

    /// The table, if any
    #[must_use]
    pub const fn rows(&self) -> Option<&T> {
        match self {
            Self::Rows(rows) => Some(rows),
            Self::Empty | Self::Incomplete(_) => None,
        }
    }

    /// Take the table, if any
    #[must_use]
    pub fn into_rows(self) -> Option<T> {
        match self {
            Self::Rows(rows) => Some(rows),
            Self::Empty | Self::Incomplete(_) => None,
        }
    }

    /// What kept an incomplete result from producing rows
    #[must_use]
    pub const fn exclusions(&self) -> Option<&JoinExclusions> {
        match self {
            Self::Incomplete(exclusions) => Some(exclusions),
            Self::Rows(_) | Self::Empty => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ViewResult<U> {
        match self {
            Self::Rows(rows) => ViewResult::Rows(f(rows)),
            Self::Empty => ViewResult::Empty,
            Self::Incomplete(exclusions) => ViewResult::Incomplete(exclusions),
        }
    }
}

/// Result of a joined table: rows when any survived the join, otherwise
/// `Incomplete` if keys went unmatched and `Empty` if there were none
pub(crate) fn joined_result<T>(
    has_rows: bool,
    excluded: JoinExclusions,
    table: impl FnOnce(JoinExclusions) -> T,
) -> ViewResult<T> {
    if has_rows {
        ViewResult::Rows(table(excluded))
    } else if excluded.is_complete() {
        ViewResult::Empty
    } else {
        ViewResult::Incomplete(excluded)
    }
}

/// Check the columns an aggregator reads; `Ok(false)` when there are no rows
pub(crate) fn has_rows(batch: &RecordBatch, required: &[&str]) -> Result<bool> {
    require_columns(&batch.schema(), TABLE_DEATHS, required)?;
    Ok(batch.num_rows() > 0)
}

/// Count rows per key; rows whose key is `None` are skipped
pub(crate) fn count_by<K: Hash + Eq>(
    rows: usize,
    key: impl Fn(usize) -> Option<K>,
) -> FxHashMap<K, usize> {
    let mut counts = FxHashMap::default();
    for row in 0..rows {
        if let Some(k) = key(row) {
            *counts.entry(k).or_insert(0) += 1;
        }
    }
    counts
}

/// Count rows per value of a string column
pub(crate) fn count_strings(
    batch: &RecordBatch,
    column: &str,
) -> Result<FxHashMap<String, usize>> {
    let values = string_column(batch, TABLE_DEATHS, column)?;
    Ok(count_by(batch.num_rows(), |row| {
        string_at(values, row).map(str::to_string)
    }))
}
