//! Leading causes of death

use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use serde::Serialize;

use crate::aggregate::{ViewResult, count_strings, has_rows, joined_result};
use crate::error::Result;
use crate::reconcile::{CauseIndex, JoinExclusions, left_join, split_unmatched};
use crate::schema::columns::COD_MUERTE;
use crate::utils::logging::log_exclusions;

/// Deaths attributed to one ICD-10 code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CauseCount {
    pub cause_code: String,
    pub description: String,
    pub deaths: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CauseTable {
    /// Sorted by count descending, then code ascending
    pub rows: Vec<CauseCount>,
    /// Codes without a description, removed before ranking
    pub excluded: JoinExclusions,
}

/// Top causes by deaths, with their 4-character descriptions
pub fn top_causes(
    records: &RecordBatch,
    causes: &CauseIndex,
    limit: usize,
) -> Result<ViewResult<CauseTable>> {
    if !has_rows(records, &[COD_MUERTE])? {
        return Ok(ViewResult::Empty);
    }
    let counts = count_strings(records, COD_MUERTE)?;
    let joined = left_join(counts, |code| causes.description(code).map(str::to_string));
    let (matched, excluded) = split_unmatched(joined);
    log_exclusions("Cause totals", "cause code without description", excluded.excluded_records);

    let rows: Vec<CauseCount> = matched
        .into_iter()
        .sorted_by(|(code_a, count_a, _), (code_b, count_b, _)| {
            count_b.cmp(count_a).then_with(|| code_a.cmp(code_b))
        })
        .take(limit)
        .map(|(cause_code, deaths, description)| CauseCount {
            cause_code,
            description,
            deaths,
        })
        .collect();

    Ok(joined_result(!rows.is_empty(), excluded, |excluded| CauseTable {
        rows,
        excluded,
    }))
}
