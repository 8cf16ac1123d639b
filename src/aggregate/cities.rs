//! City rankings: most violent deaths, lowest mortality

use std::cmp::Ordering;

use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use serde::Serialize;

use crate::aggregate::{ViewResult, count_by, has_rows, joined_result};
use crate::error::Result;
use crate::filter::CausePrefixFilter;
use crate::reconcile::{GeographyIndex, JoinExclusions, left_join, split_unmatched};
use crate::schema::columns::{COD_DANE, COD_MUERTE, TABLE_DEATHS};
use crate::utils::arrow_utils::{string_at, string_column};
use crate::utils::logging::log_exclusions;

/// Deaths in one municipality
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityCount {
    pub municipality_code: String,
    pub municipality_name: String,
    pub deaths: usize,
}

/// A ranked list of cities
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityTable {
    pub rows: Vec<CityCount>,
    /// Municipalities without a geography row, removed before ranking
    pub excluded: JoinExclusions,
}

/// Top cities by deaths from violent causes (X95, X93, X99)
///
/// Sorted by count descending, then municipality code ascending.
pub fn violent_death_cities(
    records: &RecordBatch,
    geography: &GeographyIndex,
    limit: usize,
) -> Result<ViewResult<CityTable>> {
    if !has_rows(records, &[COD_DANE, COD_MUERTE])? {
        return Ok(ViewResult::Empty);
    }
    let violent = CausePrefixFilter::violent();
    let municipalities = string_column(records, TABLE_DEATHS, COD_DANE)?;
    let causes = string_column(records, TABLE_DEATHS, COD_MUERTE)?;
    let counts = count_by(records.num_rows(), |row| {
        string_at(causes, row)
            .filter(|code| violent.matches(code))
            .and(string_at(municipalities, row))
            .map(str::to_string)
    });
    rank_cities(counts, geography, limit, "Violent-death cities", |a: &usize, b: &usize| b.cmp(a))
}

/// Cities with the fewest deaths
///
/// Sorted by count ascending, then municipality code ascending.
pub fn lowest_mortality_cities(
    records: &RecordBatch,
    geography: &GeographyIndex,
    limit: usize,
) -> Result<ViewResult<CityTable>> {
    if !has_rows(records, &[COD_DANE])? {
        return Ok(ViewResult::Empty);
    }
    let municipalities = string_column(records, TABLE_DEATHS, COD_DANE)?;
    let counts = count_by(records.num_rows(), |row| {
        string_at(municipalities, row).map(str::to_string)
    });
    rank_cities(counts, geography, limit, "Lowest-mortality cities", Ord::cmp)
}

fn rank_cities(
    counts: impl IntoIterator<Item = (String, usize)>,
    geography: &GeographyIndex,
    limit: usize,
    stage: &str,
    by_count: impl Fn(&usize, &usize) -> Ordering,
) -> Result<ViewResult<CityTable>> {
    let joined = left_join(counts, |code| {
        geography.municipality_name(code).map(str::to_string)
    });
    let (matched, excluded) = split_unmatched(joined);
    log_exclusions(stage, "municipality not in geography", excluded.excluded_records);

    let rows: Vec<CityCount> = matched
        .into_iter()
        .sorted_by(|(code_a, count_a, _), (code_b, count_b, _)| {
            by_count(count_a, count_b).then_with(|| code_a.cmp(code_b))
        })
        .take(limit)
        .map(|(municipality_code, deaths, municipality_name)| CityCount {
            municipality_code,
            municipality_name,
            deaths,
        })
        .collect();

    Ok(joined_result(!rows.is_empty(), excluded, |excluded| CityTable {
        rows,
        excluded,
    }))
}
