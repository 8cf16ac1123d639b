//! Department totals and department × sex counts

use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::aggregate::{ViewResult, count_strings, has_rows, joined_result};
use crate::error::Result;
use crate::models::Sex;
use crate::reconcile::{GeographyIndex, JoinExclusions, left_join, split_unmatched};
use crate::schema::columns::{COD_DEPARTAMENTO, SEXO, TABLE_DEATHS};
use crate::utils::arrow_utils::{int32_at, int32_column, string_at, string_column};
use crate::utils::logging::log_exclusions;

/// Deaths of one department
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentCount {
    pub department_code: String,
    pub deaths: usize,
}

/// Deaths per department code, sorted by code
///
/// No join is involved, so the counts always sum to the filtered record count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentTotals {
    pub rows: Vec<DepartmentCount>,
}

impl DepartmentTotals {
    /// Sum of all department counts
    #[must_use]
    pub fn total(&self) -> usize {
        self.rows.iter().map(|r| r.deaths).sum()
    }

    /// Count of one department
    #[must_use]
    pub fn get(&self, department_code: &str) -> Option<usize> {
        self.rows
            .iter()
            .find(|r| r.department_code == department_code)
            .map(|r| r.deaths)
    }
}

/// Group the filtered records by department code and count
pub fn department_totals(records: &RecordBatch) -> Result<ViewResult<DepartmentTotals>> {
    if !has_rows(records, &[COD_DEPARTAMENTO])? {
        return Ok(ViewResult::Empty);
    }
    let mut rows: Vec<DepartmentCount> = count_strings(records, COD_DEPARTAMENTO)?
        .into_iter()
        .map(|(department_code, deaths)| DepartmentCount {
            department_code,
            deaths,
        })
        .collect();
    rows.sort_by(|a, b| a.department_code.cmp(&b.department_code));
    Ok(ViewResult::Rows(DepartmentTotals { rows }))
}

/// Deaths of one department and sex
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentSexCount {
    pub department_code: String,
    pub department_name: String,
    pub sex: Sex,
    pub deaths: usize,
}

/// Department × sex counts with the departments missing from the geography
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentSexTable {
    /// Sorted by department name, then sex
    pub rows: Vec<DepartmentSexCount>,
    pub excluded: JoinExclusions,
}

/// Group by (department code, sex), count, and join the department name
pub fn department_sex_counts(
    records: &RecordBatch,
    geography: &GeographyIndex,
) -> Result<ViewResult<DepartmentSexTable>> {
    if !has_rows(records, &[COD_DEPARTAMENTO, SEXO])? {
        return Ok(ViewResult::Empty);
    }
    let departments = string_column(records, TABLE_DEATHS, COD_DEPARTAMENTO)?;
    let sexes = int32_column(records, TABLE_DEATHS, SEXO)?;

    let mut by_department: FxHashMap<String, [usize; 3]> = FxHashMap::default();
    for row in 0..records.num_rows() {
        let Some(code) = string_at(departments, row) else {
            continue;
        };
        let sex = Sex::from_code(int32_at(sexes, row));
        by_department.entry(code.to_string()).or_default()[sex_slot(sex)] += 1;
    }

    let totals = by_department
        .iter()
        .map(|(code, counts)| (code.clone(), counts.iter().sum()));
    let joined = left_join(totals, |code| geography.department_name(code).map(str::to_string));
    let (matched, excluded) = split_unmatched(joined);
    log_exclusions("Department × sex", "department not in geography", excluded.excluded_records);

    let mut rows = Vec::with_capacity(matched.len() * Sex::ALL.len());
    for (department_code, _, department_name) in matched {
        let counts = by_department.get(&department_code).copied().unwrap_or_default();
        for sex in Sex::ALL {
            let deaths = counts[sex_slot(sex)];
            if deaths > 0 {
                rows.push(DepartmentSexCount {
                    department_code: department_code.clone(),
                    department_name: department_name.clone(),
                    sex,
                    deaths,
                });
            }
        }
    }

    rows.sort_by(|a, b| {
        a.department_name
            .cmp(&b.department_name)
            .then_with(|| a.department_code.cmp(&b.department_code))
            .then_with(|| a.sex.cmp(&b.sex))
    });
    Ok(joined_result(!rows.is_empty(), excluded, |excluded| {
        DepartmentSexTable { rows, excluded }
    }))
}

const fn sex_slot(sex: Sex) -> usize {
    match sex {
        Sex::Male => 0,
        Sex::Female => 1,
        Sex::Unknown => 2,
    }
}
