//! Age band × sex distribution

use arrow::record_batch::RecordBatch;
use serde::Serialize;

use crate::aggregate::{ViewResult, count_by, has_rows};
use crate::error::Result;
use crate::models::Sex;
use crate::models::age_band::{BAND_ORDER, band_label};
use crate::schema::columns::{GRUPO_EDAD1, SEXO, TABLE_DEATHS};
use crate::utils::arrow_utils::{int32_at, int32_column};

/// Deaths in one age band for one sex
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgeBandCount {
    pub band: &'static str,
    pub sex: Sex,
    pub deaths: usize,
}

/// Every band × sex combination in canonical band order, zeros included
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgeSexTable {
    pub rows: Vec<AgeBandCount>,
}

impl AgeSexTable {
    /// Deaths in a band across all sexes
    #[must_use]
    pub fn band_total(&self, band: &str) -> usize {
        self.rows
            .iter()
            .filter(|r| r.band == band)
            .map(|r| r.deaths)
            .sum()
    }

    /// Bands with at least one death, in canonical order
    pub fn populated_bands(&self) -> impl Iterator<Item = &'static str> + '_ {
        BAND_ORDER
            .iter()
            .copied()
            .filter(|band| self.band_total(band) > 0)
    }
}

/// Group by (age band, sex) and count
///
/// Null or out-of-range age identifiers count as "Unknown"; null sex counts
/// as [`Sex::Unknown`].
pub fn age_sex_counts(records: &RecordBatch) -> Result<ViewResult<AgeSexTable>> {
    if !has_rows(records, &[GRUPO_EDAD1, SEXO])? {
        return Ok(ViewResult::Empty);
    }
    let ages = int32_column(records, TABLE_DEATHS, GRUPO_EDAD1)?;
    let sexes = int32_column(records, TABLE_DEATHS, SEXO)?;
    let counts = count_by(records.num_rows(), |row| {
        Some((
            band_label(int32_at(ages, row)),
            Sex::from_code(int32_at(sexes, row)),
        ))
    });

    let counts = &counts;
    let rows = BAND_ORDER
        .into_iter()
        .flat_map(|band| {
            Sex::ALL.into_iter().map(move |sex| AgeBandCount {
                band,
                sex,
                deaths: counts.get(&(band, sex)).copied().unwrap_or(0),
            })
        })
        .collect();
    Ok(ViewResult::Rows(AgeSexTable { rows }))
}
