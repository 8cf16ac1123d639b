//! Predicates over the death-records table

use std::sync::Arc;

use arrow::array::BooleanArray;
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashSet;

use crate::error::Result;
use crate::filter::core::BatchFilter;
use crate::models::Sex;
use crate::models::age_band::band_label;
use crate::schema::columns::{COD_DANE, COD_MUERTE, GRUPO_EDAD1, MANERA_MUERTE, SEXO, TABLE_DEATHS};
use crate::utils::arrow_utils::{int32_at, int32_column, string_at, string_column};

/// ICD-10 3-character prefixes of the violent causes ranked by city
pub const VIOLENT_CAUSE_PREFIXES: [&str; 3] = ["X95", "X93", "X99"];

fn string_mask(
    batch: &RecordBatch,
    column: &str,
    keep: impl Fn(Option<&str>) -> bool,
) -> Result<BooleanArray> {
    let values = string_column(batch, TABLE_DEATHS, column)?;
    Ok((0..batch.num_rows())
        .map(|row| Some(keep(string_at(values, row))))
        .collect())
}

fn int_mask(
    batch: &RecordBatch,
    column: &str,
    keep: impl Fn(Option<i32>) -> bool,
) -> Result<BooleanArray> {
    let values = int32_column(batch, TABLE_DEATHS, column)?;
    Ok((0..batch.num_rows())
        .map(|row| Some(keep(int32_at(values, row))))
        .collect())
}

/// Records of one sex; a null code counts as [`Sex::Unknown`]
#[derive(Debug, Clone, Copy)]
pub struct SexFilter(pub Sex);

impl BatchFilter for SexFilter {
    fn mask(&self, batch: &RecordBatch) -> Result<BooleanArray> {
        int_mask(batch, SEXO, |code| Sex::from_code(code) == self.0)
    }

    fn required_columns(&self) -> Vec<&'static str> {
        vec![SEXO]
    }
}

/// Records whose municipality code is in a set
///
/// The department filter resolves to this: a department name maps to its
/// municipality codes through the geography index.
#[derive(Debug, Clone)]
pub struct MunicipalityFilter {
    codes: Arc<FxHashSet<String>>,
}

impl MunicipalityFilter {
    #[must_use]
    pub fn new(codes: Arc<FxHashSet<String>>) -> Self {
        Self { codes }
    }
}

impl BatchFilter for MunicipalityFilter {
    fn mask(&self, batch: &RecordBatch) -> Result<BooleanArray> {
        string_mask(batch, COD_DANE, |code| {
            code.is_some_and(|c| self.codes.contains(c))
        })
    }

    fn required_columns(&self) -> Vec<&'static str> {
        vec![COD_DANE]
    }
}

/// Records with exactly this cause code
#[derive(Debug, Clone)]
pub struct CauseCodeFilter {
    code: String,
}

impl CauseCodeFilter {
    /// The code is compared after trimming and upper-casing
    #[must_use]
    pub fn new(code: &str) -> Self {
        Self {
            code: code.trim().to_uppercase(),
        }
    }
}

impl BatchFilter for CauseCodeFilter {
    fn mask(&self, batch: &RecordBatch) -> Result<BooleanArray> {
        string_mask(batch, COD_MUERTE, |code| code == Some(self.code.as_str()))
    }

    fn required_columns(&self) -> Vec<&'static str> {
        vec![COD_MUERTE]
    }
}

/// Records whose cause code starts with any of the given prefixes
#[derive(Debug, Clone)]
pub struct CausePrefixFilter {
    prefixes: Vec<String>,
}

impl CausePrefixFilter {
    #[must_use]
    pub fn new<S: AsRef<str>>(prefixes: &[S]) -> Self {
        Self {
            prefixes: prefixes
                .iter()
                .map(|p| p.as_ref().trim().to_uppercase())
                .collect(),
        }
    }

    /// Homicide causes: assault by firearm (X95), by smoke or fire (X93)
    /// and by sharp object (X99)
    #[must_use]
    pub fn violent() -> Self {
        Self::new(&VIOLENT_CAUSE_PREFIXES)
    }

    /// Whether a single code passes
    #[must_use]
    pub fn matches(&self, code: &str) -> bool {
        self.prefixes.iter().any(|p| code.starts_with(p.as_str()))
    }
}

impl BatchFilter for CausePrefixFilter {
    fn mask(&self, batch: &RecordBatch) -> Result<BooleanArray> {
        string_mask(batch, COD_MUERTE, |code| code.is_some_and(|c| self.matches(c)))
    }

    fn required_columns(&self) -> Vec<&'static str> {
        vec![COD_MUERTE]
    }
}

/// Records whose age-group identifier falls in a band
#[derive(Debug, Clone)]
pub struct AgeBandFilter {
    band: String,
}

impl AgeBandFilter {
    #[must_use]
    pub fn new(band: impl Into<String>) -> Self {
        Self { band: band.into() }
    }
}

impl BatchFilter for AgeBandFilter {
    fn mask(&self, batch: &RecordBatch) -> Result<BooleanArray> {
        int_mask(batch, GRUPO_EDAD1, |id| band_label(id) == self.band)
    }

    fn required_columns(&self) -> Vec<&'static str> {
        vec![GRUPO_EDAD1]
    }
}

/// Records with this manner of death (case-insensitive)
#[derive(Debug, Clone)]
pub struct MannerOfDeathFilter {
    manner: String,
}

impl MannerOfDeathFilter {
    #[must_use]
    pub fn new(manner: &str) -> Self {
        Self {
            manner: manner.trim().to_lowercase(),
        }
    }
}

impl BatchFilter for MannerOfDeathFilter {
    fn mask(&self, batch: &RecordBatch) -> Result<BooleanArray> {
        string_mask(batch, MANERA_MUERTE, |manner| {
            manner.is_some_and(|m| m.to_lowercase() == self.manner)
        })
    }

    fn required_columns(&self) -> Vec<&'static str> {
        vec![MANERA_MUERTE]
    }
}
