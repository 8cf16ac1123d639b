//! The user's cross-filter selection

use std::sync::Arc;

use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::error::Result;
use crate::filter::core::{AndFilter, BatchFilter};
use crate::filter::predicates::{AgeBandFilter, CauseCodeFilter, MunicipalityFilter, SexFilter};
use crate::models::SexSelector;
use crate::models::age_band::canonical_band;
use crate::reconcile::GeographyIndex;

/// Dropdown value meaning "no restriction"
pub const ALL_OPTION: &str = "Todos";

/// Optional restrictions on sex, department, cause code and age band
///
/// Absent dimensions (or "Todos") do not restrict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    #[serde(serialize_with = "serialize_sex")]
    pub sex: SexSelector,
    /// Department name, matched accent- and case-insensitively
    pub department: Option<String>,
    pub cause_code: Option<String>,
    /// Canonical band label such as `"20-24"` or `"Unknown"`
    pub age_band: Option<String>,
}

fn serialize_sex<S: serde::Serializer>(
    sex: &SexSelector,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match sex {
        SexSelector::Any => serializer.serialize_str(ALL_OPTION),
        SexSelector::Only(sex) => sex.serialize(serializer),
    }
}

/// `None` for blank input and for the "Todos"/"Total" option
fn restriction(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case(ALL_OPTION)
        || trimmed.eq_ignore_ascii_case("total")
    {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl FilterSelection {
    /// Selection without any restriction
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_sex(mut self, sex: SexSelector) -> Self {
        self.sex = sex;
        self
    }

    #[must_use]
    pub fn with_department(mut self, department: &str) -> Self {
        self.department = restriction(department);
        self
    }

    #[must_use]
    pub fn with_cause_code(mut self, code: &str) -> Self {
        self.cause_code = restriction(code).map(|c| c.to_uppercase());
        self
    }

    /// Unrecognised labels are kept as given and match no record
    #[must_use]
    pub fn with_age_band(mut self, band: &str) -> Self {
        self.age_band =
            restriction(band).map(|b| canonical_band(&b).map_or(b, str::to_string));
        self
    }

    /// Whether no dimension is restricted
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.sex == SexSelector::Any
            && self.department.is_none()
            && self.cause_code.is_none()
            && self.age_band.is_none()
    }

    /// One predicate per restricted dimension
    ///
    /// A department unknown to the geography resolves to an empty municipality
    /// set, so the selection matches nothing rather than failing.
    #[must_use]
    pub fn predicates(&self, geography: &GeographyIndex) -> Vec<Arc<dyn BatchFilter>> {
        let mut predicates: Vec<Arc<dyn BatchFilter>> = Vec::new();
        if let SexSelector::Only(sex) = self.sex {
            predicates.push(Arc::new(SexFilter(sex)));
        }
        if let Some(department) = &self.department {
            let codes = geography.municipalities_in(department).cloned().unwrap_or_else(|| {
                log::debug!("Department {department:?} not in geography; selection is empty");
                FxHashSet::default()
            });
            predicates.push(Arc::new(MunicipalityFilter::new(Arc::new(codes))));
        }
        if let Some(code) = &self.cause_code {
            predicates.push(Arc::new(CauseCodeFilter::new(code)));
        }
        if let Some(band) = &self.age_band {
            predicates.push(Arc::new(AgeBandFilter::new(band.clone())));
        }
        predicates
    }
}

/// Apply a selection to the death records, producing a new batch
///
/// The input batch is never modified. No match yields an empty batch.
pub fn apply_filters(
    records: &RecordBatch,
    geography: &GeographyIndex,
    selection: &FilterSelection,
) -> Result<RecordBatch> {
    let filter = AndFilter::new(selection.predicates(geography));
    let filtered = filter.filter(records)?;
    log::debug!(
        "Selection {:?} kept {} of {} records",
        selection,
        filtered.num_rows(),
        records.num_rows()
    );
    Ok(filtered)
}
