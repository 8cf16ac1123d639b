//! Lookup indexes over the reference tables
//!
//! Built once after loading and shared read-only by every view.

use arrow::record_batch::RecordBatch;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::Result;
use crate::geo::Centroid;
use crate::reconcile::keys::{fold_name, normalize_cause_code, pad_department_code, pad_municipality_code};
use crate::schema::columns::*;
use crate::schema::require_columns;
use crate::utils::arrow_utils::{float64_at, float64_column, string_at, string_column};

/// Department and municipality lookups over the DIVIPOLA reference
#[derive(Debug, Clone, Default)]
pub struct GeographyIndex {
    department_names: FxHashMap<String, String>,
    municipality_names: FxHashMap<String, String>,
    municipalities_by_department: FxHashMap<String, FxHashSet<String>>,
    centroids: FxHashMap<String, Centroid>,
}

impl GeographyIndex {
    /// Build the index from a geography batch
    ///
    /// Codes are re-padded so that a batch built outside the loader still
    /// joins on the same keys as the death records.
    pub fn from_batch(batch: &RecordBatch) -> Result<Self> {
        require_columns(
            &batch.schema(),
            TABLE_GEOGRAPHY,
            &[COD_DEPARTAMENTO, DEPARTAMENTO, COD_DANE, MUNICIPIO],
        )?;
        let department_codes = string_column(batch, TABLE_GEOGRAPHY, COD_DEPARTAMENTO)?;
        let department_names = string_column(batch, TABLE_GEOGRAPHY, DEPARTAMENTO)?;
        let municipality_codes = string_column(batch, TABLE_GEOGRAPHY, COD_DANE)?;
        let municipality_names = string_column(batch, TABLE_GEOGRAPHY, MUNICIPIO)?;
        let latitudes = float64_column(batch, TABLE_GEOGRAPHY, LATITUD).ok();
        let longitudes = float64_column(batch, TABLE_GEOGRAPHY, LONGITUD).ok();

        let mut index = Self::default();
        for row in 0..batch.num_rows() {
            let Some(department) = string_at(department_codes, row).and_then(pad_department_code)
            else {
                continue;
            };
            let municipality = string_at(municipality_codes, row).and_then(pad_municipality_code);

            if let Some(name) = string_at(department_names, row) {
                index
                    .department_names
                    .entry(department.clone())
                    .or_insert_with(|| name.to_string());
                if let Some(code) = &municipality {
                    index
                        .municipalities_by_department
                        .entry(fold_name(name))
                        .or_default()
                        .insert(code.clone());
                }
            }
            if let (Some(code), Some(name)) = (&municipality, string_at(municipality_names, row)) {
                index
                    .municipality_names
                    .entry(code.clone())
                    .or_insert_with(|| name.to_string());
            }
            let latitude = latitudes.and_then(|a| float64_at(a, row));
            let longitude = longitudes.and_then(|a| float64_at(a, row));
            if let (Some(latitude), Some(longitude)) = (latitude, longitude) {
                index.centroids.entry(department).or_insert(Centroid {
                    latitude,
                    longitude,
                });
            }
        }

        log::debug!(
            "Indexed {} departments, {} municipalities, {} source centroids",
            index.department_names.len(),
            index.municipality_names.len(),
            index.centroids.len()
        );
        Ok(index)
    }

    /// Municipality codes of a department, looked up by accent-folded name
    #[must_use]
    pub fn municipalities_in(&self, department_name: &str) -> Option<&FxHashSet<String>> {
        self.municipalities_by_department.get(&fold_name(department_name))
    }

    /// Department name for a 2-digit code
    #[must_use]
    pub fn department_name(&self, code: &str) -> Option<&str> {
        self.department_names.get(code).map(String::as_str)
    }

    /// Municipality name for a 5-digit code
    #[must_use]
    pub fn municipality_name(&self, code: &str) -> Option<&str> {
        self.municipality_names.get(code).map(String::as_str)
    }

    /// Centroid supplied by the geography source for a department
    #[must_use]
    pub fn centroid(&self, code: &str) -> Option<Centroid> {
        self.centroids.get(code).copied()
    }

    /// Whether the geography source carried any centroid coordinates
    #[must_use]
    pub fn has_centroids(&self) -> bool {
        !self.centroids.is_empty()
    }

    /// Iterate over (department code, department name)
    pub fn departments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.department_names
            .iter()
            .map(|(code, name)| (code.as_str(), name.as_str()))
    }

    /// Sorted, unique department names
    #[must_use]
    pub fn department_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.department_names.values().cloned().collect();
        names.sort();
        names.dedup();
        names
    }
}

/// ICD-10 4-character code to description
///
/// The reference may list a code more than once; the first non-empty
/// description wins so the join never fans out.
#[derive(Debug, Clone, Default)]
pub struct CauseIndex {
    descriptions: FxHashMap<String, String>,
}

impl CauseIndex {
    /// Build the index from a cause-code batch
    pub fn from_batch(batch: &RecordBatch) -> Result<Self> {
        require_columns(&batch.schema(), TABLE_CAUSES, &[CODIGO_CIE10_4, DESCRIPCION_4])?;
        let codes = string_column(batch, TABLE_CAUSES, CODIGO_CIE10_4)?;
        let descriptions = string_column(batch, TABLE_CAUSES, DESCRIPCION_4)?;

        let mut index = Self::default();
        let mut duplicates = 0usize;
        for row in 0..batch.num_rows() {
            let Some(code) = string_at(codes, row).and_then(normalize_cause_code) else {
                continue;
            };
            let Some(description) = string_at(descriptions, row)
                .map(str::trim)
                .filter(|d| !d.is_empty())
            else {
                continue;
            };
            if index.descriptions.contains_key(&code) {
                duplicates += 1;
            } else {
                index.descriptions.insert(code, description.to_string());
            }
        }
        if duplicates > 0 {
            log::debug!("Cause reference lists {duplicates} repeated 4-character codes");
        }
        Ok(index)
    }

    /// Description of a 4-character code
    #[must_use]
    pub fn description(&self, code: &str) -> Option<&str> {
        self.descriptions.get(code).map(String::as_str)
    }

    /// Number of distinct codes
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    /// Whether the index holds no codes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }
}
