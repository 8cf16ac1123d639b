//! DIVIPOLA geography source

use std::path::Path;
use std::time::Instant;

use arrow::record_batch::RecordBatch;
use itertools::Itertools;

use crate::error::Result;
use crate::loader::LoadReport;
use crate::loader::raw::{RawTable, cell, parse_coordinate};
use crate::models::GeoUnit;
use crate::reconcile::keys::{
    department_of_municipality, pad_department_code, pad_municipality_code, title_case,
};
use crate::schema::columns::*;
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Load and normalize the geography reference
pub fn load_geography(path: &Path) -> Result<(RecordBatch, LoadReport)> {
    log_operation_start("Loading geography from", path);
    let start = Instant::now();

    let mut raw = RawTable::read(path, "geography", b',')?;
    raw.repair_headers(true);
    let (units, report) = normalize_geography_rows(&raw)?;
    let batch = GeoUnit::to_record_batch(&units)?;

    log_operation_complete("loaded", path, batch.num_rows(), Some(start.elapsed()));
    report.log();
    Ok((batch, report))
}

/// Pad codes, title-case names, parse optional centroids, drop duplicates
pub fn normalize_geography_rows(raw: &RawTable) -> Result<(Vec<GeoUnit>, LoadReport)> {
    raw.require(&[COD_DANE, DEPARTAMENTO, MUNICIPIO])?;
    let municipality_idx = raw.column(COD_DANE);
    let department_code_idx = raw.column(COD_DEPARTAMENTO);
    let department_idx = raw.column(DEPARTAMENTO);
    let name_idx = raw.column(MUNICIPIO);
    let latitude_idx = raw.column(LATITUD);
    let longitude_idx = raw.column(LONGITUD);

    let mut report = LoadReport::new(TABLE_GEOGRAPHY, raw);
    let mut units = Vec::with_capacity(raw.len());

    for row in &raw.rows {
        let Some(municipality_code) = cell(row, municipality_idx).and_then(pad_municipality_code)
        else {
            report.dropped_missing_location += 1;
            continue;
        };
        let derived = department_of_municipality(&municipality_code);
        let explicit = cell(row, department_code_idx).and_then(pad_department_code);
        let Some(department_code) = derived.or(explicit) else {
            report.dropped_missing_location += 1;
            continue;
        };
        units.push(GeoUnit {
            department_code,
            department_name: cell(row, department_idx).and_then(title_case),
            municipality_code,
            municipality_name: cell(row, name_idx).and_then(title_case),
            latitude: parse_coordinate(cell(row, latitude_idx)),
            longitude: parse_coordinate(cell(row, longitude_idx)),
        });
    }

    let before = units.len();
    let units: Vec<GeoUnit> = units.into_iter().unique_by(GeoUnit::dedup_key).collect();
    report.dropped_duplicates = before - units.len();
    report.rows_kept = units.len();
    Ok((units, report))
}
