//! Death-records source

use std::path::Path;
use std::time::Instant;

use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashSet;

use crate::error::Result;
use crate::loader::LoadReport;
use crate::loader::raw::{RawTable, cell, parse_integer};
use crate::models::{DeathRecord, EventDate};
use crate::reconcile::keys::{
    department_of_municipality, normalize_cause_code, pad_department_code, pad_municipality_code,
    title_case,
};
use crate::schema::columns::*;
use crate::utils::logging::{log_exclusions, log_operation_complete, log_operation_start};

/// Columns the death-records source must provide
pub const REQUIRED_COLUMNS: [&str; 7] = [
    COD_DANE,
    SEXO,
    MANERA_MUERTE,
    COD_MUERTE,
    ANIO,
    MES,
    GRUPO_EDAD1,
];

/// Load and normalize the death-records source
pub fn load_death_records(path: &Path) -> Result<(RecordBatch, LoadReport)> {
    log_operation_start("Loading death records from", path);
    let start = Instant::now();

    let mut raw = RawTable::read(path, "death records", b',')?;
    raw.repair_headers(true);
    let (records, report) = normalize_death_rows(&raw)?;
    let batch = DeathRecord::to_record_batch(&records)?;

    log_operation_complete("loaded", path, batch.num_rows(), Some(start.elapsed()));
    report.log();
    Ok((batch, report))
}

/// Normalize raw rows into death records
///
/// Codes are zero-padded, manner of death title-cased, cause code
/// upper-cased, numeric fields coerced (invalid becomes null). Rows without a
/// cause code or without any location are dropped, then exact duplicates.
pub fn normalize_death_rows(raw: &RawTable) -> Result<(Vec<DeathRecord>, LoadReport)> {
    raw.require(&REQUIRED_COLUMNS)?;
    let municipality_idx = raw.column(COD_DANE);
    let department_idx = raw.column(COD_DEPARTAMENTO);
    let sex_idx = raw.column(SEXO);
    let manner_idx = raw.column(MANERA_MUERTE);
    let cause_idx = raw.column(COD_MUERTE);
    let year_idx = raw.column(ANIO);
    let month_idx = raw.column(MES);
    let hour_idx = raw.column(HORA);
    let minute_idx = raw.column(MINUTOS);
    let age_idx = raw.column(GRUPO_EDAD1);

    let consumed: FxHashSet<usize> = [
        municipality_idx,
        department_idx,
        sex_idx,
        manner_idx,
        cause_idx,
        year_idx,
        month_idx,
        hour_idx,
        minute_idx,
        age_idx,
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut report = LoadReport::new(TABLE_DEATHS, raw);
    let mut seen: FxHashSet<(DeathRecord, Vec<Option<String>>)> = FxHashSet::default();
    let mut records = Vec::with_capacity(raw.len());

    for row in &raw.rows {
        let Some(cause_code) = cell(row, cause_idx).and_then(normalize_cause_code) else {
            report.dropped_null_cause += 1;
            continue;
        };

        let municipality_code = cell(row, municipality_idx).and_then(pad_municipality_code);
        let explicit_department = cell(row, department_idx).and_then(pad_department_code);
        let derived_department = municipality_code
            .as_deref()
            .and_then(department_of_municipality);
        if let (Some(explicit), Some(derived)) = (&explicit_department, &derived_department) {
            if explicit != derived {
                report.department_mismatches += 1;
            }
        }
        let (Some(municipality_code), Some(department_code)) =
            (municipality_code, derived_department.or(explicit_department))
        else {
            report.dropped_missing_location += 1;
            continue;
        };

        let year = parse_integer(cell(row, year_idx));
        let month = parse_integer(cell(row, month_idx));
        let event_date = EventDate::from_year_month(year, month);
        if event_date == EventDate::Unresolved {
            report.unresolved_dates += 1;
        }

        let record = DeathRecord {
            department_code,
            municipality_code,
            sex: parse_integer(cell(row, sex_idx)),
            manner_of_death: cell(row, manner_idx).and_then(title_case),
            cause_code,
            year,
            month,
            hour: parse_integer(cell(row, hour_idx)),
            minute: parse_integer(cell(row, minute_idx)),
            age_group: parse_integer(cell(row, age_idx)),
            event_date,
        };

        let extra: Vec<Option<String>> = row
            .iter()
            .enumerate()
            .filter(|(i, _)| !consumed.contains(i))
            .map(|(_, value)| value.as_ref().map(|v| v.trim().to_string()))
            .collect();
        if seen.insert((record.clone(), extra)) {
            records.push(record);
        } else {
            report.dropped_duplicates += 1;
        }
    }

    report.rows_kept = records.len();
    Ok((records, report))
}

impl LoadReport {
    /// Log the row accounting of a load
    pub fn log(&self) {
        let stage = format!("Loading {}", self.source);
        log_exclusions(&stage, "blank rows", self.dropped_empty);
        log_exclusions(&stage, "null cause code", self.dropped_null_cause);
        log_exclusions(&stage, "no municipality or department code", self.dropped_missing_location);
        log_exclusions(&stage, "exact duplicates", self.dropped_duplicates);
        if self.unresolved_dates > 0 {
            log::info!("{stage}: {} rows have an unresolved event date", self.unresolved_dates);
        }
        if self.department_mismatches > 0 {
            log::warn!(
                "{stage}: {} rows carry a department code that disagrees with the municipality code; the municipality prefix was used",
                self.department_mismatches
            );
        }
    }
}
