//! Cause-code (ICD-10) source

use std::path::Path;
use std::time::Instant;

use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashSet;

use crate::error::{DashboardError, Result};
use crate::loader::LoadReport;
use crate::loader::raw::{RawTable, cell};
use crate::models::CauseCode;
use crate::schema::columns::{CAUSE_CODE_COLUMNS, TABLE_CAUSES};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Load and normalize the cause-code reference
///
/// Some exports are `;`-separated; when the comma reader yields a single
/// column that still contains `;`, the file is re-read with `;`.
pub fn load_cause_codes(path: &Path) -> Result<(RecordBatch, LoadReport)> {
    log_operation_start("Loading cause codes from", path);
    let start = Instant::now();

    let mut raw = RawTable::read(path, "cause codes", b',')?;
    if raw.headers.len() == 1 && raw.headers[0].contains(';') {
        log::debug!("{} is ';'-separated, re-reading", path.display());
        raw = RawTable::read(path, "cause codes", b';')?;
    }
    raw.repair_headers(false);

    let (codes, report) = normalize_cause_rows(&raw)?;
    let batch = CauseCode::to_record_batch(&codes)?;

    log_operation_complete("loaded", path, batch.num_rows(), Some(start.elapsed()));
    report.log();
    Ok((batch, report))
}

/// Assign the six cause-code fields by position, trim them, drop duplicates
pub fn normalize_cause_rows(raw: &RawTable) -> Result<(Vec<CauseCode>, LoadReport)> {
    if raw.headers.len() != CAUSE_CODE_COLUMNS.len() {
        return Err(DashboardError::parse(
            &raw.path,
            format!(
                "expected {} columns ({}), found {}",
                CAUSE_CODE_COLUMNS.len(),
                CAUSE_CODE_COLUMNS.join(", "),
                raw.headers.len()
            ),
        ));
    }

    let mut report = LoadReport::new(TABLE_CAUSES, raw);
    let mut seen = FxHashSet::default();
    let mut codes = Vec::with_capacity(raw.len());
    let field = |row: &[Option<String>], i: usize| cell(row, Some(i)).map(|v| v.trim().to_string());

    for row in &raw.rows {
        let code = CauseCode {
            chapter: field(row, 0),
            chapter_name: field(row, 1),
            code3: field(row, 2),
            description3: field(row, 3),
            code4: field(row, 4),
            description4: field(row, 5),
        };
        if seen.insert(code.clone()) {
            codes.push(code);
        } else {
            report.dropped_duplicates += 1;
        }
    }

    report.rows_kept = codes.len();
    Ok((codes, report))
}
