//! Table schemas and schema validation.

pub mod columns;
pub mod headers;
pub mod tables;

use arrow::datatypes::Schema;

use crate::error::{DashboardError, Result};

pub use tables::{cause_codes_schema, death_records_schema, geography_schema};

/// Names from `required` that `schema` does not carry
#[must_use]
pub fn missing_columns(schema: &Schema, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|name| schema.index_of(name).is_err())
        .map(|name| (*name).to_string())
        .collect()
}

/// Fail with `SchemaMismatch` unless every required column is present
pub fn require_columns(schema: &Schema, table: &str, required: &[&str]) -> Result<()> {
    let missing = missing_columns(schema, required);
    if missing.is_empty() {
        Ok(())
    } else {
        log::error!("{table} is missing required field(s): {}", missing.join(", "));
        Err(DashboardError::schema_mismatch(table, missing))
    }
}
