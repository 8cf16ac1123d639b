//! Arrow utility functions for typed column access
//!
//! Aggregators read columns by name; a missing column or an unexpected type
//! is schema drift and surfaces as `SchemaMismatch` naming the field.

use arrow::array::{Array, Date32Array, Float64Array, Int32Array, StringArray};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate};

use crate::error::{DashboardError, Result};

fn column<'a, A: Array + 'static>(
    batch: &'a RecordBatch,
    table: &str,
    name: &str,
    type_name: &str,
) -> Result<&'a A> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| DashboardError::schema_mismatch(table, [name]))?;
    column.as_any().downcast_ref::<A>().ok_or_else(|| {
        DashboardError::schema_mismatch(
            table,
            [format!("{name} ({type_name}, found {:?})", column.data_type())],
        )
    })
}

/// Get a Utf8 column by name
pub fn string_column<'a>(batch: &'a RecordBatch, table: &str, name: &str) -> Result<&'a StringArray> {
    column::<StringArray>(batch, table, name, "Utf8")
}

/// Get an Int32 column by name
pub fn int32_column<'a>(batch: &'a RecordBatch, table: &str, name: &str) -> Result<&'a Int32Array> {
    column::<Int32Array>(batch, table, name, "Int32")
}

/// Get a Float64 column by name
pub fn float64_column<'a>(
    batch: &'a RecordBatch,
    table: &str,
    name: &str,
) -> Result<&'a Float64Array> {
    column::<Float64Array>(batch, table, name, "Float64")
}

/// Get a Date32 column by name
pub fn date32_column<'a>(batch: &'a RecordBatch, table: &str, name: &str) -> Result<&'a Date32Array> {
    column::<Date32Array>(batch, table, name, "Date32")
}

/// Value of a string array at `row`, `None` when null
#[must_use]
pub fn string_at(array: &StringArray, row: usize) -> Option<&str> {
    (!array.is_null(row)).then(|| array.value(row))
}

/// Value of an Int32 array at `row`, `None` when null
#[must_use]
pub fn int32_at(array: &Int32Array, row: usize) -> Option<i32> {
    (!array.is_null(row)).then(|| array.value(row))
}

/// Value of a Float64 array at `row`, `None` when null or not finite
#[must_use]
pub fn float64_at(array: &Float64Array, row: usize) -> Option<f64> {
    (!array.is_null(row))
        .then(|| array.value(row))
        .filter(|v| v.is_finite())
}

/// Value of a Date32 array at `row`, `None` when null
#[must_use]
pub fn date32_at(array: &Date32Array, row: usize) -> Option<NaiveDate> {
    if array.is_null(row) {
        None
    } else {
        array.value_as_date(row)
    }
}

/// Days between 0001-01-01 (CE) and 1970-01-01
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Days since the Unix epoch for a Date32 column
#[must_use]
pub fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}
