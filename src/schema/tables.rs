//! Arrow schemas of the normalized base tables

use arrow::datatypes::{DataType, Field, Schema};
use std::sync::Arc;

use super::columns::*;

/// Get the Arrow schema for normalized death records
///
/// One row per fatality. `FECHA` is null when the event date is unresolved.
#[must_use]
pub fn death_records_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new(COD_DEPARTAMENTO, DataType::Utf8, false), // 2-digit department code
        Field::new(COD_DANE, DataType::Utf8, false),         // 5-digit municipality code
        Field::new(SEXO, DataType::Int32, true),             // 1 male, 2 female, 3 unknown
        Field::new(MANERA_MUERTE, DataType::Utf8, true),
        Field::new(COD_MUERTE, DataType::Utf8, false), // ICD-10 4-character code
        Field::new(ANIO, DataType::Int32, true),
        Field::new(MES, DataType::Int32, true),
        Field::new(HORA, DataType::Int32, true),
        Field::new(MINUTOS, DataType::Int32, true),
        Field::new(GRUPO_EDAD1, DataType::Int32, true),
        Field::new(FECHA, DataType::Date32, true),
    ]))
}

/// Get the Arrow schema for the cause-code reference
#[must_use]
pub fn cause_codes_schema() -> Arc<Schema> {
    Arc::new(Schema::new(
        CAUSE_CODE_COLUMNS
            .iter()
            .map(|name| Field::new(*name, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ))
}

/// Get the Arrow schema for the DIVIPOLA geography reference
///
/// Latitude and longitude hold the department centroid and are often absent.
#[must_use]
pub fn geography_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new(COD_DEPARTAMENTO, DataType::Utf8, false),
        Field::new(DEPARTAMENTO, DataType::Utf8, true),
        Field::new(COD_DANE, DataType::Utf8, false),
        Field::new(MUNICIPIO, DataType::Utf8, true),
        Field::new(LATITUD, DataType::Float64, true),
        Field::new(LONGITUD, DataType::Float64, true),
    ]))
}
