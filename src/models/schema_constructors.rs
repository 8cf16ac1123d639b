//! Conversions between typed rows and Arrow record batches
//!
//! The loader builds the base tables from normalized rows; death records
//! can be read back out of a batch as typed rows.

use std::sync::Arc;

use arrow::array::{ArrayRef, Date32Builder, Float64Builder, Int32Builder, StringBuilder};
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::models::records::{CauseCode, DeathRecord, EventDate, GeoUnit};
use crate::schema::columns::*;
use crate::schema::{cause_codes_schema, death_records_schema, geography_schema};
use crate::utils::arrow_utils::{
    date_to_days, date32_at, date32_column, int32_at, int32_column, string_at, string_column,
};

impl DeathRecord {
    /// Build a death-records batch
    pub fn to_record_batch(records: &[Self]) -> Result<RecordBatch> {
        let n = records.len();
        let mut department = StringBuilder::with_capacity(n, n * 2);
        let mut municipality = StringBuilder::with_capacity(n, n * 5);
        let mut sex = Int32Builder::with_capacity(n);
        let mut manner = StringBuilder::new();
        let mut cause = StringBuilder::with_capacity(n, n * 4);
        let mut year = Int32Builder::with_capacity(n);
        let mut month = Int32Builder::with_capacity(n);
        let mut hour = Int32Builder::with_capacity(n);
        let mut minute = Int32Builder::with_capacity(n);
        let mut age_group = Int32Builder::with_capacity(n);
        let mut date = Date32Builder::with_capacity(n);

        for record in records {
            department.append_value(&record.department_code);
            municipality.append_value(&record.municipality_code);
            sex.append_option(record.sex);
            manner.append_option(record.manner_of_death.as_deref());
            cause.append_value(&record.cause_code);
            year.append_option(record.year);
            month.append_option(record.month);
            hour.append_option(record.hour);
            minute.append_option(record.minute);
            age_group.append_option(record.age_group);
            date.append_option(record.event_date.date().map(date_to_days));
        }

        let columns: Vec<ArrayRef> = vec![
            Arc::new(department.finish()),
            Arc::new(municipality.finish()),
            Arc::new(sex.finish()),
            Arc::new(manner.finish()),
            Arc::new(cause.finish()),
            Arc::new(year.finish()),
            Arc::new(month.finish()),
            Arc::new(hour.finish()),
            Arc::new(minute.finish()),
            Arc::new(age_group.finish()),
            Arc::new(date.finish()),
        ];
        Ok(RecordBatch::try_new(death_records_schema(), columns)?)
    }

    /// Read every row of a death-records batch
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        let department = string_column(batch, TABLE_DEATHS, COD_DEPARTAMENTO)?;
        let municipality = string_column(batch, TABLE_DEATHS, COD_DANE)?;
        let sex = int32_column(batch, TABLE_DEATHS, SEXO)?;
        let manner = string_column(batch, TABLE_DEATHS, MANERA_MUERTE)?;
        let cause = string_column(batch, TABLE_DEATHS, COD_MUERTE)?;
        let year = int32_column(batch, TABLE_DEATHS, ANIO)?;
        let month = int32_column(batch, TABLE_DEATHS, MES)?;
        let hour = int32_column(batch, TABLE_DEATHS, HORA)?;
        let minute = int32_column(batch, TABLE_DEATHS, MINUTOS)?;
        let age_group = int32_column(batch, TABLE_DEATHS, GRUPO_EDAD1)?;
        let date = date32_column(batch, TABLE_DEATHS, FECHA)?;

        Ok((0..batch.num_rows())
            .map(|row| Self {
                department_code: string_at(department, row).unwrap_or_default().to_string(),
                municipality_code: string_at(municipality, row).unwrap_or_default().to_string(),
                sex: int32_at(sex, row),
                manner_of_death: string_at(manner, row).map(str::to_string),
                cause_code: string_at(cause, row).unwrap_or_default().to_string(),
                year: int32_at(year, row),
                month: int32_at(month, row),
                hour: int32_at(hour, row),
                minute: int32_at(minute, row),
                age_group: int32_at(age_group, row),
                event_date: date32_at(date, row).map_or(EventDate::Unresolved, EventDate::Resolved),
            })
            .collect())
    }
}

impl CauseCode {
    /// Build a cause-code batch
    pub fn to_record_batch(codes: &[Self]) -> Result<RecordBatch> {
        let mut builders: Vec<StringBuilder> = (0..CAUSE_CODE_COLUMNS.len())
            .map(|_| StringBuilder::new())
            .collect();
        for code in codes {
            let values = [
                &code.chapter,
                &code.chapter_name,
                &code.code3,
                &code.description3,
                &code.code4,
                &code.description4,
            ];
            for (builder, value) in builders.iter_mut().zip(values) {
                builder.append_option(value.as_deref());
            }
        }
        let columns: Vec<ArrayRef> = builders
            .into_iter()
            .map(|mut b| Arc::new(b.finish()) as ArrayRef)
            .collect();
        Ok(RecordBatch::try_new(cause_codes_schema(), columns)?)
    }
}

impl GeoUnit {
    /// Build a geography batch
    pub fn to_record_batch(units: &[Self]) -> Result<RecordBatch> {
        let n = units.len();
        let mut department_code = StringBuilder::with_capacity(n, n * 2);
        let mut department_name = StringBuilder::new();
        let mut municipality_code = StringBuilder::with_capacity(n, n * 5);
        let mut municipality_name = StringBuilder::new();
        let mut latitude = Float64Builder::with_capacity(n);
        let mut longitude = Float64Builder::with_capacity(n);

        for unit in units {
            department_code.append_value(&unit.department_code);
            department_name.append_option(unit.department_name.as_deref());
            municipality_code.append_value(&unit.municipality_code);
            municipality_name.append_option(unit.municipality_name.as_deref());
            latitude.append_option(unit.latitude);
            longitude.append_option(unit.longitude);
        }

        let columns: Vec<ArrayRef> = vec![
            Arc::new(department_code.finish()),
            Arc::new(department_name.finish()),
            Arc::new(municipality_code.finish()),
            Arc::new(municipality_name.finish()),
            Arc::new(latitude.finish()),
            Arc::new(longitude.finish()),
        ];
        Ok(RecordBatch::try_new(geography_schema(), columns)?)
    }
}
