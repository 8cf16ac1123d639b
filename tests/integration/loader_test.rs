use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use mortality_dash::loader::{load_cause_codes, load_death_records, load_geography, load_sources};
use mortality_dash::schema::columns::{
    ANIO, COD_DANE, COD_DEPARTAMENTO, COD_MUERTE, GRUPO_EDAD1, MANERA_MUERTE, MES, MUNICIPIO, SEXO,
};
use parquet::arrow::ArrowWriter;
use mortality_dash::{DashboardError, SourcePaths, load_sources_async};

use crate::utils::{CAUSES_CSV, KEPT_DEATHS, fixture_sources, write_source};

fn strings<'a>(batch: &'a arrow::record_batch::RecordBatch, name: &str) -> &'a StringArray {
    batch
        .column_by_name(name)
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap()
}

#[test]
fn death_records_are_normalized_and_counted() {
    let (_dir, paths) = fixture_sources();
    let (batch, report) = load_death_records(&paths.deaths).unwrap();

    assert_eq!(batch.num_rows(), KEPT_DEATHS);
    assert_eq!(report.rows_read, 13);
    assert_eq!(report.rows_kept, KEPT_DEATHS);
    assert_eq!(report.dropped_empty, 1);
    assert_eq!(report.dropped_null_cause, 1);
    assert_eq!(report.dropped_duplicates, 1);
    assert_eq!(report.unresolved_dates, 1);

    let municipalities = strings(&batch, COD_DANE);
    let departments = strings(&batch, COD_DEPARTAMENTO);
    assert_eq!(municipalities.value(0), "05001");
    assert_eq!(departments.value(0), "05");
    for row in 0..batch.num_rows() {
        assert_eq!(&municipalities.value(row)[..2], departments.value(row));
    }

    let manners = strings(&batch, MANERA_MUERTE);
    assert!((0..manners.len()).all(|row| manners.value(row) != "natural"));
    assert!(strings(&batch, COD_MUERTE).null_count() == 0);

    let years = batch
        .column_by_name(ANIO)
        .unwrap()
        .as_any()
        .downcast_ref::<Int32Array>()
        .unwrap();
    assert_eq!(years.value(0), 2019);
}

#[test]
fn cause_codes_are_trimmed_and_deduplicated() {
    let (_dir, paths) = fixture_sources();
    let (batch, report) = load_cause_codes(&paths.causes).unwrap();
    assert_eq!(report.rows_read, 6);
    // the second I219 row differs in description, so it is not an exact duplicate
    assert_eq!(batch.num_rows(), 6);
    assert_eq!(report.dropped_duplicates, 0);
}

#[test]
fn geography_names_are_title_cased() {
    let (_dir, paths) = fixture_sources();
    let (batch, report) = load_geography(&paths.geography).unwrap();
    assert_eq!(report.dropped_duplicates, 1);
    assert_eq!(batch.num_rows(), 5);
    let names = strings(&batch, MUNICIPIO);
    assert_eq!(names.value(0), "Medellín");
    assert_eq!(names.value(2), "Bogotá, D.C.");
}

#[test]
fn missing_source_is_fatal() {
    let (dir, mut paths) = fixture_sources();
    paths.deaths = dir.path().join("absent.csv");
    let err = load_sources(&paths).unwrap_err();
    assert!(matches!(err, DashboardError::SourceNotFound { .. }));
    assert!(err.is_startup_fatal());
    assert!(err.to_string().contains("absent.csv"));
}

#[test]
fn empty_source_is_fatal() {
    let (dir, mut paths) = fixture_sources();
    paths.causes = write_source(dir.path(), "empty.csv", "");
    let err = load_sources(&paths).unwrap_err();
    assert!(matches!(err, DashboardError::SourceParse { .. }));
}

#[test]
fn death_source_without_cause_column_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let paths = SourcePaths {
        deaths: write_source(dir.path(), "d.csv", "COD_DANE,SEXO\n5001,1\n"),
        causes: write_source(dir.path(), "c.csv", CAUSES_CSV),
        geography: write_source(dir.path(), "g.csv", "COD_DANE,DEPARTAMENTO,MUNICIPIO\n5001,A,B\n"),
        boundaries: None,
    };
    let err = load_sources(&paths).unwrap_err();
    assert!(err.to_string().contains("COD_MUERTE"));
}

#[test]
fn department_is_derived_when_column_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    let csv = "COD_DANE,SEXO,MANERA_MUERTE,COD_MUERTE,AÑO,MES,GRUPO_EDAD1\n76001,2,Natural,I219,2019,7,20\n";
    let path = write_source(dir.path(), "d.csv", csv);
    let (batch, _) = load_death_records(&path).unwrap();
    assert_eq!(strings(&batch, COD_DEPARTAMENTO).value(0), "76");
}

#[tokio::test]
async fn async_load_matches_sync_load() {
    let (_dir, paths) = fixture_sources();
    let sync = load_sources(&paths).unwrap();
    let concurrent = load_sources_async(&paths).await.unwrap();
    assert_eq!(sync.deaths, concurrent.deaths);
    assert_eq!(sync.causes, concurrent.causes);
    assert_eq!(sync.geography, concurrent.geography);
    assert_eq!(sync.reports, concurrent.reports);
}

#[test]
fn parquet_deaths_with_numeric_codes_are_padded() {
    let schema = Arc::new(Schema::new(vec![
        Field::new(COD_DANE, DataType::Int64, false),
        Field::new(COD_DEPARTAMENTO, DataType::Float64, true),
        Field::new(SEXO, DataType::Int64, true),
        Field::new(MANERA_MUERTE, DataType::Utf8, true),
        Field::new(COD_MUERTE, DataType::Utf8, true),
        Field::new(ANIO, DataType::Int64, true),
        Field::new(MES, DataType::Int64, true),
        Field::new(GRUPO_EDAD1, DataType::Int64, true),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(vec![5001, 11001])),
        Arc::new(Float64Array::from(vec![Some(5.0), None])),
        Arc::new(Int64Array::from(vec![1, 2])),
        Arc::new(StringArray::from(vec!["violenta", "Natural"])),
        Arc::new(StringArray::from(vec![" x954 ", "I219"])),
        Arc::new(Int64Array::from(vec![2019, 2019])),
        Arc::new(Int64Array::from(vec![Some(3), None])),
        Arc::new(Int64Array::from(vec![17, 25])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("NoFetal2019.parquet");
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let (deaths, report) = load_death_records(&path).unwrap();
    assert_eq!(deaths.num_rows(), 2);
    assert_eq!(report.rows_read, 2);
    assert_eq!(report.department_mismatches, 0);
    assert_eq!(report.unresolved_dates, 1);

    let municipalities = strings(&deaths, COD_DANE);
    let departments = strings(&deaths, COD_DEPARTAMENTO);
    assert_eq!(municipalities.value(0), "05001");
    assert_eq!(departments.value(0), "05");
    assert_eq!(municipalities.value(1), "11001");
    assert_eq!(departments.value(1), "11");
    assert_eq!(strings(&deaths, MANERA_MUERTE).value(0), "Violenta");
    assert_eq!(strings(&deaths, COD_MUERTE).value(0), "X954");
}
