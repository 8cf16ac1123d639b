use std::path::{Path, PathBuf};

use arrow::record_batch::RecordBatch;
use mortality_dash::models::{DeathRecord, EventDate, GeoUnit};
use mortality_dash::reconcile::GeographyIndex;
use mortality_dash::{Dashboard, DashboardConfig, SourcePaths};
use tempfile::TempDir;

/// Death records with a BOM-mangled header, a mojibake `AÑO`, one duplicate,
/// one null cause, one blank row and one municipality missing from geography
pub const DEATHS_CSV: &str = "\
ï»¿COD_DANE,COD_DEPARTAMENTO,AÃ±O,MES,HORA,MINUTOS,SEXO,GRUPO_EDAD1,MANERA_MUERTE,COD_MUERTE
5001,5,2019,1,10,30,1,17,Violenta,X954
5001,5,2019,1,11,0,1,18,Violenta,X954
5001,5,2019,2,,,2,20,Natural,I219
5002,5,2019,3,8,15,2,26,Natural,I219
11001,11,2019,3,9,0,1,25,natural,I219
11001,11,2019,4,9,0,2,27,Natural,C509
11001,11,2019,5,9,0,3,99,Natural,C509
25001,25,2019,6,9,0,1,24,Violenta,X990
76001,76,2019,7,9,0,2,9,Violenta,X930
76001,76,2019,,9,0,1,10,Natural,J189
88001,88,2019,8,1,1,1,15,Natural,I219
5001,5,2019,2,,,2,20,Natural,I219
5001,5,2019,9,1,1,1,15,Natural,
,,,,,,,,,
";

/// Records kept from [`DEATHS_CSV`]
pub const KEPT_DEATHS: usize = 11;

pub const CAUSES_CSV: &str = "\
Capitulo,Nombre Capitulo,Codigo_CIE10_3,Descripcion_3,Codigo_CIE10_4,Descripcion_4
09,Enfermedades del sistema circulatorio,I21,Infarto agudo del miocardio,I219,\"Infarto agudo del miocardio, sin otra especificación\"
09,Enfermedades del sistema circulatorio,I21,Infarto agudo del miocardio,I219,Infarto (duplicado)
02,Neoplasias,C50,Tumor maligno de la mama,C509,\"Tumor maligno de la mama, parte no especificada\"
20,Causas externas,X95,Agresión con disparo,X954,\"Agresión con disparo, calle\"
20,Causas externas,X99,Agresión con objeto cortante,X990,\"Agresión con objeto cortante, vivienda\"
20,Causas externas,X93,Agresión con disparo de arma corta,X930,\"Agresión con disparo de arma corta, vivienda\"
";

/// Geography with centroids for every department except Valle del Cauca
pub const GEOGRAPHY_CSV: &str = "\
COD_DEPARTAMENTO,DEPARTAMENTO,COD_DANE,MUNICIPIO,LATITUD,LONGITUD
5,ANTIOQUIA,5001,MEDELLÍN,6.7,-75.5
5,ANTIOQUIA,5001,MEDELLÍN,6.7,-75.5
5,ANTIOQUIA,5002,ABEJORRAL,6.7,-75.5
11,\"BOGOTÁ, D.C.\",11001,\"BOGOTÁ, D.C.\",4.6,-74.1
25,CUNDINAMARCA,25001,AGUA DE DIOS,5.0,-74.0
76,VALLE DEL CAUCA,76001,CALI,,
";

/// Geography without coordinate columns
pub const GEOGRAPHY_NO_COORDS_CSV: &str = "\
COD_DEPARTAMENTO,DEPARTAMENTO,COD_DANE,MUNICIPIO
5,ANTIOQUIA,5001,MEDELLÍN
5,ANTIOQUIA,5002,ABEJORRAL
11,\"BOGOTÁ, D.C.\",11001,\"BOGOTÁ, D.C.\"
25,CUNDINAMARCA,25001,AGUA DE DIOS
76,VALLE DEL CAUCA,76001,CALI
";

/// Square boundaries for three departments (no Bogotá)
pub const BOUNDARIES_GEOJSON: &str = r#"{"type":"FeatureCollection","features":[
 {"type":"Feature","properties":{"NOMBRE_DPT":"ANTIOQUIA"},
  "geometry":{"type":"Polygon","coordinates":[[[-76,6],[-75,6],[-75,7],[-76,7],[-76,6]]]}},
 {"type":"Feature","properties":{"NOMBRE_DPT":"CUNDINAMARCA"},
  "geometry":{"type":"Polygon","coordinates":[[[-75,4],[-73,4],[-73,6],[-75,6],[-75,4]]]}},
 {"type":"Feature","properties":{"NOMBRE_DPT":"VALLE DEL CAUCA"},
  "geometry":{"type":"MultiPolygon","coordinates":[[[[-77,3],[-76,3],[-76,5],[-77,5],[-77,3]]]]}}
]}"#;

/// Write `contents` to `dir/name`
pub fn write_source(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("failed to write fixture");
    path
}

/// Write the three standard sources into a fresh temporary directory
pub fn fixture_sources() -> (TempDir, SourcePaths) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let paths = SourcePaths {
        deaths: write_source(dir.path(), "NoFetal2019.csv", DEATHS_CSV),
        causes: write_source(dir.path(), "CodigosDeMuerte.csv", CAUSES_CSV),
        geography: write_source(dir.path(), "Divipola.csv", GEOGRAPHY_CSV),
        boundaries: None,
    };
    (dir, paths)
}

/// Dashboard over the standard sources
pub fn fixture_dashboard() -> (TempDir, Dashboard) {
    let (dir, paths) = fixture_sources();
    let config = DashboardConfig::default().with_sources(paths);
    let dashboard = Dashboard::load(config).expect("fixture dashboard failed to load");
    (dir, dashboard)
}

/// A normalized death record for in-memory tests
pub fn death(municipality: &str, sex: Option<i32>, age_group: Option<i32>, cause: &str) -> DeathRecord {
    DeathRecord {
        department_code: municipality[..2].to_string(),
        municipality_code: municipality.to_string(),
        sex,
        manner_of_death: Some("Natural".to_string()),
        cause_code: cause.to_string(),
        year: Some(2019),
        month: Some(1),
        hour: None,
        minute: None,
        age_group,
        event_date: EventDate::from_year_month(Some(2019), Some(1)),
    }
}

pub fn records_batch(records: &[DeathRecord]) -> RecordBatch {
    DeathRecord::to_record_batch(records).expect("failed to build death batch")
}

fn unit(department: &str, name: &str, municipality: &str, city: &str) -> GeoUnit {
    GeoUnit {
        department_code: department.to_string(),
        department_name: Some(name.to_string()),
        municipality_code: municipality.to_string(),
        municipality_name: Some(city.to_string()),
        latitude: None,
        longitude: None,
    }
}

/// Small geography index: Antioquia (two cities), Bogotá, Cundinamarca
pub fn geography_index() -> GeographyIndex {
    let units = vec![
        unit("05", "Antioquia", "05001", "Medellín"),
        unit("05", "Antioquia", "05002", "Abejorral"),
        unit("11", "Bogotá, D.C.", "11001", "Bogotá, D.C."),
        unit("25", "Cundinamarca", "25001", "Agua De Dios"),
        unit("25", "Cundinamarca", "25099", "Bojacá"),
    ];
    let batch = GeoUnit::to_record_batch(&units).expect("failed to build geography batch");
    GeographyIndex::from_batch(&batch).expect("failed to index geography")
}
