//! Column names of the three base tables.
//!
//! These names are the contract between the source files and every later
//! stage; the loader repairs source headers until they match.

// Death records
pub const COD_DANE: &str = "COD_DANE";
pub const COD_DEPARTAMENTO: &str = "COD_DEPARTAMENTO";
pub const SEXO: &str = "SEXO";
pub const MANERA_MUERTE: &str = "MANERA_MUERTE";
pub const COD_MUERTE: &str = "COD_MUERTE";
pub const ANIO: &str = "AÑO";
pub const MES: &str = "MES";
pub const HORA: &str = "HORA";
pub const MINUTOS: &str = "MINUTOS";
pub const GRUPO_EDAD1: &str = "GRUPO_EDAD1";
pub const FECHA: &str = "FECHA";

// Cause codes (ICD-10 / CIE-10)
pub const CAPITULO: &str = "Capitulo";
pub const NOMBRE_CAPITULO: &str = "Nombre Capitulo";
pub const CODIGO_CIE10_3: &str = "Codigo_CIE10_3";
pub const DESCRIPCION_3: &str = "Descripcion_3";
pub const CODIGO_CIE10_4: &str = "Codigo_CIE10_4";
pub const DESCRIPCION_4: &str = "Descripcion_4";

/// Positional layout of the cause-code source
pub const CAUSE_CODE_COLUMNS: [&str; 6] = [
    CAPITULO,
    NOMBRE_CAPITULO,
    CODIGO_CIE10_3,
    DESCRIPCION_3,
    CODIGO_CIE10_4,
    DESCRIPCION_4,
];

// Geography (DIVIPOLA)
pub const DEPARTAMENTO: &str = "DEPARTAMENTO";
pub const MUNICIPIO: &str = "MUNICIPIO";
pub const LATITUD: &str = "LATITUD";
pub const LONGITUD: &str = "LONGITUD";

/// Table names used in schema errors
pub const TABLE_DEATHS: &str = "death records";
pub const TABLE_CAUSES: &str = "cause codes";
pub const TABLE_GEOGRAPHY: &str = "geography";
