//! Domain models of the mortality dataset

pub mod age_band;
pub mod records;
pub mod schema_constructors;
pub mod types;

pub use records::{CauseCode, DeathRecord, EventDate, GeoUnit};
pub use types::{Sex, SexSelector};
