//! Normalized rows of the three base tables

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// Event date of a death: year and month with the day fixed to 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventDate {
    /// Year and month formed a valid calendar date
    Resolved(NaiveDate),
    /// Year or month was missing or invalid
    Unresolved,
}

impl EventDate {
    /// Build the event date from nullable year and month
    #[must_use]
    pub fn from_year_month(year: Option<i32>, month: Option<i32>) -> Self {
        match (year, month.and_then(|m| u32::try_from(m).ok())) {
            (Some(year), Some(month)) => NaiveDate::from_ymd_opt(year, month, 1)
                .map_or(Self::Unresolved, Self::Resolved),
            _ => Self::Unresolved,
        }
    }

    /// The date, if resolved
    #[must_use]
    pub const fn date(self) -> Option<NaiveDate> {
        match self {
            Self::Resolved(date) => Some(date),
            Self::Unresolved => None,
        }
    }
}

impl fmt::Display for EventDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved(date) => write!(f, "{date}"),
            Self::Unresolved => f.write_str("Unresolved"),
        }
    }
}

/// One fatality
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeathRecord {
    /// 2-digit department code
    pub department_code: String,
    /// 5-digit municipality (DANE) code
    pub municipality_code: String,
    /// Raw sex code: 1 male, 2 female, 3 unknown; see [`crate::models::Sex`]
    pub sex: Option<i32>,
    /// Title-cased manner of death, e.g. `Natural`, `Violenta`
    pub manner_of_death: Option<String>,
    /// Upper-cased ICD-10 code
    pub cause_code: String,
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub hour: Option<i32>,
    pub minute: Option<i32>,
    /// Age-group identifier, see [`crate::models::age_band`]
    pub age_group: Option<i32>,
    pub event_date: EventDate,
}

/// One row of the ICD-10 reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CauseCode {
    pub chapter: Option<String>,
    pub chapter_name: Option<String>,
    pub code3: Option<String>,
    pub description3: Option<String>,
    /// Join key into [`DeathRecord::cause_code`]; not unique
    pub code4: Option<String>,
    pub description4: Option<String>,
}

/// One municipality of the DIVIPOLA reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoUnit {
    /// 2-digit department code, equal to the municipality code prefix
    pub department_code: String,
    pub department_name: Option<String>,
    /// 5-digit municipality code
    pub municipality_code: String,
    pub municipality_name: Option<String>,
    /// Department centroid latitude, if supplied by the source
    pub latitude: Option<f64>,
    /// Department centroid longitude, if supplied by the source
    pub longitude: Option<f64>,
}

impl GeoUnit {
    /// Key for exact-duplicate detection (floats compared bitwise)
    #[must_use]
    pub fn dedup_key(&self) -> (String, Option<String>, String, Option<String>, Option<u64>, Option<u64>) {
        (
            self.department_code.clone(),
            self.department_name.clone(),
            self.municipality_code.clone(),
            self.municipality_name.clone(),
            self.latitude.map(f64::to_bits),
            self.longitude.map(f64::to_bits),
        )
    }
}
