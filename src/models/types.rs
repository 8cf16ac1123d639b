//! Categorical domain types shared across the pipeline

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Sex recorded on a death certificate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sex {
    /// Code 1, "Hombre"
    Male,
    /// Code 2, "Mujer"
    Female,
    /// Code 3 ("N/A"), null, or any unrecognised code
    Unknown,
}

impl Sex {
    /// All categories in reporting order
    pub const ALL: [Self; 3] = [Self::Male, Self::Female, Self::Unknown];

    /// Underlying source code
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Male => 1,
            Self::Female => 2,
            Self::Unknown => 3,
        }
    }

    /// Category of a nullable source code
    #[must_use]
    pub const fn from_code(code: Option<i32>) -> Self {
        match code {
            Some(1) => Self::Male,
            Some(2) => Self::Female,
            _ => Self::Unknown,
        }
    }

    /// Label shown by the dashboard
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Hombre",
            Self::Female => "Mujer",
            Self::Unknown => "N/A",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Sex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Sex restriction of a filter selection
///
/// The dashboard passes either a code (`1`, `2`) or a label (`"Hombre"`);
/// both are normalised here once, before any filter runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SexSelector {
    /// "Todos": no restriction
    #[default]
    Any,
    /// Only records of this sex
    Only(Sex),
}

impl SexSelector {
    /// Whether a record with this sex code passes the selector
    #[must_use]
    pub fn matches(self, code: Option<i32>) -> bool {
        match self {
            Self::Any => true,
            Self::Only(sex) => Sex::from_code(code) == sex,
        }
    }

    /// Selector for a raw numeric code; only 1, 2 and 3 are sex codes
    pub fn from_code(code: i32) -> Result<Self, ParseSexError> {
        match code {
            1 => Ok(Self::Only(Sex::Male)),
            2 => Ok(Self::Only(Sex::Female)),
            3 => Ok(Self::Only(Sex::Unknown)),
            other => Err(ParseSexError(other.to_string())),
        }
    }
}

/// Error returned when a sex selector cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised sex selector: {0}")]
pub struct ParseSexError(pub String);

impl FromStr for SexSelector {
    type Err = ParseSexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "todos" | "total" | "all" | "any" => Ok(Self::Any),
            "1" | "1.0" | "hombre" | "male" | "m" => Ok(Self::Only(Sex::Male)),
            "2" | "2.0" | "mujer" | "female" | "f" => Ok(Self::Only(Sex::Female)),
            "3" | "3.0" | "n/a" | "unknown" => Ok(Self::Only(Sex::Unknown)),
            other => Err(ParseSexError(other.to_string())),
        }
    }
}
