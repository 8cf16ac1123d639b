//! Quinquennial age bands
//!
//! The death certificate stores an age-group identifier (`GRUPO_EDAD1`,
//! 0 to 28). Identifiers below 23 come in pairs that share one band; from 23
//! on each identifier is its own band.

/// Label for identifiers outside the map, and for null identifiers
pub const UNKNOWN_BAND: &str = "Unknown";

/// Band label per age-group identifier, indexed by identifier
pub const AGE_GROUP_BANDS: [&str; 29] = [
    "0-4", "0-4", "5-9", "5-9", "10-14", "10-14", "15-19", "15-19", "20-24", "20-24", "25-29",
    "25-29", "30-34", "30-34", "35-39", "35-39", "40-44", "40-44", "45-49", "45-49", "50-54",
    "50-54", "55-59", "60-64", "65-69", "70-74", "75-79", "80-84", "85+",
];

/// All band labels in canonical reporting order, `Unknown` last
pub const BAND_ORDER: [&str; 19] = [
    "0-4",
    "5-9",
    "10-14",
    "15-19",
    "20-24",
    "25-29",
    "30-34",
    "35-39",
    "40-44",
    "45-49",
    "50-54",
    "55-59",
    "60-64",
    "65-69",
    "70-74",
    "75-79",
    "80-84",
    "85+",
    UNKNOWN_BAND,
];

/// Band label for a nullable age-group identifier
#[must_use]
pub fn band_label(age_group: Option<i32>) -> &'static str {
    age_group
        .and_then(|id| usize::try_from(id).ok())
        .and_then(|id| AGE_GROUP_BANDS.get(id).copied())
        .unwrap_or(UNKNOWN_BAND)
}

/// Position of a label in [`BAND_ORDER`]
#[must_use]
pub fn band_position(label: &str) -> Option<usize> {
    BAND_ORDER.iter().position(|band| *band == label)
}

/// Canonical spelling of a user-supplied band label
///
/// Accepts the Spanish "Desconocido" for the unknown band.
#[must_use]
pub fn canonical_band(label: &str) -> Option<&'static str> {
    let trimmed = label.trim();
    if trimmed.eq_ignore_ascii_case("desconocido") || trimmed.eq_ignore_ascii_case(UNKNOWN_BAND) {
        return Some(UNKNOWN_BAND);
    }
    BAND_ORDER.iter().copied().find(|band| *band == trimmed)
}
