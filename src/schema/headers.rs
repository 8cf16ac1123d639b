//! Header repair for raw source files
//!
//! The source CSVs were exported through tools that mangled UTF-8: a BOM
//! glued onto the first header, `Ñ` decoded as Latin-1 (`Ã±`), stray padding.

/// Byte-order mark as decoded UTF-8
const BOM: char = '\u{feff}';
/// Byte-order mark decoded as Latin-1
const BOM_MOJIBAKE: &str = "ï»¿";

/// Repair one header cell
///
/// Strips BOM artifacts and padding, fixes the mangled `Ñ`, and upper-cases
/// when `uppercase` is set.
#[must_use]
pub fn repair_header(raw: &str, uppercase: bool) -> String {
    let trimmed = raw
        .trim_start_matches(BOM)
        .trim_start_matches(BOM_MOJIBAKE)
        .trim();
    let fixed = trimmed.replace("Ã±", "ñ").replace("Ã‘", "Ñ");
    if uppercase {
        fixed.to_uppercase()
    } else {
        fixed
    }
}

/// Repair every header of a source
#[must_use]
pub fn repair_headers(raw: &[String], uppercase: bool) -> Vec<String> {
    raw.iter().map(|h| repair_header(h, uppercase)).collect()
}
