//! Join-key normalization
//!
//! Department, municipality and cause codes arrive with inconsistent
//! padding, casing and numeric formatting (`5001`, `5001.0`, `05001`).
//! Names arrive with inconsistent accents and casing.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Width of a department code
pub const DEPARTMENT_CODE_WIDTH: usize = 2;
/// Width of a municipality (DANE) code
pub const MUNICIPALITY_CODE_WIDTH: usize = 5;

/// Zero-pad a code to `width` characters
///
/// Codes that went through a float column (`"5001.0"`) lose the fractional
/// suffix first. Codes already at or over `width` are returned unchanged,
/// never truncated. Returns `None` for blank input.
#[must_use]
pub fn pad_code(raw: &str, width: usize) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return None;
    }
    let digits = strip_float_suffix(trimmed);
    let len = digits.chars().count();
    if len >= width {
        Some(digits.to_string())
    } else {
        Some(format!("{}{digits}", "0".repeat(width - len)))
    }
}

fn strip_float_suffix(code: &str) -> &str {
    match code.split_once('.') {
        Some((int, frac))
            if !int.is_empty()
                && int.bytes().all(|b| b.is_ascii_digit())
                && frac.bytes().all(|b| b == b'0') =>
        {
            int
        }
        _ => code,
    }
}

/// Normalize a department code to 2 digits
#[must_use]
pub fn pad_department_code(raw: &str) -> Option<String> {
    pad_code(raw, DEPARTMENT_CODE_WIDTH)
}

/// Normalize a municipality code to 5 digits
#[must_use]
pub fn pad_municipality_code(raw: &str) -> Option<String> {
    pad_code(raw, MUNICIPALITY_CODE_WIDTH)
}

/// Department code implied by a padded municipality code
#[must_use]
pub fn department_of_municipality(municipality_code: &str) -> Option<String> {
    municipality_code
        .get(..DEPARTMENT_CODE_WIDTH)
        .filter(|prefix| prefix.bytes().all(|b| b.is_ascii_digit()))
        .map(str::to_string)
}

/// Trim and upper-case an ICD-10 code; `None` when blank
#[must_use]
pub fn normalize_cause_code(raw: &str) -> Option<String> {
    let code = raw.trim().to_uppercase();
    (!code.is_empty()).then_some(code)
}

/// Trim and title-case free text; `None` when blank
///
/// Every letter that follows a non-letter starts a word and is upper-cased;
/// all other letters are lower-cased (`"BOGOTÁ, D.C."` becomes `"Bogotá, D.C."`).
#[must_use]
pub fn title_case(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut out = String::with_capacity(trimmed.len());
    let mut previous_is_letter = false;
    for c in trimmed.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }
    Some(out)
}

/// Fold a place name for matching across sources
///
/// Decomposes (NFKD), drops combining marks, upper-cases and collapses
/// whitespace: `"Bogotá  D.C."` and `"BOGOTA D.C."` fold to the same key.
#[must_use]
pub fn fold_name(raw: &str) -> String {
    raw.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_uppercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
