//! Key reconciliation across death records, cause codes and geography.

pub mod index;
pub mod join;
pub mod keys;

pub use index::{CauseIndex, GeographyIndex};
pub use join::{JoinExclusions, Joined, left_join, split_unmatched};
pub use keys::{
    department_of_municipality, fold_name, normalize_cause_code, pad_code, pad_department_code,
    pad_municipality_code, title_case,
};
