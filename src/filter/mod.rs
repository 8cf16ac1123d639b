//! Filter engine
//!
//! Predicates over the death-records batch, composed by conjunction.

pub mod core;
pub mod predicates;
pub mod selection;

pub use self::core::{AndFilter, BatchFilter, IncludeAllFilter, filter_record_batch};
pub use predicates::{
    AgeBandFilter, CauseCodeFilter, CausePrefixFilter, MannerOfDeathFilter, MunicipalityFilter,
    SexFilter, VIOLENT_CAUSE_PREFIXES,
};
pub use selection::{ALL_OPTION, FilterSelection, apply_filters};
