//! Shared utilities: typed Arrow column access and logging helpers.

pub mod arrow_utils;
pub mod logging;
