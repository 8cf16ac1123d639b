//! Data reconciliation and aggregation pipeline behind the Colombia 2019
//! mortality dashboard.
//!
//! Three static sources (death records, ICD-10 cause codes, DIVIPOLA
//! geography) are loaded once into immutable Arrow batches, their keys are
//! reconciled, and each dashboard view is computed from a filter selection
//! as a small serializable table.

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod geo;
pub mod loader;
pub mod models;
pub mod reconcile;
pub mod schema;
pub mod utils;

// Core types
pub use config::{DashboardConfig, RadiusBounds, SourcePaths};
pub use dashboard::{Dashboard, DashboardSnapshot, FilterOptions, ViewResponse, ViewStatus};
pub use error::{DashboardError, Result};

// Arrow types
pub use arrow::record_batch::RecordBatch;

// Pipeline stages
pub use aggregate::ViewResult;
pub use filter::{FilterSelection, apply_filters};
pub use loader::{DataSources, LoadReport, load_sources, load_sources_async};
pub use models::{Sex, SexSelector};
