//! Error handling for the mortality pipeline.
//!
//! Startup failures (`SourceNotFound`, `SourceParse`) abort initialization.
//! `SchemaMismatch` is raised per view and surfaced to the caller as a message.
//! A selection that matches zero rows is not an error; see
//! [`crate::aggregate::ViewResult`].

pub mod util;

use std::io;
use std::path::{Path, PathBuf};

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Specialized error type for the pipeline
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// An input file does not exist
    #[error("Source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// An input file exists but its content is empty, unreadable or malformed
    #[error("Failed to parse source {}: {reason}", path.display())]
    SourceParse { path: PathBuf, reason: String },

    /// A table handed to a stage lacks fields that stage depends on
    #[error("Schema mismatch in {table}: missing field(s) {}", missing.join(", "))]
    SchemaMismatch { table: String, missing: Vec<String> },

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl DashboardError {
    /// Build a `SourceParse` error for `path`
    pub fn parse(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::SourceParse {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Build a `SchemaMismatch` error for `table`
    pub fn schema_mismatch<S: Into<String>>(table: &str, missing: impl IntoIterator<Item = S>) -> Self {
        Self::SchemaMismatch {
            table: table.to_string(),
            missing: missing.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether this error must stop the process before any view is served
    #[must_use]
    pub const fn is_startup_fatal(&self) -> bool {
        matches!(self, Self::SourceNotFound { .. } | Self::SourceParse { .. })
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, DashboardError>;
