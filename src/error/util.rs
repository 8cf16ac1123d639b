//! Utility functions for error handling
//!
//! Helpers that turn filesystem problems into the startup error taxonomy.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{DashboardError, Result};

/// Safely open a source file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Which source the file provides (for error context)
///
/// # Returns
/// * `Result<fs::File>` - The opened file, `SourceNotFound` when absent,
///   `SourceParse` when it cannot be read
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        log::error!("{purpose} source not found: {}", path.display());
        return Err(DashboardError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }

    if !path.is_file() {
        return Err(DashboardError::parse(
            path,
            format!("expected a file for the {purpose} source"),
        ));
    }

    match fs::File::open(path) {
        Ok(file) => Ok(file),
        Err(e) => {
            let reason = match e.kind() {
                io::ErrorKind::PermissionDenied => {
                    "permission denied - check file permissions".to_string()
                }
                io::ErrorKind::NotFound => {
                    return Err(DashboardError::SourceNotFound {
                        path: path.to_path_buf(),
                    });
                }
                _ => format!("failed to open {purpose} source: {e}"),
            };
            Err(DashboardError::parse(path, reason))
        }
    }
}

/// Reject a source that exists but holds no bytes
pub fn ensure_not_empty(path: &Path, file: &fs::File) -> Result<()> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Err(DashboardError::parse(path, "file is empty"));
    }
    Ok(())
}
