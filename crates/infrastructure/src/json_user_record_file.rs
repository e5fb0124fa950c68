//! Loader for the JSON user export.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::info;

use dormant_core::{AppError, AppResult};
use dormant_domain::UserRecord;

/// A JSON file holding an array of user records.
#[derive(Debug, Clone)]
pub struct JsonUserRecordFile {
    path: PathBuf,
}

impl JsonUserRecordFile {
    /// Points at the export at `path`. Nothing is read yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the export path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Reads and validates every record, preserving file order.
    pub fn load(&self) -> AppResult<Vec<UserRecord>> {
        let contents = std::fs::read_to_string(&self.path).map_err(|error| {
            if error.kind() == ErrorKind::NotFound {
                AppError::NotFound(format!("user file '{}' does not exist", self.path.display()))
            } else {
                AppError::Internal(format!(
                    "failed to read user file '{}': {error}",
                    self.path.display()
                ))
            }
        })?;

        let records: Vec<UserRecord> = serde_json::from_str(&contents).map_err(|error| {
            AppError::Validation(format!(
                "user file '{}' is not a valid user list: {error}",
                self.path.display()
            ))
        })?;

        info!(
            path = %self.path.display(),
            records = records.len(),
            "user file loaded"
        );
        Ok(records)
    }
}
