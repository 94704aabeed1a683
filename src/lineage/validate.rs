// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Validation of a new generation, and removal of the one it supersedes.

use std::path::Path;

use log::{debug, info};

use super::{CleanupError, ValidationError};
use crate::io::MsTableRead;

/// Check that `path` was produced and is a directory tree. This is all that
/// can be checked for stages whose row counts legitimately change (importing,
/// averaging, concatenating) and for calibration tables.
pub fn ensure_container(path: &Path) -> Result<(), ValidationError> {
    if !path.exists() {
        return Err(ValidationError::Missing(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(ValidationError::NotAContainer(path.to_path_buf()));
    }
    Ok(())
}

/// Check that `new` exists and has exactly as many rows as `old`. Neither
/// artifact is modified. Returns the row count on success.
pub fn validate_generation(
    reader: &dyn MsTableRead,
    old: &Path,
    new: &Path,
) -> Result<u64, ValidationError> {
    ensure_container(new)?;

    let old_rows = reader.num_rows(old)?;
    let new_rows = reader.num_rows(new)?;
    debug!(
        "{}: {old_rows} rows, {}: {new_rows} rows",
        old.display(),
        new.display()
    );
    if old_rows != new_rows {
        return Err(ValidationError::RowCountMismatch {
            old: old.to_path_buf(),
            old_rows,
            new: new.to_path_buf(),
            new_rows,
        });
    }
    Ok(new_rows)
}

/// Recursively remove a superseded generation. Callers must only do this
/// after [`validate_generation`] has approved its successor.
pub fn supersede(old: &Path) -> Result<(), CleanupError> {
    std::fs::remove_dir_all(old).map_err(|err| CleanupError {
        path: old.to_path_buf(),
        err,
    })?;
    info!("Removed previous generation {}", old.display());
    Ok(())
}
