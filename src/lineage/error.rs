// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with naming, validating and removing generations.

use std::path::PathBuf;

use thiserror::Error;

use crate::io::MsReadError;

/// Configuration errors. These are raised before any external task runs.
#[derive(Error, Debug)]
pub enum NamingError {
    #[error("'{0}' doesn't have a file name")]
    NoFileName(PathBuf),

    #[error("'{0}' contains invalid UTF-8")]
    NonUtf8(PathBuf),

    #[error("'{0}' isn't a measurement set; its name must end in '.ms'")]
    NotAMeasurementSet(PathBuf),

    #[error("'{0}' isn't a uvfits file; its name must end in '.uvfits'")]
    NotUvfits(PathBuf),

    #[error("Calibration extension '{0}' is invalid; expected 'B0' or 'G' followed by digits (e.g. 'G5')")]
    InvalidExtension(String),

    #[error("Label '{0}' is invalid; it must be non-empty and contain no '.' or '/'")]
    InvalidLabel(String),

    #[error("Model-subtraction label '{0}' is invalid; it must start with 'uvsub' followed only by letters, digits, '_' or '-' (e.g. 'uvsub_resid')")]
    InvalidUvsubLabel(String),

    #[error("'{0}' has no calibration marker (e.g. '.calB0.ms'), so self-cal generations can't be named from it")]
    NoCalibrationMarker(PathBuf),

    #[error("Output measurement set name '{0}' matches its input; refusing to overwrite or delete it")]
    OutputMatchesInput(PathBuf),

    #[error("Couldn't make '{path}' absolute: {err}")]
    Absolute {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },
}

/// A produced generation failed its checks. The previous generation is left
/// untouched.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("The external task did not produce '{0}'")]
    Missing(PathBuf),

    #[error("'{0}' exists but isn't a directory; a measurement set or table is a directory tree")]
    NotAContainer(PathBuf),

    #[error("Row count mismatch: '{old}' has {old_rows} rows, '{new}' has {new_rows}")]
    RowCountMismatch {
        old: PathBuf,
        old_rows: u64,
        new: PathBuf,
        new_rows: u64,
    },

    #[error(transparent)]
    MsRead(#[from] MsReadError),
}

#[derive(Error, Debug)]
#[error("Failed to remove previous generation '{path}': {err}")]
pub struct CleanupError {
    pub path: PathBuf,
    #[source]
    pub err: std::io::Error,
}
