// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with interacting with CASA measurement sets.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MsReadError {
    #[error("Supplied measurement set {0} does not exist or is not a directory!")]
    BadFile(PathBuf),

    #[error("Measurement set {ms} has no '{col}' column")]
    MissingColumn { ms: PathBuf, col: &'static str },

    #[error("No timesteps were in measurement set {0}")]
    NoTimesteps(PathBuf),

    #[error("Error when trying to interface with measurement set: {0}")]
    Table(#[from] rubbl_casatables::TableError),

    #[error("Error from casacore: {0}")]
    Casacore(#[from] rubbl_casatables::CasacoreError),
}
