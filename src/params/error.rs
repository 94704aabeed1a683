// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors from running a stage.

use std::path::PathBuf;

use thiserror::Error;

use crate::{
    casa::CasaError,
    io::{GlobError, MsReadError},
    lineage::{CleanupError, NamingError, ValidationError},
    selfcal::SelfCalError,
};

#[derive(Error, Debug)]
pub(crate) enum StageError {
    #[error("No calibration table: {0}")]
    NoCaltable(#[source] GlobError),

    #[error("Array index {index} is out of range for {num_files} files")]
    ArrayIndexOutOfRange { index: usize, num_files: usize },

    #[error("Couldn't create directory '{path}': {err}")]
    CreateDir {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    #[error(transparent)]
    Naming(#[from] NamingError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Cleanup(#[from] CleanupError),

    #[error(transparent)]
    Casa(#[from] CasaError),

    #[error(transparent)]
    Glob(#[from] GlobError),

    #[error(transparent)]
    MsRead(#[from] MsReadError),

    #[error(transparent)]
    SelfCal(#[from] SelfCalError),
}

impl StageError {
    /// Fatal errors abort the whole run. Everything else only fails the beam
    /// it happened in.
    pub(crate) fn is_fatal(&self) -> bool {
        match self {
            StageError::Naming(_)
            | StageError::ArrayIndexOutOfRange { .. }
            | StageError::Glob(GlobError::NoBeamPlaceholder { .. })
            | StageError::Casa(CasaError::Unavailable { .. }) => true,

            StageError::SelfCal(e) => matches!(
                e,
                SelfCalError::InvalidIndex(_)
                    | SelfCalError::IndexOverflow
                    | SelfCalError::NoModelData(_)
                    | SelfCalError::Naming(_)
            ),

            StageError::NoCaltable(_)
            | StageError::CreateDir { .. }
            | StageError::Validation(_)
            | StageError::Cleanup(_)
            | StageError::Casa(_)
            | StageError::Glob(_)
            | StageError::MsRead(_) => false,
        }
    }
}
