// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

use crate::{io::MsReadError, lineage::NamingError};

#[derive(Error, Debug)]
pub enum SelfCalError {
    #[error("Self-cal index {0} is invalid; iterations are numbered from 1")]
    InvalidIndex(i64),

    #[error("Self-cal index can't go beyond {}", u32::MAX)]
    IndexOverflow,

    #[error("'{0}' has no MODEL_DATA column; a sky model must be predicted into it before self-calibrating")]
    NoModelData(PathBuf),

    #[error("Input of self-cal iteration {index} ('{path}') doesn't exist")]
    InputMissing { index: u32, path: PathBuf },

    #[error("Output of self-cal iteration {index} ('{path}') already exists; refusing to overwrite it")]
    OutputExists { index: u32, path: PathBuf },

    #[error(transparent)]
    Naming(#[from] NamingError),

    #[error(transparent)]
    MsRead(#[from] MsReadError),
}
