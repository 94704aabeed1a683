// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all msflow-related errors. This should be the *only* error
//! enum that is publicly visible.

use thiserror::Error;

use super::{
    applycal::ApplycalArgsError, common::BeamSelectionError, selfcal::SelfCalArgsError,
};
use crate::{
    casa::CasaError,
    io::{GlobError, MsReadError},
    lineage::NamingError,
    params::{IntervalsError, StageError},
    selfcal::SelfCalError,
};

/// The *only* publicly visible error from msflow. Each message carries a hint
/// of where to look next, unless it's "generic".
#[derive(Error, Debug)]
pub enum MsflowError {
    /// CASA can't be run at all.
    #[error("{0}\n\nUse --casa-python to name a Python interpreter that can 'import casatasks', or check the run first with --dry-run.")]
    CasaUnavailable(String),

    /// A CASA task couldn't be run or failed.
    #[error("{0}\n\nThe CASA log (see --casa-logfile) usually has more detail.")]
    Casa(String),

    /// An output name can't be derived safely from an input name.
    #[error("{0}\n\nOutput names are derived from input names; check the input files and the --extension/--label arguments.")]
    Naming(String),

    /// An error related to self-calibration iterations.
    #[error("{0}\n\nSelf-cal iteration k reads '<base>.selfcal_<k-1>.ms' (or the calibrated base when k is 1) and writes '<base>.selfcal_<k>.ms'.")]
    SelfCal(String),

    /// An error related to finding files.
    #[error("{0}\n\nFiles are found with <DATA_ROOT>/<SBID>/<PATTERN>; check --data-root, --sbid and --pattern.")]
    Glob(String),

    /// An error related to which beams were asked for.
    #[error("{0}\n\nBeams are selected with --beam, or --beams \"all\" or a comma-separated list.")]
    BeamSelection(String),

    /// An error related to reading measurement sets.
    #[error("{0}")]
    MsRead(String),

    /// An error related to argument files.
    #[error("{0}\n\nArgument files must be toml or json and use the long argument names, e.g. sbid = \"77974\".")]
    ArgFile(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

impl MsflowError {
    /// The process exit status for this error. A missing CASA is reported
    /// differently to everything else that stops a run.
    pub fn exit_code(&self) -> i32 {
        match self {
            MsflowError::CasaUnavailable(_) => 1,
            _ => 3,
        }
    }
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

impl From<StageError> for MsflowError {
    fn from(e: StageError) -> Self {
        match e {
            StageError::Naming(e) => Self::from(e),
            StageError::Casa(e) => Self::from(e),
            StageError::Glob(e) => Self::from(e),
            StageError::MsRead(e) => Self::from(e),
            StageError::SelfCal(e) => Self::from(e),
            StageError::NoCaltable(_) => Self::Glob(e.to_string()),
            StageError::ArrayIndexOutOfRange { .. } => Self::Generic(e.to_string()),
            StageError::Validation(_) | StageError::Cleanup(_) | StageError::CreateDir { .. } => {
                Self::Generic(e.to_string())
            }
        }
    }
}

impl From<CasaError> for MsflowError {
    fn from(e: CasaError) -> Self {
        match e {
            CasaError::Unavailable { .. } => Self::CasaUnavailable(e.to_string()),
            CasaError::TaskFailed { .. } | CasaError::Spawn { .. } | CasaError::Kwargs { .. } => {
                Self::Casa(e.to_string())
            }
        }
    }
}

impl From<NamingError> for MsflowError {
    fn from(e: NamingError) -> Self {
        Self::Naming(e.to_string())
    }
}

impl From<SelfCalError> for MsflowError {
    fn from(e: SelfCalError) -> Self {
        match e {
            SelfCalError::Naming(e) => Self::from(e),
            SelfCalError::MsRead(e) => Self::from(e),
            SelfCalError::InvalidIndex(_)
            | SelfCalError::IndexOverflow
            | SelfCalError::NoModelData(_)
            | SelfCalError::InputMissing { .. }
            | SelfCalError::OutputExists { .. } => Self::SelfCal(e.to_string()),
        }
    }
}

impl From<GlobError> for MsflowError {
    fn from(e: GlobError) -> Self {
        Self::Glob(e.to_string())
    }
}

impl From<MsReadError> for MsflowError {
    fn from(e: MsReadError) -> Self {
        Self::MsRead(e.to_string())
    }
}

impl From<IntervalsError> for MsflowError {
    fn from(e: IntervalsError) -> Self {
        match e {
            IntervalsError::MsRead(e) => Self::from(e),
            IntervalsError::BadTimestep(_) => Self::Generic(e.to_string()),
        }
    }
}

impl From<BeamSelectionError> for MsflowError {
    fn from(e: BeamSelectionError) -> Self {
        Self::BeamSelection(e.to_string())
    }
}

impl From<ApplycalArgsError> for MsflowError {
    fn from(e: ApplycalArgsError) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<SelfCalArgsError> for MsflowError {
    fn from(e: SelfCalArgsError) -> Self {
        Self::SelfCal(e.to_string())
    }
}

// Library errors.

impl From<std::io::Error> for MsflowError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<toml::ser::Error> for MsflowError {
    fn from(e: toml::ser::Error) -> Self {
        Self::ArgFile(format!("Couldn't write arguments as toml: {e}"))
    }
}
