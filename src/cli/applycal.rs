// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::common::{display_warnings, BeamSelectionArgs, ARG_FILE_HELP};
use crate::{
    constants::{DEFAULT_APPLYCAL_PATTERN, DEFAULT_CAL_EXTENSION},
    lineage::CalExtension,
    params::{ApplycalParams, RunStatus, StageContext},
    MsflowError,
};

lazy_static::lazy_static! {
    static ref EXTENSION_HELP: String =
        format!("The extension of the calibration tables to apply, and the marker of the output measurement sets, e.g. B0 or G5. Default: {DEFAULT_CAL_EXTENSION}");
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct ApplycalArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    #[serde(skip)]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(flatten)]
    pub(super) beam_args: BeamSelectionArgs,

    /// The directory, relative to <DATA_ROOT>/<SBID>, containing one
    /// calibration table per beam (*beamNN*.<EXTENSION>).
    #[clap(long, help_heading = "CALIBRATION")]
    pub(super) cal_dir: Option<PathBuf>,

    #[clap(long, help = EXTENSION_HELP.as_str(), help_heading = "CALIBRATION")]
    pub(super) extension: Option<String>,

    /// Remove each input measurement set once its calibrated replacement has
    /// been validated.
    #[clap(long, help_heading = "OUTPUT FILES")]
    #[serde(default)]
    pub(super) delete_previous: bool,
}

impl ApplycalArgs {
    pub(super) fn merge(self) -> Result<ApplycalArgs, MsflowError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let ApplycalArgs {
                args_file: _,
                beam_args,
                cal_dir,
                extension,
                delete_previous,
            } = unpack_arg_file!(arg_file);

            Ok(ApplycalArgs {
                args_file: None,
                beam_args: cli_args.beam_args.merge(beam_args),
                cal_dir: cli_args.cal_dir.or(cal_dir),
                extension: cli_args.extension.or(extension),
                delete_previous: cli_args.delete_previous || delete_previous,
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<ApplycalParams, MsflowError> {
        let ApplycalArgs {
            args_file: _,
            beam_args,
            cal_dir,
            extension,
            delete_previous,
        } = self;

        let cal_dir = cal_dir.ok_or(ApplycalArgsError::NoCalDir)?;
        let extension =
            CalExtension::from_str(extension.as_deref().unwrap_or(DEFAULT_CAL_EXTENSION))?;
        let selection = beam_args.parse(DEFAULT_APPLYCAL_PATTERN)?;

        display_warnings();

        Ok(ApplycalParams {
            sbid: selection.sbid,
            data_root: selection.data_root,
            pattern: selection.pattern,
            beams: selection.beams,
            cal_dir,
            extension,
            delete_previous,
        })
    }

    pub(super) fn run(self, ctx: &StageContext) -> Result<RunStatus, MsflowError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;
        Ok(params.run(ctx)?)
    }
}

#[derive(thiserror::Error, Debug)]
pub(super) enum ApplycalArgsError {
    #[error("No calibration table directory was specified (--cal-dir)")]
    NoCalDir,
}
