// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::common::{display_warnings, parse_inputs, BeamSelectionArgs, ARG_FILE_HELP};
use crate::{
    constants::{DEFAULT_AVERAGE_PATTERN, DEFAULT_TIMEBIN},
    params::{AverageParams, RunStatus, StageContext},
    MsflowError,
};

lazy_static::lazy_static! {
    static ref TIMEBIN_HELP: String =
        format!("The time bin to average to, in CASA's syntax. Default: {DEFAULT_TIMEBIN}");
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct AverageArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    #[serde(skip)]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(flatten)]
    pub(super) beam_args: BeamSelectionArgs,

    /// Average these measurement sets instead of finding them per beam.
    #[clap(long, multiple_values(true), help_heading = "INPUT FILES")]
    pub(super) ms: Option<Vec<PathBuf>>,

    #[clap(long, help = TIMEBIN_HELP.as_str(), help_heading = "AVERAGING")]
    pub(super) timebin: Option<String>,
}

impl AverageArgs {
    pub(super) fn merge(self) -> Result<AverageArgs, MsflowError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let AverageArgs {
                args_file: _,
                beam_args,
                ms,
                timebin,
            } = unpack_arg_file!(arg_file);

            Ok(AverageArgs {
                args_file: None,
                beam_args: cli_args.beam_args.merge(beam_args),
                ms: cli_args.ms.or(ms),
                timebin: cli_args.timebin.or(timebin),
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<AverageParams, MsflowError> {
        let AverageArgs {
            args_file: _,
            beam_args,
            ms,
            timebin,
        } = self;

        let inputs = parse_inputs(beam_args, ms, DEFAULT_AVERAGE_PATTERN)?;
        let timebin = timebin.unwrap_or_else(|| DEFAULT_TIMEBIN.to_string());
        if timebin.trim().is_empty() {
            return Err(MsflowError::Generic(
                "The averaging time bin can't be empty".to_string(),
            ));
        }

        display_warnings();

        Ok(AverageParams { inputs, timebin })
    }

    pub(super) fn run(self, ctx: &StageContext) -> Result<RunStatus, MsflowError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;
        Ok(params.run(ctx)?)
    }
}
