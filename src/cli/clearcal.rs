// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::common::{display_warnings, parse_inputs, BeamSelectionArgs, ARG_FILE_HELP};
use crate::{
    constants::DEFAULT_CLEARCAL_PATTERN,
    params::{ClearcalParams, RunStatus, StageContext},
    MsflowError,
};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct ClearcalArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    #[serde(skip)]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(flatten)]
    pub(super) beam_args: BeamSelectionArgs,

    /// Clear these measurement sets instead of finding them per beam.
    #[clap(long, multiple_values(true), help_heading = "INPUT FILES")]
    pub(super) ms: Option<Vec<PathBuf>>,
}

impl ClearcalArgs {
    pub(super) fn merge(self) -> Result<ClearcalArgs, MsflowError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let ClearcalArgs {
                args_file: _,
                beam_args,
                ms,
            } = unpack_arg_file!(arg_file);

            Ok(ClearcalArgs {
                args_file: None,
                beam_args: cli_args.beam_args.merge(beam_args),
                ms: cli_args.ms.or(ms),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn run(self, ctx: &StageContext) -> Result<RunStatus, MsflowError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let inputs = parse_inputs(self.beam_args, self.ms, DEFAULT_CLEARCAL_PATTERN)?;
        display_warnings();
        Ok(ClearcalParams { inputs }.run(ctx)?)
    }
}
