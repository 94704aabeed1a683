// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::common::{display_warnings, parse_inputs, BeamSelectionArgs, Warn, ARG_FILE_HELP};
use crate::{
    constants::DEFAULT_IMPORT_PATTERN,
    params::{ImportParams, Inputs, RunStatus, StageContext},
    MsflowError,
};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct ImportArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    #[serde(skip)]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(flatten)]
    pub(super) beam_args: BeamSelectionArgs,

    /// Import these uvfits files instead of finding them per beam.
    #[clap(long, multiple_values(true), help_heading = "INPUT FILES")]
    pub(super) files: Option<Vec<PathBuf>>,

    /// Only import the file at this (zero-based) position of the sorted
    /// --files, e.g. $SLURM_ARRAY_TASK_ID.
    #[clap(long, help_heading = "INPUT FILES")]
    pub(super) array_index: Option<usize>,
}

impl ImportArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified
    /// into a single struct, preferring CLI parameters.
    pub(super) fn merge(self) -> Result<ImportArgs, MsflowError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let ImportArgs {
                args_file: _,
                beam_args,
                files,
                array_index,
            } = unpack_arg_file!(arg_file);

            Ok(ImportArgs {
                args_file: None,
                beam_args: cli_args.beam_args.merge(beam_args),
                files: cli_args.files.or(files),
                array_index: cli_args.array_index.or(array_index),
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<ImportParams, MsflowError> {
        let ImportArgs {
            args_file: _,
            beam_args,
            files,
            array_index,
        } = self;

        let inputs = parse_inputs(beam_args, files, DEFAULT_IMPORT_PATTERN)?;
        let array_index = match (&inputs, array_index) {
            (Inputs::Beams { .. }, Some(i)) => {
                format!("--array-index {i} only applies to --files; ignoring it").warn();
                None
            }
            (_, i) => i,
        };

        display_warnings();

        Ok(ImportParams {
            inputs,
            array_index,
        })
    }

    pub(super) fn run(self, ctx: &StageContext) -> Result<RunStatus, MsflowError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;
        if ctx.dry_run {
            info!("Dry run; nothing will be imported");
        }
        Ok(params.run(ctx)?)
    }
}
