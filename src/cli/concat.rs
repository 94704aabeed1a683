// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::common::{display_warnings, BeamSelectionArgs, ARG_FILE_HELP};
use crate::{
    constants::DEFAULT_CONCAT_PATTERN,
    params::{ConcatParams, RunStatus, StageContext},
    MsflowError,
};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct ConcatArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    #[serde(skip)]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(flatten)]
    pub(super) beam_args: BeamSelectionArgs,

    /// Concatenated measurement sets are written to <OUT_ROOT>/<SBID>.
    /// Default: the data root
    #[clap(long, help_heading = "OUTPUT FILES")]
    pub(super) out_root: Option<PathBuf>,
}

impl ConcatArgs {
    pub(super) fn merge(self) -> Result<ConcatArgs, MsflowError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let ConcatArgs {
                args_file: _,
                beam_args,
                out_root,
            } = unpack_arg_file!(arg_file);

            Ok(ConcatArgs {
                args_file: None,
                beam_args: cli_args.beam_args.merge(beam_args),
                out_root: cli_args.out_root.or(out_root),
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<ConcatParams, MsflowError> {
        let ConcatArgs {
            args_file: _,
            beam_args,
            out_root,
        } = self;

        let selection = beam_args.parse(DEFAULT_CONCAT_PATTERN)?;
        let out_root = out_root.unwrap_or_else(|| selection.data_root.clone());
        let sbid = selection.sbid.clone();

        display_warnings();

        Ok(ConcatParams {
            inputs: selection.into_inputs(),
            sbid,
            out_root,
        })
    }

    pub(super) fn run(self, ctx: &StageContext) -> Result<RunStatus, MsflowError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;
        Ok(params.run(ctx)?)
    }
}
