// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::common::{display_warnings, parse_inputs, BeamSelectionArgs, ARG_FILE_HELP};
use crate::{
    constants::{DEFAULT_UVSUB_LABEL, DEFAULT_UVSUB_PATTERN},
    params::{RunStatus, StageContext, UvsubParams},
    MsflowError,
};

lazy_static::lazy_static! {
    static ref LABEL_HELP: String =
        format!("The marker added to output names, e.g. <NAME>.{DEFAULT_UVSUB_LABEL}.ms. It must start with '{DEFAULT_UVSUB_LABEL}' (e.g. '{DEFAULT_UVSUB_LABEL}_resid'). Default: {DEFAULT_UVSUB_LABEL}");
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct UvsubArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    #[serde(skip)]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(flatten)]
    pub(super) beam_args: BeamSelectionArgs,

    /// Subtract the model from these measurement sets instead of finding them
    /// per beam.
    #[clap(long, multiple_values(true), help_heading = "INPUT FILES")]
    pub(super) ms: Option<Vec<PathBuf>>,

    /// Treat the inputs as self-cal bases and use the output of this self-cal
    /// iteration (<BASE>.selfcal_<INDEX>.ms) instead.
    #[clap(long, allow_hyphen_values = true, help_heading = "INPUT FILES")]
    pub(super) index: Option<i64>,

    #[clap(long, help = LABEL_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) label: Option<String>,

    /// Remove each input measurement set once its model-subtracted
    /// replacement has been validated.
    #[clap(long, help_heading = "OUTPUT FILES")]
    #[serde(default)]
    pub(super) delete_previous: bool,
}

impl UvsubArgs {
    pub(super) fn merge(self) -> Result<UvsubArgs, MsflowError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let UvsubArgs {
                args_file: _,
                beam_args,
                ms,
                index,
                label,
                delete_previous,
            } = unpack_arg_file!(arg_file);

            Ok(UvsubArgs {
                args_file: None,
                beam_args: cli_args.beam_args.merge(beam_args),
                ms: cli_args.ms.or(ms),
                index: cli_args.index.or(index),
                label: cli_args.label.or(label),
                delete_previous: cli_args.delete_previous || delete_previous,
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn run(self, ctx: &StageContext) -> Result<RunStatus, MsflowError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let UvsubArgs {
            args_file: _,
            beam_args,
            ms,
            index,
            label,
            delete_previous,
        } = self;

        let params = UvsubParams {
            inputs: parse_inputs(beam_args, ms, DEFAULT_UVSUB_PATTERN)?,
            index,
            // The label is checked when output names are derived.
            label: label.unwrap_or_else(|| DEFAULT_UVSUB_LABEL.to_string()),
            delete_previous,
        };
        display_warnings();
        Ok(params.run(ctx)?)
    }
}
