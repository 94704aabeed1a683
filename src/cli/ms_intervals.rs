// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::common::{display_warnings, InfoPrinter, ARG_FILE_HELP};
use crate::{
    params::{IntervalsParams, IntervalsReport, RunStatus, StageContext},
    MsflowError,
};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct MsIntervalsArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    #[serde(skip)]
    pub(super) args_file: Option<PathBuf>,

    /// The measurement set to inspect.
    #[clap(long)]
    pub(super) ms: Option<PathBuf>,

    /// The imaging timestep [seconds]. If not given, every timestep is its
    /// own interval.
    #[clap(long)]
    pub(super) timestep: Option<f64>,
}

impl MsIntervalsArgs {
    pub(super) fn merge(self) -> Result<MsIntervalsArgs, MsflowError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let MsIntervalsArgs {
                args_file: _,
                ms,
                timestep,
            } = unpack_arg_file!(arg_file);

            Ok(MsIntervalsArgs {
                args_file: None,
                ms: cli_args.ms.or(ms),
                timestep: cli_args.timestep.or(timestep),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn run(self, ctx: &StageContext) -> Result<RunStatus, MsflowError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = IntervalsParams {
            ms: self.ms.ok_or_else(|| {
                MsflowError::Generic("No measurement set was specified (--ms)".to_string())
            })?,
            timestep: self.timestep,
        };
        display_warnings();

        if ctx.dry_run {
            info!("Dry run; not reading {}", params.ms.display());
            return Ok(RunStatus::Success);
        }

        let report = params.run(ctx.reader)?;
        print_report(&params, &report);
        Ok(RunStatus::Success)
    }
}

fn print_report(params: &IntervalsParams, report: &IntervalsReport) {
    let mut printer = InfoPrinter::new(format!("Times of {}", params.ms.display()).into());
    printer.push_block(vec![
        format!("{} unique timesteps", report.num_timesteps).into(),
        format!("Sampling time: {}", report.sampling).into(),
        format!("First: {}", report.first).into(),
        format!("Last:  {}", report.last).into(),
    ]);
    let timestep = match params.timestep {
        Some(t) => format!("{t} s"),
        None => "every timestep".to_string(),
    };
    printer.push_block(vec![
        format!("Got {} intervals for {timestep}", report.intervals).into(),
        format!(
            "Effective timestep is {:.3} s",
            report.effective_timestep.to_seconds()
        )
        .into(),
    ]);
    printer.display();
}
