// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use vec1::Vec1;

use super::common::{display_warnings, parse_inputs, BeamSelectionArgs, ARG_FILE_HELP};
use crate::{
    constants::{
        DEFAULT_CALMODE, DEFAULT_CALTABLE_PREFIX, DEFAULT_MINSNR, DEFAULT_REFANT,
        DEFAULT_SELFCAL_PATTERN,
    },
    params::{GaincalOptions, RunStatus, SelfCalParams, StageContext},
    MsflowError,
};

lazy_static::lazy_static! {
    static ref CALMODE_HELP: String =
        format!("gaincal's calmode; 'p' (phase), 'a' (amplitude) or 'ap'. Default: {DEFAULT_CALMODE}");

    static ref REFANT_HELP: String =
        format!("The reference antenna(s). Default: {DEFAULT_REFANT}");

    static ref MINSNR_HELP: String =
        format!("Solutions below this SNR are flagged. Default: {DEFAULT_MINSNR}");

    static ref CALTABLE_PREFIX_HELP: String =
        format!("Calibration tables are named <BASE>_<PREFIX>.sol<k>_<SOLINT>.G<k>. Default: {DEFAULT_CALTABLE_PREFIX}");
}

const CALMODES: [&str; 3] = ["p", "a", "ap"];

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct SelfCalArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    #[serde(skip)]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(flatten)]
    pub(super) beam_args: BeamSelectionArgs,

    /// Self-calibrate these externally calibrated measurement sets (e.g.
    /// *.calB0.ms) instead of finding them per beam.
    #[clap(long, multiple_values(true), help_heading = "INPUT FILES")]
    pub(super) ms: Option<Vec<PathBuf>>,

    /// The self-cal iteration to start at. Iteration 1 reads the calibrated
    /// measurement set, iteration k > 1 reads the output of iteration k-1.
    #[clap(long, allow_hyphen_values = true, help_heading = "SELF-CALIBRATION")]
    pub(super) index: Option<i64>,

    /// Comma-separated solution intervals, e.g. "inf,300s,120s,60s". One
    /// iteration is run per interval.
    #[clap(long, help_heading = "SELF-CALIBRATION")]
    pub(super) solint: Option<String>,

    #[clap(long, help = CALMODE_HELP.as_str(), help_heading = "SELF-CALIBRATION")]
    pub(super) calmode: Option<String>,

    #[clap(long, help = REFANT_HELP.as_str(), help_heading = "SELF-CALIBRATION")]
    pub(super) refant: Option<String>,

    /// Axes to combine when solving, e.g. "scan,spw". Default: none
    #[clap(long, help_heading = "SELF-CALIBRATION")]
    pub(super) combine: Option<String>,

    #[clap(long, help = MINSNR_HELP.as_str(), help_heading = "SELF-CALIBRATION")]
    pub(super) minsnr: Option<f64>,

    /// Apply parallactic-angle corrections when solving and applying.
    #[clap(long, help_heading = "SELF-CALIBRATION")]
    #[serde(default)]
    pub(super) parang: bool,

    /// Field selection, in CASA's syntax. Default: all fields
    #[clap(long, help_heading = "SELF-CALIBRATION")]
    pub(super) field: Option<String>,

    /// Spectral window and channel selection, in CASA's syntax. Default: all
    #[clap(long, help_heading = "SELF-CALIBRATION")]
    pub(super) spw: Option<String>,

    #[clap(long, help = CALTABLE_PREFIX_HELP.as_str(), help_heading = "SELF-CALIBRATION")]
    pub(super) caltable_prefix: Option<String>,

    /// Calibrate the weights as well as the data when applying solutions.
    #[clap(long, help_heading = "SELF-CALIBRATION")]
    #[serde(default)]
    pub(super) apply_calwt: bool,

    /// Remove each iteration's input once its output has been validated. The
    /// calibrated measurement set that iteration 1 reads is never removed.
    #[clap(long, help_heading = "OUTPUT FILES")]
    #[serde(default)]
    pub(super) delete_previous: bool,
}

impl SelfCalArgs {
    pub(super) fn merge(self) -> Result<SelfCalArgs, MsflowError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let SelfCalArgs {
                args_file: _,
                beam_args,
                ms,
                index,
                solint,
                calmode,
                refant,
                combine,
                minsnr,
                parang,
                field,
                spw,
                caltable_prefix,
                apply_calwt,
                delete_previous,
            } = unpack_arg_file!(arg_file);

            Ok(SelfCalArgs {
                args_file: None,
                beam_args: cli_args.beam_args.merge(beam_args),
                ms: cli_args.ms.or(ms),
                index: cli_args.index.or(index),
                solint: cli_args.solint.or(solint),
                calmode: cli_args.calmode.or(calmode),
                refant: cli_args.refant.or(refant),
                combine: cli_args.combine.or(combine),
                minsnr: cli_args.minsnr.or(minsnr),
                parang: cli_args.parang || parang,
                field: cli_args.field.or(field),
                spw: cli_args.spw.or(spw),
                caltable_prefix: cli_args.caltable_prefix.or(caltable_prefix),
                apply_calwt: cli_args.apply_calwt || apply_calwt,
                delete_previous: cli_args.delete_previous || delete_previous,
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<SelfCalParams, MsflowError> {
        let SelfCalArgs {
            args_file: _,
            beam_args,
            ms,
            index,
            solint,
            calmode,
            refant,
            combine,
            minsnr,
            parang,
            field,
            spw,
            caltable_prefix,
            apply_calwt,
            delete_previous,
        } = self;

        let index = index.ok_or(SelfCalArgsError::NoIndex)?;
        let solints = parse_solints(solint.as_deref().ok_or(SelfCalArgsError::NoSolint)?)?;
        let calmode = calmode.unwrap_or_else(|| DEFAULT_CALMODE.to_string());
        if !CALMODES.contains(&calmode.as_str()) {
            return Err(SelfCalArgsError::BadCalmode(calmode).into());
        }
        let minsnr = minsnr.unwrap_or(DEFAULT_MINSNR);
        if minsnr.is_nan() || minsnr < 0.0 {
            return Err(SelfCalArgsError::BadMinsnr(minsnr).into());
        }
        let inputs = parse_inputs(beam_args, ms, DEFAULT_SELFCAL_PATTERN)?;

        display_warnings();

        Ok(SelfCalParams {
            inputs,
            index,
            solints,
            gaincal: GaincalOptions {
                field: field.unwrap_or_default(),
                spw: spw.unwrap_or_default(),
                calmode,
                refant: refant.unwrap_or_else(|| DEFAULT_REFANT.to_string()),
                combine: combine.unwrap_or_default(),
                minsnr,
                parang,
            },
            caltable_prefix: caltable_prefix.unwrap_or_else(|| DEFAULT_CALTABLE_PREFIX.to_string()),
            apply_calwt,
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

/// Split comma-separated solution intervals, keeping their order.
fn parse_solints(s: &str) -> Result<Vec1<String>, SelfCalArgsError> {
    let mut solints = vec![];
    for solint in s.split(',').map(|s| s.trim()) {
        if solint.is_empty() || solint.contains('/') {
            return Err(SelfCalArgsError::BadSolint(s.to_string()));
        }
        solints.push(solint.to_string());
    }
    Vec1::try_from_vec(solints).map_err(|_| SelfCalArgsError::NoSolint)
}

#[derive(thiserror::Error, Debug)]
pub(super) enum SelfCalArgsError {
    #[error("No self-cal index was specified (--index)")]
    NoIndex,

    #[error("No solution intervals were specified (--solint)")]
    NoSolint,

    #[error("Couldn't make sense of the solution intervals '{0}'; expected a comma-separated list like 'inf,300s,60s'")]
    BadSolint(String),

    #[error("calmode '{0}' isn't one of {CALMODES:?}")]
    BadCalmode(String),

    #[error("minsnr must be non-negative, got {0}")]
    BadMinsnr(f64),
}
