// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Command-line interface code. More specific options for `msflow`
//! subcommands are contained in modules.
//!
//! All booleans must have `#[serde(default)]` annotated, and anything that
//! isn't a boolean must be optional. This allows all arguments to be optional
//! *and* usable in an arguments file.
//!
//! Only 3 things should be public in this module: `Msflow`, `Msflow::run`,
//! and `MsflowError`.

#[macro_use]
mod common;
mod applycal;
mod average;
mod clearcal;
mod concat;
mod error;
mod import;
mod ms_intervals;
mod selfcal;
mod uvsub;

pub use error::MsflowError;

use std::path::PathBuf;

use clap::{AppSettings, Args, Parser, Subcommand};
use log::{info, warn};

use crate::{
    casa::CasaPython,
    constants::DEFAULT_CASA_PYTHON,
    io::CasacoreReader,
    params::{RunStatus, StageContext},
    PROGRESS_BARS,
};

// Add build-time information from the "built" crate.
include!(concat!(env!("OUT_DIR"), "/built.rs"));

#[derive(Debug, Parser)]
#[clap(
    name = "msflow",
    version,
    author,
    about = r#"Drive ASKAP measurement sets through import, averaging, calibration and self-calibration.
Every stage writes a new generation of a measurement set; an older generation is only
removed (--delete-previous) once its replacement has been validated."#
)]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
#[clap(disable_help_subcommand = true)]
#[clap(infer_subcommands = true)]
#[clap(propagate_version = true)]
#[clap(infer_long_args = true)]
pub struct Msflow {
    #[clap(flatten)]
    global_opts: GlobalArgs,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// Don't draw progress bars.
    #[clap(long)]
    #[clap(global = true)]
    no_progress_bars: bool,

    /// The verbosity of the program. Increase by specifying multiple times
    /// (e.g. -vv). The default is to print only high-level information.
    #[clap(short, long, parse(from_occurrences))]
    #[clap(global = true)]
    verbosity: u8,

    /// Only find inputs and print what would be done. Nothing is written,
    /// deleted or handed to CASA.
    #[clap(long)]
    #[clap(global = true)]
    dry_run: bool,

    /// Save the input arguments into a new TOML file that can be used to
    /// reproduce this run.
    #[clap(long)]
    #[clap(global = true)]
    save_toml: Option<PathBuf>,

    /// The Python interpreter used to run CASA tasks; it must be able to
    /// "import casatasks". Default: python3
    #[clap(long)]
    #[clap(global = true)]
    casa_python: Option<String>,

    /// Where CASA should write its log. Default: CASA's own choice (a
    /// casa-<date>.log in the working directory)
    #[clap(long)]
    #[clap(global = true)]
    casa_logfile: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
#[clap(arg_required_else_help = true)]
enum Command {
    #[clap(about = "Convert uvfits files into measurement sets (importuvfits).")]
    Import(import::ImportArgs),

    #[clap(about = "Average measurement sets in time (mstransform).")]
    Average(average::AverageArgs),

    #[clap(about = "Concatenate the scans of each beam into one measurement set.")]
    Concat(concat::ConcatArgs),

    #[clap(alias = "apply-cal")]
    #[clap(about = r#"Apply each beam's calibration table and split out the corrected data.
Inputs are replaced by <NAME>.cal<EXTENSION>.ms."#)]
    Applycal(applycal::ApplycalArgs),

    #[clap(alias = "clear-cal")]
    #[clap(about = "Reset the model and corrected data of measurement sets in place.")]
    Clearcal(clearcal::ClearcalArgs),

    #[clap(alias = "self-cal")]
    #[clap(about = r#"Self-calibrate: solve for gains against MODEL_DATA, apply them and split out
the corrected data, once per solution interval."#)]
    Selfcal(selfcal::SelfCalArgs),

    #[clap(about = "Subtract the model from measurement sets and split out the residuals.")]
    Uvsub(uvsub::UvsubArgs),

    #[clap(about = "Report a measurement set's times and its number of imaging intervals.")]
    MsIntervals(ms_intervals::MsIntervalsArgs),
}

impl Msflow {
    pub fn run(self) -> Result<RunStatus, MsflowError> {
        // Set up logging.
        let GlobalArgs {
            verbosity,
            dry_run,
            no_progress_bars,
            save_toml,
            casa_python,
            casa_logfile,
        } = self.global_opts;
        setup_logging(verbosity)
            .map_err(|e| MsflowError::Generic(format!("Failed to initialise logging: {e}")))?;
        // Enable progress bars if the user didn't say "no progress bars".
        if !no_progress_bars {
            PROGRESS_BARS.store(true);
        }

        // Print the version of msflow and its build-time information.
        let sub_command = match &self.command {
            Command::Import(_) => "import",
            Command::Average(_) => "average",
            Command::Concat(_) => "concat",
            Command::Applycal(_) => "applycal",
            Command::Clearcal(_) => "clearcal",
            Command::Selfcal(_) => "selfcal",
            Command::Uvsub(_) => "uvsub",
            Command::MsIntervals(_) => "ms-intervals",
        };
        info!("msflow {} {}", sub_command, env!("CARGO_PKG_VERSION"));
        display_build_info();

        let casa = CasaPython::new(
            casa_python.as_deref().unwrap_or(DEFAULT_CASA_PYTHON),
            casa_logfile.as_deref(),
        );
        let reader = CasacoreReader;
        let ctx = StageContext {
            casa: &casa,
            reader: &reader,
            dry_run,
        };
        if dry_run {
            info!("Dry run; nothing will be written, deleted or run");
        }

        macro_rules! merge_save_run {
            ($args:expr) => {{
                let args = $args.merge()?;
                if let Some(toml) = save_toml {
                    use std::{
                        fs::File,
                        io::{BufWriter, Write},
                    };

                    let mut f = BufWriter::new(File::create(toml)?);
                    let toml_str = toml::to_string(&args)?;
                    f.write_all(toml_str.as_bytes())?;
                }
                args.run(&ctx)?
            }};
        }

        let status = match self.command {
            Command::Import(args) => merge_save_run!(args),
            Command::Average(args) => merge_save_run!(args),
            Command::Concat(args) => merge_save_run!(args),
            Command::Applycal(args) => merge_save_run!(args),
            Command::Clearcal(args) => merge_save_run!(args),
            Command::Selfcal(args) => merge_save_run!(args),
            Command::Uvsub(args) => merge_save_run!(args),
            Command::MsIntervals(args) => merge_save_run!(args),
        };

        match status {
            RunStatus::Success => info!("msflow {} complete.", sub_command),
            RunStatus::BeamsFailed { failed, total } => {
                warn!("msflow {sub_command} finished, but {failed} of {total} targets failed")
            }
            RunStatus::NothingDone => warn!("msflow {sub_command} finished without doing anything"),
        }
        Ok(status)
    }
}

/// Activate a logger. All log messages are put onto `stdout`. `env_logger`
/// automatically only uses colours and fancy symbols if we're on a tty (e.g. a
/// terminal); piped output will be formatted sensibly. Source code lines are
/// displayed in log messages when verbosity >= 3.
fn setup_logging(verbosity: u8) -> Result<(), log::SetLoggerError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Stdout);
    builder.format_target(false);
    match verbosity {
        0 => builder.filter_level(log::LevelFilter::Info),
        1 => builder.filter_level(log::LevelFilter::Debug),
        2 => builder.filter_level(log::LevelFilter::Trace),
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
            builder.format(|buf, record| {
                use std::io::Write;

                let timestamp = buf.timestamp();
                let level = record.level();
                let target = record.target();
                let line = record.line().unwrap_or(0);
                let message = record.args();

                writeln!(buf, "[{timestamp} {level} {target}:{line}] {message}")
            })
        }
    };
    builder.try_init()
}

/// Write many info-level log lines of how this executable was compiled.
fn display_build_info() {
    let dirty = match GIT_DIRTY {
        Some(true) => " (dirty)",
        _ => "",
    };
    match GIT_COMMIT_HASH_SHORT {
        Some(hash) => {
            info!("Compiled on git commit hash: {hash}{dirty}");
        }
        None => info!("Compiled on git commit hash: <no git info>"),
    }
    if let Some(hr) = GIT_HEAD_REF {
        info!("            git head ref: {}", hr);
    }
    info!("            {}", BUILT_TIME_UTC);
    info!("         with compiler {}", RUSTC_VERSION);
    info!("");
}
