// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Processing beams independently of one another.

use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, error, info, warn};

use super::StageError;
use crate::{io::resolve_beam_pattern, PROGRESS_BARS};

/// The unit of work of a stage; a failure in one doesn't stop the others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Target {
    Beam(u8),

    /// A measurement set (or uvfits file) named on the command line.
    Explicit(PathBuf),
}

impl Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Beam(b) => write!(f, "Beam {b:02}"),
            Target::Explicit(p) => write!(f, "{}", p.display()),
        }
    }
}

/// Where the inputs of a stage come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Inputs {
    /// Resolve a beam template under `data_root/sbid` for each beam.
    Beams {
        sbid: String,
        data_root: PathBuf,
        pattern: String,
        beams: Vec<u8>,
    },

    Explicit(Vec<PathBuf>),
}

impl Inputs {
    pub(crate) fn targets(&self) -> Vec<Target> {
        match self {
            Inputs::Beams { beams, .. } => beams.iter().copied().map(Target::Beam).collect(),
            Inputs::Explicit(paths) => paths.iter().cloned().map(Target::Explicit).collect(),
        }
    }

    /// The sorted input files of `target`. An empty result is logged and
    /// means there's nothing to do for it.
    pub(crate) fn resolve(&self, target: &Target) -> Result<Vec<PathBuf>, StageError> {
        let files = match (self, target) {
            (
                Inputs::Beams {
                    sbid,
                    data_root,
                    pattern,
                    ..
                },
                Target::Beam(beam),
            ) => {
                let files = resolve_beam_pattern(data_root, sbid, pattern, *beam)?;
                if files.is_empty() {
                    warn!(
                        "No files found under '{}' for beam {beam:02} with pattern '{pattern}'",
                        data_root.join(sbid).display()
                    );
                }
                files
            }
            (_, Target::Explicit(p)) => vec![p.clone()],
            (Inputs::Explicit(_), Target::Beam(_)) => vec![],
        };
        Ok(files)
    }
}

/// How a run went, once every target has been attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,

    /// At least one beam failed; the others were still processed.
    BeamsFailed { failed: usize, total: usize },

    /// There were no inputs for any beam, and the stage treats that as a
    /// failure.
    NothingDone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct RunSummary {
    pub(crate) total: usize,
    pub(crate) processed: usize,
    pub(crate) skipped: usize,
    pub(crate) failed: usize,
}

impl RunSummary {
    pub(crate) fn status(&self) -> RunStatus {
        if self.failed > 0 {
            RunStatus::BeamsFailed {
                failed: self.failed,
                total: self.total,
            }
        } else {
            RunStatus::Success
        }
    }
}

/// Plan every target, then (unless this is a dry run) carry out the plans.
///
/// `plan` resolves inputs and derives output names; it returns `None` when a
/// target has nothing to do. Fatal errors from either closure abort the run,
/// and because every target is planned first, fatal naming errors are found
/// before any task runs. Other errors fail only their target.
pub(crate) fn plan_and_run<T>(
    stage: &str,
    targets: &[Target],
    dry_run: bool,
    mut plan: impl FnMut(&Target) -> Result<Option<T>, StageError>,
    mut run: impl FnMut(&Target, T) -> Result<(), StageError>,
) -> Result<RunSummary, StageError> {
    let mut plans = Vec::with_capacity(targets.len());
    for target in targets {
        match plan(target) {
            Err(e) if e.is_fatal() => return Err(e),
            result => plans.push((target, result)),
        }
    }
    debug!("{stage}: planned {} targets", plans.len());

    let pb = ProgressBar::with_draw_target(
        Some(plans.len() as _),
        if PROGRESS_BARS.load() && !dry_run {
            ProgressDrawTarget::stdout()
        } else {
            ProgressDrawTarget::hidden()
        },
    )
    .with_style(
        ProgressStyle::default_bar()
            .template("{msg:16}: [{wide_bar:.blue}] {pos:2}/{len:2} ({elapsed_precise}<{eta_precise})")
            .unwrap()
            .progress_chars("=> "),
    )
    .with_position(0)
    .with_message(stage.to_string());

    let mut summary = RunSummary {
        total: plans.len(),
        ..Default::default()
    };
    for (target, planned) in plans {
        let result = match planned {
            Ok(None) => {
                summary.skipped += 1;
                Ok(())
            }
            Ok(Some(_)) if dry_run => Ok(()),
            Ok(Some(p)) => {
                let r = run(target, p);
                if r.is_ok() {
                    summary.processed += 1;
                }
                r
            }
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            if e.is_fatal() {
                pb.abandon();
                return Err(e);
            }
            error!("{target} failed: {e}");
            summary.failed += 1;
        }
        pb.inc(1);
    }
    pb.finish();

    info!(
        "{stage}: {} of {} targets processed, {} skipped, {} failed",
        summary.processed, summary.total, summary.skipped, summary.failed
    );
    Ok(summary)
}

/// Create the directory that an output will be written into.
pub(crate) fn create_parent_dir(output: &Path) -> Result<(), StageError> {
    if let Some(dir) = output.parent() {
        std::fs::create_dir_all(dir).map_err(|err| StageError::CreateDir {
            path: dir.to_path_buf(),
            err,
        })?;
    }
    Ok(())
}
