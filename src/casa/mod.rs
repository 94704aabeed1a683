// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Running CASA tasks.
//!
//! All of the actual data transformations (importing, averaging, solving and
//! applying gains, subtracting models) are done by `casatasks`. Each task call
//! is described by a [`TaskCall`], whose keyword arguments are serialised to
//! JSON and handed to a Python interpreter that has `casatasks` installed.

mod error;

pub use error::CasaError;

use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use itertools::Itertools;
use log::{debug, trace};
use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString};

use crate::misc::expensive_op;

/// The `casatasks` this pipeline uses.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum CasaTask {
    ImportUvfits,
    Mstransform,
    Concat,
    Applycal,
    Split,
    Clearcal,
    Gaincal,
    Uvsub,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportUvfitsArgs {
    pub fitsfile: PathBuf,
    pub vis: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MstransformArgs {
    pub vis: PathBuf,
    pub outputvis: PathBuf,
    pub timeaverage: bool,
    pub timebin: String,
    pub datacolumn: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConcatArgs {
    pub vis: Vec<PathBuf>,
    pub concatvis: PathBuf,
    pub timesort: bool,
}

/// Optional arguments are left out of the call, so CASA's defaults apply.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ApplycalArgs {
    pub vis: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spw: Option<String>,
    pub gaintable: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gainfield: Option<Vec<String>>,
    pub interp: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calwt: Option<Vec<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parang: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flagbackup: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitArgs {
    pub vis: PathBuf,
    pub outputvis: PathBuf,
    pub datacolumn: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaincalArgs {
    pub vis: PathBuf,
    pub caltable: PathBuf,
    pub field: String,
    pub spw: String,
    pub solint: String,
    pub combine: String,
    pub refant: String,
    pub minsnr: f64,
    pub gaintype: String,
    pub calmode: String,
    pub parang: bool,
}

/// Tasks that only take a measurement set and modify it in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisArgs {
    pub vis: PathBuf,
}

/// One invocation of a CASA task.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskCall {
    ImportUvfits(ImportUvfitsArgs),
    Mstransform(MstransformArgs),
    Concat(ConcatArgs),
    Applycal(ApplycalArgs),
    Split(SplitArgs),
    Clearcal(VisArgs),
    Gaincal(GaincalArgs),
    Uvsub(VisArgs),
}

impl TaskCall {
    pub fn import_uvfits(fitsfile: &Path, vis: &Path) -> TaskCall {
        TaskCall::ImportUvfits(ImportUvfitsArgs {
            fitsfile: fitsfile.to_path_buf(),
            vis: vis.to_path_buf(),
        })
    }

    /// Time average all data columns.
    pub fn time_average(vis: &Path, outputvis: &Path, timebin: &str) -> TaskCall {
        TaskCall::Mstransform(MstransformArgs {
            vis: vis.to_path_buf(),
            outputvis: outputvis.to_path_buf(),
            timeaverage: true,
            timebin: timebin.to_string(),
            datacolumn: "all".to_string(),
        })
    }

    pub fn concat(vis: &[PathBuf], concatvis: &Path) -> TaskCall {
        TaskCall::Concat(ConcatArgs {
            vis: vis.to_vec(),
            concatvis: concatvis.to_path_buf(),
            timesort: true,
        })
    }

    /// Split the CORRECTED_DATA column of `vis` into a new measurement set.
    pub fn split_corrected(vis: &Path, outputvis: &Path) -> TaskCall {
        TaskCall::Split(SplitArgs {
            vis: vis.to_path_buf(),
            outputvis: outputvis.to_path_buf(),
            datacolumn: "corrected".to_string(),
        })
    }

    pub fn clearcal(vis: &Path) -> TaskCall {
        TaskCall::Clearcal(VisArgs {
            vis: vis.to_path_buf(),
        })
    }

    pub fn uvsub(vis: &Path) -> TaskCall {
        TaskCall::Uvsub(VisArgs {
            vis: vis.to_path_buf(),
        })
    }

    pub fn task(&self) -> CasaTask {
        match self {
            TaskCall::ImportUvfits(_) => CasaTask::ImportUvfits,
            TaskCall::Mstransform(_) => CasaTask::Mstransform,
            TaskCall::Concat(_) => CasaTask::Concat,
            TaskCall::Applycal(_) => CasaTask::Applycal,
            TaskCall::Split(_) => CasaTask::Split,
            TaskCall::Clearcal(_) => CasaTask::Clearcal,
            TaskCall::Gaincal(_) => CasaTask::Gaincal,
            TaskCall::Uvsub(_) => CasaTask::Uvsub,
        }
    }

    /// The new artifact this call produces, if it produces one at all.
    /// Calls without one modify their input in place.
    pub fn output(&self) -> Option<&Path> {
        match self {
            TaskCall::ImportUvfits(a) => Some(&a.vis),
            TaskCall::Mstransform(a) => Some(&a.outputvis),
            TaskCall::Concat(a) => Some(&a.concatvis),
            TaskCall::Split(a) => Some(&a.outputvis),
            TaskCall::Gaincal(a) => Some(&a.caltable),
            TaskCall::Applycal(_) | TaskCall::Clearcal(_) | TaskCall::Uvsub(_) => None,
        }
    }

    /// The keyword arguments of the call as a JSON object.
    pub fn kwargs(&self) -> Result<serde_json::Value, CasaError> {
        let v = match self {
            TaskCall::ImportUvfits(a) => serde_json::to_value(a),
            TaskCall::Mstransform(a) => serde_json::to_value(a),
            TaskCall::Concat(a) => serde_json::to_value(a),
            TaskCall::Applycal(a) => serde_json::to_value(a),
            TaskCall::Split(a) => serde_json::to_value(a),
            TaskCall::Clearcal(a) | TaskCall::Uvsub(a) => serde_json::to_value(a),
            TaskCall::Gaincal(a) => serde_json::to_value(a),
        };
        v.map_err(|err| CasaError::Kwargs {
            task: self.task(),
            err,
        })
    }
}

/// Something that can run CASA tasks.
pub trait CasaTasks {
    /// Check that every task in `tasks` can be run. This is done once, before
    /// any beam is processed.
    fn ensure_available(&self, tasks: &[CasaTask]) -> Result<(), CasaError>;

    /// Run a task to completion.
    fn run(&self, call: &TaskCall) -> Result<(), CasaError>;
}

const RUN_TASK_SCRIPT: &str = r#"
import json, sys
kwargs = json.loads(sys.argv[2])
if len(sys.argv) > 3:
    from casatasks import casalog
    casalog.setlogfile(sys.argv[3])
import casatasks
getattr(casatasks, sys.argv[1])(**kwargs)
"#;

/// Runs CASA tasks with a Python interpreter that has `casatasks` installed.
/// Every task runs in its own interpreter process.
#[derive(Debug, Clone)]
pub struct CasaPython {
    python: String,

    /// Where CASA writes its log. If this isn't set, CASA picks a file in the
    /// working directory.
    logfile: Option<PathBuf>,
}

impl CasaPython {
    pub fn new(python: &str, logfile: Option<&Path>) -> CasaPython {
        CasaPython {
            python: python.to_string(),
            logfile: logfile.map(|p| p.to_path_buf()),
        }
    }
}

impl CasaTasks for CasaPython {
    fn ensure_available(&self, tasks: &[CasaTask]) -> Result<(), CasaError> {
        let tasks = tasks.iter().unique().join(", ");
        let script = format!("from casatasks import {tasks}");
        trace!("{} -c '{script}'", self.python);

        let unavailable = |reason: String| CasaError::Unavailable {
            python: self.python.clone(),
            tasks: tasks.clone(),
            reason,
        };
        let output = Command::new(&self.python)
            .arg("-c")
            .arg(&script)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| unavailable(e.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(unavailable(
                stderr.lines().last().unwrap_or_default().to_string(),
            ));
        }
        debug!("casatasks available: {tasks}");
        Ok(())
    }

    fn run(&self, call: &TaskCall) -> Result<(), CasaError> {
        let task = call.task();
        let kwargs = call.kwargs()?.to_string();
        debug!("CASA {task}({kwargs})");

        let mut cmd = Command::new(&self.python);
        cmd.arg("-c")
            .arg(RUN_TASK_SCRIPT)
            .arg(task.to_string())
            .arg(&kwargs)
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        if let Some(logfile) = self.logfile.as_ref() {
            cmd.arg(logfile);
        }

        let output = expensive_op(
            || cmd.output(),
            &format!("Still waiting for CASA {task}"),
        )
        .map_err(|err| CasaError::Spawn {
            python: self.python.clone(),
            task,
            err,
        })?;
        if !output.status.success() {
            return Err(CasaError::TaskFailed {
                task,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}
