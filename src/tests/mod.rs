// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helpful functions for tests: stand-ins for CASA and casacore that keep
//! everything they need in small text files inside fake measurement sets.

use std::{
    cell::RefCell,
    fs::{create_dir_all, read_to_string, write},
    path::{Path, PathBuf},
};

use itertools::Itertools;

use crate::{
    casa::{CasaError, CasaTask, CasaTasks, TaskCall},
    io::{MsReadError, MsTableRead},
};

const ROWS_FILE: &str = "ROWS";
const COLUMNS_FILE: &str = "COLUMNS";
const TIMES_FILE: &str = "TIMES";

/// The row count of everything imported from uvfits by [`FakeCasa`].
pub(crate) const IMPORTED_ROWS: u64 = 100;

/// Make a fake measurement set directory with `rows` rows and the given
/// columns.
pub(crate) fn make_ms(path: &Path, rows: u64, columns: &[&str]) {
    create_dir_all(path).unwrap();
    write(path.join(ROWS_FILE), rows.to_string()).unwrap();
    write(path.join(COLUMNS_FILE), columns.join("\n")).unwrap();
}

/// Make a fake measurement set whose TIME column has the given values.
pub(crate) fn make_ms_with_times(path: &Path, times: &[f64]) {
    make_ms(path, times.len() as u64, &["TIME"]);
    write(path.join(TIMES_FILE), times.iter().join(" ")).unwrap();
}

fn read_rows(ms: &Path) -> Option<u64> {
    read_to_string(ms.join(ROWS_FILE))
        .ok()
        .and_then(|s| s.trim().parse().ok())
}

/// Reads the files written by [`make_ms`].
pub(crate) struct FakeReader;

impl MsTableRead for FakeReader {
    fn num_rows(&self, ms: &Path) -> Result<u64, MsReadError> {
        read_rows(ms).ok_or_else(|| MsReadError::BadFile(ms.to_path_buf()))
    }

    fn column_names(&self, ms: &Path) -> Result<Vec<String>, MsReadError> {
        if !ms.is_dir() {
            return Err(MsReadError::BadFile(ms.to_path_buf()));
        }
        Ok(read_to_string(ms.join(COLUMNS_FILE))
            .unwrap_or_default()
            .lines()
            .map(|l| l.to_string())
            .collect())
    }

    fn times(&self, ms: &Path) -> Result<Vec<f64>, MsReadError> {
        if !ms.is_dir() {
            return Err(MsReadError::BadFile(ms.to_path_buf()));
        }
        Ok(read_to_string(ms.join(TIMES_FILE))
            .unwrap_or_default()
            .split_whitespace()
            .map(|s| s.parse().unwrap())
            .collect())
    }
}

/// Records task calls and makes their outputs. Split and mstransform outputs
/// get the row count of their input, concat outputs the sum of their inputs.
#[derive(Default)]
pub(crate) struct FakeCasa {
    pub(crate) calls: RefCell<Vec<TaskCall>>,

    /// Pretend `casatasks` can't be imported.
    pub(crate) unavailable: bool,

    /// Fail this task when its arguments contain the string.
    pub(crate) fail_on: Option<(CasaTask, String)>,

    /// Give split outputs this many rows, regardless of their input.
    pub(crate) split_rows: Option<u64>,
}

impl FakeCasa {
    pub(crate) fn new() -> FakeCasa {
        FakeCasa::default()
    }

    pub(crate) fn tasks(&self) -> Vec<CasaTask> {
        self.calls.borrow().iter().map(|c| c.task()).collect()
    }

    pub(crate) fn num_calls(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl CasaTasks for FakeCasa {
    fn ensure_available(&self, tasks: &[CasaTask]) -> Result<(), CasaError> {
        if self.unavailable {
            return Err(CasaError::Unavailable {
                python: "fake".to_string(),
                tasks: tasks.iter().join(", "),
                reason: "No module named 'casatasks'".to_string(),
            });
        }
        Ok(())
    }

    fn run(&self, call: &TaskCall) -> Result<(), CasaError> {
        self.calls.borrow_mut().push(call.clone());

        if let Some((task, needle)) = self.fail_on.as_ref() {
            if call.task() == *task && call.kwargs()?.to_string().contains(needle.as_str()) {
                return Err(CasaError::TaskFailed {
                    task: *task,
                    status: "exit status: 1".to_string(),
                    stderr: "RuntimeError: simulated failure".to_string(),
                });
            }
        }

        let copy_columns = |from: &Path| -> Vec<String> {
            read_to_string(from.join(COLUMNS_FILE))
                .unwrap_or_default()
                .lines()
                .map(|l| l.to_string())
                .collect()
        };
        let make = |out: &Path, rows: u64, columns: Vec<String>| {
            let columns: Vec<&str> = columns.iter().map(|c| c.as_str()).collect();
            make_ms(out, rows, &columns);
        };
        match call {
            TaskCall::ImportUvfits(a) => make(&a.vis, IMPORTED_ROWS, vec!["DATA".to_string()]),
            TaskCall::Mstransform(a) => make(
                &a.outputvis,
                read_rows(&a.vis).unwrap_or(0),
                copy_columns(&a.vis),
            ),
            TaskCall::Concat(a) => make(
                &a.concatvis,
                a.vis.iter().filter_map(|v| read_rows(v)).sum(),
                a.vis.first().map(|v| copy_columns(v)).unwrap_or_default(),
            ),
            TaskCall::Split(a) => make(
                &a.outputvis,
                self.split_rows
                    .unwrap_or_else(|| read_rows(&a.vis).unwrap_or(0)),
                copy_columns(&a.vis),
            ),
            TaskCall::Gaincal(a) => create_dir_all(&a.caltable).unwrap(),
            TaskCall::Applycal(_) | TaskCall::Clearcal(_) | TaskCall::Uvsub(_) => (),
        }
        Ok(())
    }
}

/// Every path under `dir`, sorted. Used to check that nothing was touched.
pub(crate) fn snapshot(dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = glob::glob(&format!("{}/**/*", dir.display()))
        .unwrap()
        .map(|p| p.unwrap())
        .collect();
    paths.sort();
    paths
}
