// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests. CASA isn't expected to be installed, so only dry runs and
//! argument handling are exercised here.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod args;
mod dry_run;

use std::{
    fs::create_dir_all,
    path::{Path, PathBuf},
    process::Output,
    str::from_utf8,
};

use assert_cmd::{output::OutputError, Command};

const SBID: &str = "SB77974";

fn msflow() -> Command {
    Command::cargo_bin("msflow").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

/// Measurement sets and calibration tables are directories; their contents
/// don't matter to a dry run.
fn make_table(path: &Path) {
    create_dir_all(path).unwrap();
    std::fs::write(path.join("table.dat"), b"").unwrap();
}

/// A data root with averaged scans for beams 0 and 12, and bandpass tables for
/// both under "cal". Nothing exists for beam 5.
fn make_data_root(tmp_dir: &Path) -> PathBuf {
    let data_root = tmp_dir.join("data");
    let sbid_dir = data_root.join(SBID);
    for beam in [0, 12] {
        make_table(&sbid_dir.join(format!(
            "scienceData.{SBID}.field1.beam{beam:02}.20251015072402.avg.ms"
        )));
        make_table(&sbid_dir.join("cal").join(format!("{SBID}.beam{beam:02}.B0")));
    }
    data_root
}

/// Every path under `dir`, sorted.
fn snapshot(dir: &Path) -> Vec<PathBuf> {
    let pattern = format!("{}/**/*", dir.display());
    let mut paths: Vec<PathBuf> = glob::glob(&pattern)
        .unwrap()
        .map(|entry| entry.unwrap())
        .collect();
    paths.sort();
    paths
}
