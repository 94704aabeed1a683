// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Bad arguments and missing collaborators, and the exit codes they give.

use tempfile::TempDir;

use crate::{get_cmd_output, make_data_root, make_table, msflow, SBID};

#[test]
fn test_help() {
    msflow().arg("--help").assert().success();
    msflow().args(["selfcal", "--help"]).assert().success();
}

#[test]
fn test_no_subcommand_is_an_error() {
    msflow().assert().failure();
    msflow().arg("image").assert().failure();
}

#[test]
fn test_missing_casa_exits_1() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let data_root = make_data_root(tmp_dir.path());

    #[rustfmt::skip]
    let cmd = msflow()
        .args([
            "applycal",
            "--sbid", SBID,
            "--data-root", &data_root.display().to_string(),
            "--cal-dir", "cal",
            "--beam", "0",
            "--casa-python", "/this/python/does/not/exist",
        ])
        .assert()
        .code(1);
    let (_, stderr) = get_cmd_output(Ok(cmd.get_output().clone()));
    assert!(stderr.contains("casatasks"), "{stderr}");
}

#[test]
fn test_pattern_without_beam_placeholder_exits_3() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let data_root = make_data_root(tmp_dir.path());

    msflow()
        .args([
            "average",
            "--sbid", SBID,
            "--data-root", &data_root.display().to_string(),
            "--pattern", "*.ms",
            "--beams", "0,12",
            "--dry-run",
        ])
        .assert()
        .code(3);
}

#[test]
fn test_invalid_selfcal_index_exits_3() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let base = tmp_dir.path().join("field1.beam03.calB0.ms");
    make_table(&base);

    for index in ["0", "-2"] {
        msflow()
            .args([
                "selfcal",
                "--ms", &base.display().to_string(),
                "--index", index,
                "--solint", "inf",
                "--dry-run",
            ])
            .assert()
            .code(3);
    }
}

#[test]
fn test_input_without_calibration_marker_exits_3() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let base = tmp_dir.path().join("field1.beam03.avg.ms");
    make_table(&base);

    msflow()
        .args([
            "selfcal",
            "--ms", &base.display().to_string(),
            "--index", "2",
            "--solint", "inf",
            "--dry-run",
        ])
        .assert()
        .code(3);
}

#[test]
fn test_bad_beams_exit_3() {
    for beams in ["0,x", "36", ""] {
        msflow()
            .args([
                "clearcal",
                "--sbid", SBID,
                "--beams", beams,
                "--dry-run",
            ])
            .assert()
            .code(3);
    }
}

#[test]
fn test_bad_extension_exits_3() {
    msflow()
        .args([
            "applycal",
            "--sbid", SBID,
            "--cal-dir", "cal",
            "--extension", "X9",
            "--dry-run",
        ])
        .assert()
        .code(3);
}

#[test]
fn test_ms_intervals_needs_a_measurement_set() {
    msflow().args(["ms-intervals"]).assert().code(3);

    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let ms = tmp_dir.path().join("x.ms");
    make_table(&ms);
    msflow()
        .args([
            "ms-intervals",
            "--ms", &ms.display().to_string(),
            "--timestep", "0",
        ])
        .assert()
        .code(3);
}
