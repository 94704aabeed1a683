// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Dry runs find inputs and derive outputs, but never touch the data or need
//! CASA.

use tempfile::TempDir;

use crate::{get_cmd_output, make_data_root, make_table, msflow, snapshot, SBID};

#[test]
fn test_applycal_dry_run_changes_nothing() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let data_root = make_data_root(tmp_dir.path());
    let before = snapshot(tmp_dir.path());

    #[rustfmt::skip]
    let cmd = msflow()
        .args([
            "applycal",
            "--sbid", SBID,
            "--data-root", &data_root.display().to_string(),
            "--cal-dir", "cal",
            "--beams", "0,5,12",
            "--delete-previous",
            "--dry-run",
            "--no-progress-bars",
            "--casa-python", "/this/python/does/not/exist",
        ])
        .ok();
    assert!(cmd.is_ok(), "applycal dry run failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);

    assert!(stdout.contains("beam00.20251015072402.avg.calB0.ms"), "{stdout}");
    assert!(stdout.contains("beam12.20251015072402.avg.calB0.ms"), "{stdout}");
    // Beam 5 has nothing; that's a warning, not a failure.
    assert!(stdout.contains("beam 05"), "{stdout}");
    assert_eq!(before, snapshot(tmp_dir.path()));
}

#[test]
fn test_selfcal_dry_run_changes_nothing() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let base = tmp_dir.path().join("field1.beam03.calB0.ms");
    make_table(&base);
    let before = snapshot(tmp_dir.path());

    #[rustfmt::skip]
    let cmd = msflow()
        .args([
            "selfcal",
            "--ms", &base.display().to_string(),
            "--index", "1",
            "--solint", "inf,60s",
            "--dry-run",
            "--no-progress-bars",
        ])
        .ok();
    assert!(cmd.is_ok(), "selfcal dry run failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);

    assert!(stdout.contains("field1.beam03.selfcal_1.ms"), "{stdout}");
    assert!(stdout.contains("field1.beam03.selfcal_2.ms"), "{stdout}");
    // No caltables directory is made.
    assert_eq!(before, snapshot(tmp_dir.path()));
}

#[test]
fn test_concat_dry_run_with_no_inputs_succeeds() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let data_root = tmp_dir.path().join("data");
    std::fs::create_dir_all(data_root.join(SBID)).unwrap();

    #[rustfmt::skip]
    let cmd = msflow()
        .args([
            "concat",
            "--sbid", SBID,
            "--data-root", &data_root.display().to_string(),
            "--beam", "7",
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "concat dry run failed: {}", cmd.err().unwrap());
}

#[test]
fn test_saved_toml_can_be_reused() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let data_root = make_data_root(tmp_dir.path());
    let toml = tmp_dir.path().join("applycal.toml");

    #[rustfmt::skip]
    let cmd = msflow()
        .args([
            "applycal",
            "--sbid", SBID,
            "--data-root", &data_root.display().to_string(),
            "--cal-dir", "cal",
            "--beam", "12",
            "--dry-run",
            "--save-toml", &toml.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "applycal dry run failed: {}", cmd.err().unwrap());
    let saved = std::fs::read_to_string(&toml).unwrap();
    assert!(saved.contains(SBID), "{saved}");

    let cmd = msflow()
        .args(["applycal", &toml.display().to_string(), "--dry-run"])
        .ok();
    assert!(
        cmd.is_ok(),
        "applycal from an arguments file failed: {}",
        cmd.err().unwrap()
    );
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("beam12.20251015072402.avg.calB0.ms"), "{stdout}");
    assert!(!stdout.contains("beam00.20251015072402.avg.calB0.ms"), "{stdout}");
}
