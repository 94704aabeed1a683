// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{
    num::NonZeroU32,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use super::*;
use crate::tests::{make_ms, FakeReader};

fn k(i: u32) -> NonZeroU32 {
    NonZeroU32::new(i).unwrap()
}

fn ext(s: &str) -> CalExtension {
    s.parse().unwrap()
}

const BEAM17: &str =
    "/data/SB77974/cracoData.LTR_1733-2344.SB77974.beam17.20251015072402.avg.calB0.ms";

#[test]
fn test_parse_markers() {
    let name = MsName::parse("cracoData.LTR.SB77974.beam17.avg.calB0.selfcal_2.ms").unwrap();
    assert_eq!(name.stem, "cracoData.LTR.SB77974.beam17");
    assert_eq!(
        name.markers,
        vec![
            Marker::Averaged,
            Marker::Calibrated(ext("B0")),
            Marker::SelfCal(k(2))
        ]
    );
    assert_eq!(
        name.file_name(),
        "cracoData.LTR.SB77974.beam17.avg.calB0.selfcal_2.ms"
    );

    assert!(MsName::parse("foo.uvfits").is_none());
    assert!(MsName::parse(".ms").is_none());
}

#[test]
fn test_parse_keeps_a_stem() {
    // A name made entirely of marker-like segments keeps the first as stem.
    let name = MsName::parse("avg.ms").unwrap();
    assert_eq!(name.stem, "avg");
    assert!(name.markers.is_empty());

    let name = MsName::parse("avg.avg.ms").unwrap();
    assert_eq!(name.stem, "avg");
    assert_eq!(name.markers, vec![Marker::Averaged]);
}

#[test]
fn test_cal_substrings_are_not_markers() {
    let name = MsName::parse("calibrator.SB1.beam00.calBX.ms").unwrap();
    assert_eq!(name.stem, "calibrator.SB1.beam00.calBX");
    assert!(name.markers.is_empty());

    // "calB0" in the middle of a segment isn't a marker either.
    let out = derive_output_name(
        Path::new("/d/mycalB0x.beam00.ms"),
        &StageTag::Calibrated(ext("G5")),
    )
    .unwrap();
    assert_eq!(out, PathBuf::from("/d/mycalB0x.beam00.calG5.ms"));
}

#[test]
fn test_cal_extension_grammar() {
    for good in ["B0", "G1", "G5", "G123"] {
        assert!(good.parse::<CalExtension>().is_ok(), "{good}");
    }
    for bad in ["", "B1", "G", "G5a", "g5", "calB0", "B0.ms"] {
        assert!(
            matches!(
                bad.parse::<CalExtension>(),
                Err(NamingError::InvalidExtension(_))
            ),
            "{bad}"
        );
    }
    assert!(ext("B0").is_bandpass());
    assert!(!ext("G5").is_bandpass());
}

#[test]
fn test_calibrated_replaces_marker() {
    let out = derive_output_name(Path::new(BEAM17), &StageTag::Calibrated(ext("G5"))).unwrap();
    assert_eq!(
        out,
        PathBuf::from(
            "/data/SB77974/cracoData.LTR_1733-2344.SB77974.beam17.20251015072402.avg.calG5.ms"
        )
    );
}

#[test]
fn test_calibrated_appends_marker() {
    let out = derive_output_name(
        Path::new("/data/SB1/x.beam00.avg.ms"),
        &StageTag::Calibrated(ext("B0")),
    )
    .unwrap();
    assert_eq!(out, PathBuf::from("/data/SB1/x.beam00.avg.calB0.ms"));
}

#[test]
fn test_calibrated_same_extension_is_rejected() {
    let result = derive_output_name(Path::new(BEAM17), &StageTag::Calibrated(ext("B0")));
    assert!(matches!(result, Err(NamingError::OutputMatchesInput(_))));
}

#[test]
fn test_averaged() {
    let out = derive_output_name(
        Path::new("/d/SB1/20251015072402/x.SB1.beam03.20251015072402.ms"),
        &StageTag::Averaged,
    )
    .unwrap();
    assert_eq!(
        out,
        PathBuf::from("/d/SB1/20251015072402/x.SB1.beam03.20251015072402.avg.ms")
    );

    // After a calibration marker, not at the end.
    let out = derive_output_name(
        Path::new("/d/x.beam03.calB0.selfcal_1.ms"),
        &StageTag::Averaged,
    )
    .unwrap();
    assert_eq!(out, PathBuf::from("/d/x.beam03.calB0.avg.selfcal_1.ms"));
}

#[test]
fn test_concatenated_strips_timestamps() {
    let input = Path::new(
        "/data/SB77974/20251015072402/cracoData.LTR_1733-2344.SB77974.beam17.20251015072402.avg.ms",
    );
    let out = derive_output_name(
        input,
        &StageTag::Concatenated {
            out_root: PathBuf::from("/out"),
            sbid: "SB77974".to_string(),
        },
    )
    .unwrap();
    assert_eq!(
        out,
        PathBuf::from("/out/SB77974/cracoData.LTR_1733-2344.SB77974.beam17.avg.ms")
    );
    let s = out.display().to_string();
    assert!(!s.contains("20251015072402"));
}

#[test]
fn test_concatenated_into_same_place_is_rejected() {
    // Nothing to strip and relocated onto itself.
    let result = derive_output_name(
        Path::new("/out/SB1/x.beam00.avg.ms"),
        &StageTag::Concatenated {
            out_root: PathBuf::from("/out"),
            sbid: "SB1".to_string(),
        },
    );
    assert!(matches!(result, Err(NamingError::OutputMatchesInput(_))));
}

#[test]
fn test_raw() {
    let out = derive_output_name(
        Path::new("/d/SB1/20251015072402/x.beam00.20251015072402.uvfits"),
        &StageTag::Raw,
    )
    .unwrap();
    assert_eq!(
        out,
        PathBuf::from("/d/SB1/20251015072402/x.beam00.20251015072402.ms")
    );

    let result = derive_output_name(Path::new("/d/x.beam00.ms"), &StageTag::Raw);
    assert!(matches!(result, Err(NamingError::NotUvfits(_))));
}

#[test]
fn test_uvsub() {
    let out = derive_output_name(
        Path::new("/d/x.beam00.selfcal_2.ms"),
        &StageTag::UvSub("uvsub".to_string()),
    )
    .unwrap();
    assert_eq!(out, PathBuf::from("/d/x.beam00.selfcal_2.uvsub.ms"));

    for bad in ["", "a.b", "a/b", "resid", "uvsub.resid", "uvsub/x"] {
        let result = derive_output_name(
            Path::new("/d/x.beam00.ms"),
            &StageTag::UvSub(bad.to_string()),
        );
        assert!(
            matches!(result, Err(NamingError::InvalidUvsubLabel(_))),
            "{bad}"
        );
    }
}

#[test]
fn test_custom_uvsub_label_is_a_marker() {
    let out = derive_output_name(
        Path::new("/d/x.beam00.calB0.ms"),
        &StageTag::UvSub("uvsub_resid".to_string()),
    )
    .unwrap();
    assert_eq!(out, PathBuf::from("/d/x.beam00.calB0.uvsub_resid.ms"));

    let name = MsName::parse("x.beam00.calB0.uvsub_resid.ms").unwrap();
    assert_eq!(name.stem, "x.beam00");
    assert_eq!(
        name.markers,
        vec![
            Marker::Calibrated(ext("B0")),
            Marker::UvSub("uvsub_resid".to_string())
        ]
    );

    // The calibration marker is still found and replaced.
    let recal = derive_output_name(&out, &StageTag::Calibrated(ext("G5"))).unwrap();
    assert_eq!(recal, PathBuf::from("/d/x.beam00.calG5.uvsub_resid.ms"));
}

#[test]
fn test_not_a_measurement_set() {
    let result = derive_output_name(Path::new("/d/x.beam00.txt"), &StageTag::Averaged);
    assert!(matches!(result, Err(NamingError::NotAMeasurementSet(_))));
}

#[test]
fn test_output_never_equals_input() {
    let stems = ["x", "cracoData.LTR_1733-2344.SB77974.beam17", "calB0"];
    let tails = [
        "",
        ".avg",
        ".calB0",
        ".avg.calB0",
        ".calG5",
        ".calB0.selfcal_3",
        ".20251015072402.avg",
        ".uvsub",
    ];
    let stages = [
        StageTag::Averaged,
        StageTag::Calibrated(ext("B0")),
        StageTag::Calibrated(ext("G5")),
        StageTag::SelfCal(k(1)),
        StageTag::SelfCal(k(4)),
        StageTag::UvSub("uvsub".to_string()),
        StageTag::UvSub("uvsub_resid".to_string()),
        StageTag::Concatenated {
            out_root: PathBuf::from("/root"),
            sbid: "SB1".to_string(),
        },
    ];

    for stem in stems {
        for tail in tails {
            let input = PathBuf::from(format!("/root/SB1/{stem}{tail}.ms"));
            for stage in &stages {
                match derive_output_name(&input, stage) {
                    Ok(output) => assert_ne!(output, input, "{stage:?}"),
                    // Refusals are fine; silently returning the input isn't.
                    Err(
                        NamingError::OutputMatchesInput(_) | NamingError::NoCalibrationMarker(_),
                    ) => (),
                    Err(e) => panic!("Unexpected error for {}: {e}", input.display()),
                }
            }
        }
    }
}

#[test]
fn test_selfcal_generations() {
    let base = Path::new("/d/foo.calB0.ms");
    let (input, output) = selfcal_generation_names(base, k(1)).unwrap();
    assert_eq!(input, base);
    assert_eq!(output, PathBuf::from("/d/foo.selfcal_1.ms"));

    let (input, output) = selfcal_generation_names(base, k(2)).unwrap();
    assert_eq!(input, PathBuf::from("/d/foo.selfcal_1.ms"));
    assert_eq!(output, PathBuf::from("/d/foo.selfcal_2.ms"));
}

#[test]
fn test_selfcal_chain_is_consistent() {
    let base = Path::new(BEAM17);
    for i in 2..=10 {
        let (_, previous_output) = selfcal_generation_names(base, k(i - 1)).unwrap();
        let (input, _) = selfcal_generation_names(base, k(i)).unwrap();
        assert_eq!(input, previous_output);
    }
}

#[test]
fn test_selfcal_needs_cal_marker() {
    let result = selfcal_generation_names(Path::new("/d/foo.avg.ms"), k(1));
    assert!(matches!(result, Err(NamingError::NoCalibrationMarker(_))));
}

#[test]
fn test_selfcal_caltable_name() {
    let t = selfcal_caltable_name(Path::new(BEAM17), k(2), "selfcal_p", "60s").unwrap();
    assert_eq!(
        t,
        PathBuf::from(
            "/data/SB77974/caltables/cracoData.LTR_1733-2344.SB77974.beam17.20251015072402.avg_selfcal_p.sol2_60s.G2"
        )
    );
}

#[test]
fn test_validate_equal_rows() {
    let tmp_dir = TempDir::new().unwrap();
    let old = tmp_dir.path().join("x.beam17.calB0.ms");
    let new = tmp_dir.path().join("x.beam17.calG5.ms");
    make_ms(&old, 100, &[]);
    make_ms(&new, 100, &[]);

    let rows = validate_generation(&FakeReader, &old, &new).unwrap();
    assert_eq!(rows, 100);
    assert!(old.exists());
}

#[test]
fn test_validate_mismatch_preserves_old() {
    let tmp_dir = TempDir::new().unwrap();
    let old = tmp_dir.path().join("x.beam17.calB0.ms");
    let new = tmp_dir.path().join("x.beam17.calG5.ms");
    make_ms(&old, 100, &[]);
    make_ms(&new, 99, &[]);

    let result = validate_generation(&FakeReader, &old, &new);
    match result {
        Err(ValidationError::RowCountMismatch {
            old_rows, new_rows, ..
        }) => {
            assert_eq!(old_rows, 100);
            assert_eq!(new_rows, 99);
        }
        other => panic!("Expected a row count mismatch, got {other:?}"),
    }
    assert!(old.exists());
    assert!(new.exists());
}

#[test]
fn test_validate_missing_and_not_a_container() {
    let tmp_dir = TempDir::new().unwrap();
    let old = tmp_dir.path().join("old.ms");
    make_ms(&old, 10, &[]);

    let new = tmp_dir.path().join("new.ms");
    let result = validate_generation(&FakeReader, &old, &new);
    assert!(matches!(result, Err(ValidationError::Missing(_))));

    std::fs::write(&new, "not a table").unwrap();
    let result = validate_generation(&FakeReader, &old, &new);
    assert!(matches!(result, Err(ValidationError::NotAContainer(_))));
    assert!(matches!(
        ensure_container(&new),
        Err(ValidationError::NotAContainer(_))
    ));
}

#[test]
fn test_supersede() {
    let tmp_dir = TempDir::new().unwrap();
    let old = tmp_dir.path().join("old.ms");
    make_ms(&old, 10, &[]);
    std::fs::create_dir_all(old.join("ANTENNA")).unwrap();

    supersede(&old).unwrap();
    assert!(!old.exists());

    // Already gone.
    let result = supersede(&old);
    assert!(result.is_err());
    let msg = result.unwrap_err().to_string();
    assert!(msg.contains("old.ms"), "{msg}");
}

#[test]
fn test_selfcal_caltable_solint() {
    let base = Path::new("/d/foo.calB0.ms");
    let t = selfcal_caltable_name(base, k(1), "selfcal_p", "9.9s").unwrap();
    assert_eq!(t, PathBuf::from("/d/caltables/foo_selfcal_p.sol1_9.9s.G1"));

    for bad in ["", "a/b"] {
        let result = selfcal_caltable_name(base, k(1), "selfcal_p", bad);
        assert!(matches!(result, Err(NamingError::InvalidLabel(_))), "{bad}");
    }
}
