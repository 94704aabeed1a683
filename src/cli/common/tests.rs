// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests against command-line interfaces that aren't big enough to go in their
//! own modules.

use std::path::PathBuf;

use serial_test::serial;

use super::{printers::take_warnings, *};
use crate::constants::DEFAULT_AVERAGE_PATTERN;

fn sbid_args() -> BeamSelectionArgs {
    BeamSelectionArgs {
        sbid: Some("77974".to_string()),
        ..Default::default()
    }
}

#[test]
fn test_parse_beam_set() {
    assert_eq!(parse_beam_set("all", 36).unwrap(), (0..36).collect::<Vec<u8>>());
    assert_eq!(parse_beam_set("ALL", 4).unwrap(), vec![0, 1, 2, 3]);
    assert_eq!(parse_beam_set("0,5,12", 36).unwrap(), vec![0, 5, 12]);
    // Insertion order is kept and repeats are dropped.
    assert_eq!(parse_beam_set("12, 0,12,5", 36).unwrap(), vec![12, 0, 5]);
    assert_eq!(parse_beam_set("3,", 36).unwrap(), vec![3]);
}

#[test]
fn test_parse_beam_set_errors() {
    assert!(matches!(
        parse_beam_set("0,x", 36),
        Err(BeamSelectionError::BadBeam(b)) if b == "x"
    ));
    assert!(matches!(
        parse_beam_set("-1", 36),
        Err(BeamSelectionError::BadBeam(_))
    ));
    assert!(matches!(
        parse_beam_set("0,36", 36),
        Err(BeamSelectionError::BeamOutOfRange {
            beam: 36,
            num_beams: 36
        })
    ));
    assert!(matches!(
        parse_beam_set(" , ", 36),
        Err(BeamSelectionError::NoBeams)
    ));
    assert!(matches!(
        parse_beam_set("all", 0),
        Err(BeamSelectionError::NoBeams)
    ));
}

#[test]
#[serial]
fn test_defaults() {
    take_warnings();
    let selection = sbid_args().parse(DEFAULT_AVERAGE_PATTERN).unwrap();
    assert_eq!(selection.sbid, "77974");
    assert_eq!(selection.data_root, PathBuf::from(DEFAULT_DATA_ROOT));
    assert_eq!(selection.pattern, DEFAULT_AVERAGE_PATTERN);
    assert_eq!(selection.beams.len(), usize::from(DEFAULT_NUM_BEAMS));
    assert!(take_warnings().is_empty());
}

#[test]
fn test_no_sbid() {
    let result = BeamSelectionArgs::default().parse(DEFAULT_AVERAGE_PATTERN);
    assert!(matches!(result, Err(BeamSelectionError::NoSbid)));

    let result = BeamSelectionArgs {
        sbid: Some("a/b".to_string()),
        ..Default::default()
    }
    .parse(DEFAULT_AVERAGE_PATTERN);
    assert!(matches!(result, Err(BeamSelectionError::BadSbid(_))));
}

#[test]
#[serial]
fn test_beam_wins_over_beams() {
    take_warnings();
    let selection = BeamSelectionArgs {
        beam: Some(17),
        beams: Some("0,5".to_string()),
        ..sbid_args()
    }
    .parse(DEFAULT_AVERAGE_PATTERN)
    .unwrap();
    assert_eq!(selection.beams, vec![17]);
    assert_eq!(take_warnings().len(), 1);

    let result = BeamSelectionArgs {
        beam: Some(6),
        num_beams: Some(6),
        ..sbid_args()
    }
    .parse(DEFAULT_AVERAGE_PATTERN);
    assert!(matches!(
        result,
        Err(BeamSelectionError::BeamOutOfRange { beam: 6, .. })
    ));
}

#[test]
fn test_merge_prefers_cli() {
    let cli = BeamSelectionArgs {
        sbid: Some("1".to_string()),
        beams: Some("3".to_string()),
        ..Default::default()
    };
    let file = BeamSelectionArgs {
        sbid: Some("2".to_string()),
        data_root: Some(PathBuf::from("/scratch")),
        ..Default::default()
    };
    let merged = cli.merge(file);
    assert_eq!(merged.sbid.as_deref(), Some("1"));
    assert_eq!(merged.data_root, Some(PathBuf::from("/scratch")));
    assert_eq!(merged.beams.as_deref(), Some("3"));
    assert_eq!(merged.beam, None);
}

#[test]
#[serial]
fn test_explicit_inputs_win() {
    take_warnings();
    let files = vec![PathBuf::from("a.ms"), PathBuf::from("b.ms")];
    let inputs = parse_inputs(sbid_args(), Some(files.clone()), DEFAULT_AVERAGE_PATTERN).unwrap();
    assert_eq!(inputs, Inputs::Explicit(files));
    assert_eq!(take_warnings().len(), 1);

    // Without explicit files, an SBID is needed.
    let result = parse_inputs(BeamSelectionArgs::default(), Some(vec![]), "");
    assert!(matches!(result, Err(BeamSelectionError::NoSbid)));

    let inputs = parse_inputs(
        BeamSelectionArgs {
            beams: Some("0,5,12".to_string()),
            ..sbid_args()
        },
        None,
        DEFAULT_AVERAGE_PATTERN,
    )
    .unwrap();
    assert_eq!(
        inputs,
        Inputs::Beams {
            sbid: "77974".to_string(),
            data_root: PathBuf::from(DEFAULT_DATA_ROOT),
            pattern: DEFAULT_AVERAGE_PATTERN.to_string(),
            beams: vec![0, 5, 12],
        }
    );
}
