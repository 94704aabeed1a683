// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Deriving the name of the next generation from the current one.

use std::{
    fmt::Display,
    num::NonZeroU32,
    path::{Path, PathBuf},
    str::FromStr,
};

use itertools::Itertools;
use regex::Regex;

use super::NamingError;
use crate::constants::{BANDPASS_EXTENSION, CALTABLE_DIR};

lazy_static::lazy_static! {
    static ref RE_CAL_EXTENSION: Regex = Regex::new(r"^(B0|G\d+)$").expect("regex is valid");

    static ref RE_SELFCAL_MARKER: Regex =
        Regex::new(r"^selfcal_([1-9]\d*)$").expect("regex is valid");

    static ref RE_SCAN_TIMESTAMP: Regex = Regex::new(r"^\d{14}$").expect("regex is valid");

    static ref RE_UVSUB_MARKER: Regex =
        Regex::new(r"^uvsub[A-Za-z0-9_-]*$").expect("regex is valid");
}

const MS_SUFFIX: &str = ".ms";
const UVFITS_SUFFIX: &str = ".uvfits";

/// The label of a calibration table generation, e.g. "B0" (bandpass) or "G5"
/// (the fifth gain solution).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CalExtension(String);

impl CalExtension {
    /// Bandpass solutions are applied with nearest-neighbour time
    /// interpolation; everything else is interpolated linearly.
    pub fn is_bandpass(&self) -> bool {
        self.0 == BANDPASS_EXTENSION
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CalExtension {
    type Err = NamingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if RE_CAL_EXTENSION.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(NamingError::InvalidExtension(s.to_string()))
        }
    }
}

impl Display for CalExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The stage that produced a generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageTag {
    /// Imported from uvfits.
    Raw,

    /// Time averaged.
    Averaged,

    /// Scans concatenated into one measurement set, relocated to
    /// `out_root/sbid`.
    Concatenated { out_root: PathBuf, sbid: String },

    /// Calibration applied and corrected data split out.
    Calibrated(CalExtension),

    /// The output of a self-calibration iteration.
    SelfCal(NonZeroU32),

    /// A model subtracted and the residuals split out.
    UvSub(String),
}

/// A generation marker; one dot-delimited segment of a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    Averaged,
    Calibrated(CalExtension),
    SelfCal(NonZeroU32),
    UvSub(String),
}

impl Marker {
    /// Only complete segments are markers; "calibrator" or "selfcal_x" in a
    /// stem are not.
    fn parse(segment: &str) -> Option<Marker> {
        if segment == "avg" {
            return Some(Marker::Averaged);
        }
        if RE_UVSUB_MARKER.is_match(segment) {
            return Some(Marker::UvSub(segment.to_string()));
        }
        if let Some(ext) = segment.strip_prefix("cal") {
            return ext.parse().ok().map(Marker::Calibrated);
        }
        RE_SELFCAL_MARKER
            .captures(segment)
            .and_then(|c| c[1].parse().ok())
            .map(Marker::SelfCal)
    }
}

impl Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Marker::Averaged => write!(f, "avg"),
            Marker::Calibrated(ext) => write!(f, "cal{ext}"),
            Marker::SelfCal(k) => write!(f, "selfcal_{k}"),
            Marker::UvSub(label) => write!(f, "{label}"),
        }
    }
}

/// A measurement set file name, split into a stem and the generation markers
/// that trail it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsName {
    pub stem: String,
    pub markers: Vec<Marker>,
}

impl MsName {
    pub fn parse(file_name: &str) -> Option<MsName> {
        let base = file_name.strip_suffix(MS_SUFFIX)?;
        if base.is_empty() {
            return None;
        }

        let mut segments: Vec<&str> = base.split('.').collect();
        let mut markers = vec![];
        // At least one segment always stays in the stem.
        while segments.len() > 1 {
            match segments.last().and_then(|s| Marker::parse(s)) {
                Some(m) => {
                    markers.push(m);
                    segments.pop();
                }
                None => break,
            }
        }
        markers.reverse();

        Some(MsName {
            stem: segments.join("."),
            markers,
        })
    }

    fn cal_position(&self) -> Option<usize> {
        self.markers
            .iter()
            .position(|m| matches!(m, Marker::Calibrated(_)))
    }

    /// The file name without the ".ms" suffix.
    fn base(&self) -> String {
        std::iter::once(self.stem.clone())
            .chain(self.markers.iter().map(|m| m.to_string()))
            .join(".")
    }

    pub fn file_name(&self) -> String {
        format!("{}{MS_SUFFIX}", self.base())
    }

    /// Replace the calibration marker with `marker`.
    fn substitute_cal(&self, marker: Marker) -> Option<MsName> {
        let i = self.cal_position()?;
        let mut name = self.clone();
        name.markers[i] = marker;
        Some(name)
    }
}

fn file_name_str(path: &Path) -> Result<&str, NamingError> {
    path.file_name()
        .ok_or_else(|| NamingError::NoFileName(path.to_path_buf()))?
        .to_str()
        .ok_or_else(|| NamingError::NonUtf8(path.to_path_buf()))
}

fn parse_ms_name(path: &Path) -> Result<MsName, NamingError> {
    MsName::parse(file_name_str(path)?)
        .ok_or_else(|| NamingError::NotAMeasurementSet(path.to_path_buf()))
}

/// Labels must parse back as markers, e.g. "uvsub" or "uvsub_resid".
fn validate_label(label: &str) -> Result<(), NamingError> {
    if !RE_UVSUB_MARKER.is_match(label) {
        return Err(NamingError::InvalidUvsubLabel(label.to_string()));
    }
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf, NamingError> {
    std::path::absolute(path).map_err(|err| NamingError::Absolute {
        path: path.to_path_buf(),
        err,
    })
}

/// Derive the path of the generation that `stage` makes from `input`.
///
/// - [`StageTag::Raw`]: `x.uvfits` becomes `x.ms`.
/// - [`StageTag::Averaged`]: `avg` is appended, or placed right after a
///   calibration marker if there is one.
/// - [`StageTag::Concatenated`]: 14-digit scan-timestamp segments are dropped
///   from the file name, and the result is placed in `out_root/sbid`, which
///   also drops any scan-timestamp directory the input lived in.
/// - [`StageTag::Calibrated`]: an existing calibration marker is replaced,
///   otherwise one is appended.
/// - [`StageTag::SelfCal`]: the calibration marker is replaced with
///   `selfcal_<k>`.
/// - [`StageTag::UvSub`]: the label is appended.
///
/// The returned path never refers to the same place as `input`.
pub fn derive_output_name(input: &Path, stage: &StageTag) -> Result<PathBuf, NamingError> {
    let dir = input.parent().unwrap_or_else(|| Path::new(""));

    let output = match stage {
        StageTag::Raw => {
            let name = file_name_str(input)?;
            let base = name
                .strip_suffix(UVFITS_SUFFIX)
                .filter(|b| !b.is_empty())
                .ok_or_else(|| NamingError::NotUvfits(input.to_path_buf()))?;
            dir.join(format!("{base}{MS_SUFFIX}"))
        }

        StageTag::Averaged => {
            let mut name = parse_ms_name(input)?;
            match name.cal_position() {
                Some(i) => name.markers.insert(i + 1, Marker::Averaged),
                None => name.markers.push(Marker::Averaged),
            }
            dir.join(name.file_name())
        }

        StageTag::Concatenated { out_root, sbid } => {
            // Check that it's a measurement set at all.
            parse_ms_name(input)?;
            let name = file_name_str(input)?;
            let cleaned = name
                .split('.')
                .enumerate()
                .filter(|(i, s)| *i == 0 || !RE_SCAN_TIMESTAMP.is_match(s))
                .map(|(_, s)| s)
                .join(".");
            out_root.join(sbid).join(cleaned)
        }

        StageTag::Calibrated(ext) => {
            let mut name = parse_ms_name(input)?;
            let marker = Marker::Calibrated(ext.clone());
            match name.cal_position() {
                Some(i) => name.markers[i] = marker,
                None => name.markers.push(marker),
            }
            dir.join(name.file_name())
        }

        StageTag::SelfCal(k) => {
            let name = parse_ms_name(input)?
                .substitute_cal(Marker::SelfCal(*k))
                .ok_or_else(|| NamingError::NoCalibrationMarker(input.to_path_buf()))?;
            dir.join(name.file_name())
        }

        StageTag::UvSub(label) => {
            validate_label(label)?;
            let mut name = parse_ms_name(input)?;
            name.markers.push(Marker::UvSub(label.clone()));
            dir.join(name.file_name())
        }
    };

    if absolute(&output)? == absolute(input)? {
        return Err(NamingError::OutputMatchesInput(output));
    }
    Ok(output)
}

/// The (input, output) generations of self-cal iteration `k`, given the
/// externally calibrated measurement set `base`. Iteration 1 reads `base`
/// itself; iteration `k > 1` reads the output of iteration `k - 1`.
pub fn selfcal_generation_names(
    base: &Path,
    k: NonZeroU32,
) -> Result<(PathBuf, PathBuf), NamingError> {
    let output = derive_output_name(base, &StageTag::SelfCal(k))?;
    let input = match NonZeroU32::new(k.get() - 1) {
        None => base.to_path_buf(),
        Some(previous) => derive_output_name(base, &StageTag::SelfCal(previous))?,
    };
    Ok((input, output))
}

/// The gain table solved during self-cal iteration `k`:
/// `<dir>/caltables/<name without calibration marker>_<prefix>.sol<k>_<solint>.G<k>`.
pub fn selfcal_caltable_name(
    base: &Path,
    k: NonZeroU32,
    prefix: &str,
    solint: &str,
) -> Result<PathBuf, NamingError> {
    let mut name = parse_ms_name(base)?;
    let i = name
        .cal_position()
        .ok_or_else(|| NamingError::NoCalibrationMarker(base.to_path_buf()))?;
    name.markers.remove(i);
    // Dots are fine here ("9.9s"); the table name has no markers to parse.
    if solint.is_empty() || solint.contains('/') {
        return Err(NamingError::InvalidLabel(solint.to_string()));
    }

    let dir = base.parent().unwrap_or_else(|| Path::new(""));
    Ok(dir
        .join(CALTABLE_DIR)
        .join(format!("{}_{prefix}.sol{k}_{solint}.G{k}", name.base())))
}
