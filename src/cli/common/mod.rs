// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Common arguments for command-line interfaces. Most `msflow` subcommands
//! work on the same SBID/beam layout, so the arguments selecting beams are
//! shared between them.

mod printers;
#[cfg(test)]
mod tests;

pub(super) use printers::InfoPrinter;
pub(crate) use printers::{display_warnings, Warn};

use std::path::PathBuf;

use clap::Parser;
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::{
    constants::{DEFAULT_DATA_ROOT, DEFAULT_NUM_BEAMS},
    params::Inputs,
};

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);

    pub(super) static ref DATA_ROOT_HELP: String =
        format!("The directory containing one directory per SBID. Default: {DEFAULT_DATA_ROOT}");

    pub(super) static ref NUM_BEAMS_HELP: String =
        format!("The number of beams in the observation; \"all\" means beams 0 to this minus 1. Default: {DEFAULT_NUM_BEAMS}");
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

/// Read an arguments file into the args struct that this macro is invoked
/// from. The file's type is determined by its extension.
macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::{fs::File, io::Read, str::FromStr};

        use crate::cli::common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let mut contents = String::new();
        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match toml::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(MsflowError::ArgFile(format!(
                            "Couldn't decode toml structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match serde_json::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(MsflowError::ArgFile(format!(
                            "Couldn't decode json structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }

            _ => {
                return Err(MsflowError::ArgFile(format!(
                    "Argument file '{:?}' doesn't have a recognised file extension! Valid extensions are: {}", $arg_file, *ARG_FILE_TYPES_COMMA_SEPARATED)
                ))
            }
        }
    });
}

/// Arguments selecting which beams of an SBID a stage works on, and where
/// their files are.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct BeamSelectionArgs {
    /// The scheduling-block identifier, e.g. 77974. Files are found under
    /// <DATA_ROOT>/<SBID>.
    #[clap(long, help_heading = "BEAM SELECTION")]
    pub(super) sbid: Option<String>,

    #[clap(long, help = DATA_ROOT_HELP.as_str(), help_heading = "BEAM SELECTION")]
    pub(super) data_root: Option<PathBuf>,

    /// A glob, relative to <DATA_ROOT>/<SBID>, selecting one beam's files.
    /// It must contain a beam placeholder, e.g. "{beam:02d}".
    #[clap(long, help_heading = "BEAM SELECTION")]
    pub(super) pattern: Option<String>,

    /// Process only this beam. Takes precedence over --beams.
    #[clap(long, help_heading = "BEAM SELECTION")]
    pub(super) beam: Option<u8>,

    /// The beams to process; "all" or a comma-separated list (e.g. 0,5,12).
    /// Default: all
    #[clap(long, help_heading = "BEAM SELECTION")]
    pub(super) beams: Option<String>,

    #[clap(long, help = NUM_BEAMS_HELP.as_str(), help_heading = "BEAM SELECTION")]
    pub(super) num_beams: Option<u8>,
}

/// Beam-selection arguments that have been made sense of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct BeamSelection {
    pub(super) sbid: String,
    pub(super) data_root: PathBuf,
    pub(super) pattern: String,
    pub(super) beams: Vec<u8>,
}

impl BeamSelection {
    pub(super) fn into_inputs(self) -> Inputs {
        Inputs::Beams {
            sbid: self.sbid,
            data_root: self.data_root,
            pattern: self.pattern,
            beams: self.beams,
        }
    }
}

impl BeamSelectionArgs {
    /// Prefer the values in `self`.
    pub(super) fn merge(self, other: Self) -> Self {
        Self {
            sbid: self.sbid.or(other.sbid),
            data_root: self.data_root.or(other.data_root),
            pattern: self.pattern.or(other.pattern),
            beam: self.beam.or(other.beam),
            beams: self.beams.or(other.beams),
            num_beams: self.num_beams.or(other.num_beams),
        }
    }

    pub(super) fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub(super) fn parse(self, default_pattern: &str) -> Result<BeamSelection, BeamSelectionError> {
        let Self {
            sbid,
            data_root,
            pattern,
            beam,
            beams,
            num_beams,
        } = self;

        let sbid = sbid.ok_or(BeamSelectionError::NoSbid)?;
        if sbid.is_empty() || sbid.contains('/') {
            return Err(BeamSelectionError::BadSbid(sbid));
        }
        let num_beams = num_beams.unwrap_or(DEFAULT_NUM_BEAMS);
        let beams = match (beam, beams) {
            (Some(b), other) => {
                if let Some(other) = other {
                    format!("Both --beam and --beams ({other}) were given; using only beam {b}")
                        .warn();
                }
                if b >= num_beams {
                    return Err(BeamSelectionError::BeamOutOfRange { beam: b, num_beams });
                }
                vec![b]
            }
            (None, beams) => parse_beam_set(beams.as_deref().unwrap_or("all"), num_beams)?,
        };
        debug!("Beams: {beams:?}");

        Ok(BeamSelection {
            sbid,
            data_root: data_root.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_ROOT)),
            pattern: pattern.unwrap_or_else(|| default_pattern.to_string()),
            beams,
        })
    }
}

/// Either explicitly-named files or a beam selection. Explicit files win.
pub(super) fn parse_inputs(
    beam_args: BeamSelectionArgs,
    explicit: Option<Vec<PathBuf>>,
    default_pattern: &str,
) -> Result<Inputs, BeamSelectionError> {
    match explicit {
        Some(files) if !files.is_empty() => {
            if !beam_args.is_empty() {
                "Explicit input files were given; ignoring the beam-selection arguments".warn();
            }
            Ok(Inputs::Explicit(files))
        }
        _ => Ok(beam_args.parse(default_pattern)?.into_inputs()),
    }
}

/// Parse "all" or a comma-separated list of beams. Listed beams keep their
/// order; repeats are dropped.
pub(super) fn parse_beam_set(s: &str, num_beams: u8) -> Result<Vec<u8>, BeamSelectionError> {
    if num_beams == 0 {
        return Err(BeamSelectionError::NoBeams);
    }
    if s.trim().eq_ignore_ascii_case("all") {
        return Ok((0..num_beams).collect());
    }

    let mut beams = vec![];
    for token in s.split(',').map(|t| t.trim()).filter(|t| !t.is_empty()) {
        let beam: u8 = token
            .parse()
            .map_err(|_| BeamSelectionError::BadBeam(token.to_string()))?;
        if beam >= num_beams {
            return Err(BeamSelectionError::BeamOutOfRange { beam, num_beams });
        }
        beams.push(beam);
    }
    let beams: Vec<u8> = beams.into_iter().unique().collect();
    if beams.is_empty() {
        return Err(BeamSelectionError::NoBeams);
    }
    Ok(beams)
}

#[derive(Error, Debug)]
pub(super) enum BeamSelectionError {
    #[error("No SBID was given (--sbid)")]
    NoSbid,

    #[error("SBID '{0}' can't be used as a directory name")]
    BadSbid(String),

    #[error("Couldn't parse '{0}' as a beam number")]
    BadBeam(String),

    #[error("Beam {beam} is out of range; there are {num_beams} beams (0 to {})", num_beams.saturating_sub(1))]
    BeamOutOfRange { beam: u8, num_beams: u8 },

    #[error("No beams were selected")]
    NoBeams,
}
