// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Functions to glob files, and to turn beam-indexed templates into globs.

use std::path::{Path, PathBuf};

use glob::{glob, Pattern};
use log::trace;
use regex::{Captures, Regex};
use thiserror::Error;

lazy_static::lazy_static! {
    // Format-style placeholders, e.g. "{beam}", "{beam:02d}" or "{beam:2d}".
    static ref RE_BEAM_PLACEHOLDER: Regex =
        Regex::new(r"\{beam(?::(0?)(\d{1,2})d)?\}").expect("regex is valid");
}

/// Given a glob pattern, get all of the matches from the filesystem.
pub fn get_all_matches_from_glob(g: &str) -> Result<Vec<PathBuf>, GlobError> {
    let mut entries = vec![];
    for entry in glob(g)? {
        match entry {
            Ok(e) => entries.push(e),
            Err(e) => return Err(GlobError::GlobCrate(e)),
        }
    }
    Ok(entries)
}

/// Substitute every beam placeholder in `template` with `beam`. A template
/// without any placeholder is rejected; it would resolve the same files for
/// every beam.
pub fn expand_beam_template(template: &str, beam: u8) -> Result<String, GlobError> {
    if !RE_BEAM_PLACEHOLDER.is_match(template) {
        return Err(GlobError::NoBeamPlaceholder {
            template: template.to_string(),
        });
    }

    let expanded = RE_BEAM_PLACEHOLDER.replace_all(template, |caps: &Captures| {
        let width: usize = caps
            .get(2)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0);
        let zero_pad = caps.get(1).map(|m| !m.as_str().is_empty()).unwrap_or(false);
        if zero_pad {
            format!("{beam:0width$}")
        } else {
            format!("{beam:width$}")
        }
    });
    Ok(expanded.into_owned())
}

/// Expand `template` for `beam` and glob for it under `root/sbid`. The
/// returned paths are absolute and sorted lexicographically, so "the first
/// match" is the same across runs. No matches is not an error here; callers
/// decide what an empty result means.
pub fn resolve_beam_pattern(
    root: &Path,
    sbid: &str,
    template: &str,
    beam: u8,
) -> Result<Vec<PathBuf>, GlobError> {
    let expanded = expand_beam_template(template, beam)?;
    let base = std::path::absolute(root.join(sbid))?;
    let g = format!("{}/{expanded}", Pattern::escape(&base.display().to_string()));
    trace!("Beam {beam:02}: globbing '{g}'");

    let mut matches = get_all_matches_from_glob(&g)?;
    matches.sort();
    Ok(matches)
}

/// Find the calibration table for `beam` with the given extension, i.e. the
/// first (sorted) match of `data_root/sbid/cal_dir/*beamNN*.<extension>`.
pub fn find_caltable(
    data_root: &Path,
    sbid: &str,
    cal_dir: &Path,
    beam: u8,
    extension: &str,
) -> Result<PathBuf, GlobError> {
    let dir = data_root.join(sbid).join(cal_dir);
    let g = format!(
        "{}/*beam{beam:02}*.{}",
        Pattern::escape(&dir.display().to_string()),
        Pattern::escape(extension)
    );
    let mut matches = get_all_matches_from_glob(&g)?;
    matches.sort();
    matches
        .into_iter()
        .next()
        .ok_or(GlobError::NoMatches { glob: g })
}

#[derive(Error, Debug)]
/// Error type associated with glob helper functions.
pub enum GlobError {
    #[error("No glob matches were found for {glob}")]
    NoMatches { glob: String },

    #[error("The pattern '{template}' has no beam placeholder (e.g. {{beam:02d}}); every beam would match the same files")]
    NoBeamPlaceholder { template: String },

    #[error(transparent)]
    GlobCrate(#[from] glob::GlobError),

    #[error(transparent)]
    PatternError(#[from] glob::PatternError),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
