// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! File stuff (globs, beam templates, reading measurement set tables).

mod glob;
pub mod ms;

pub use self::glob::{
    expand_beam_template, find_caltable, get_all_matches_from_glob, resolve_beam_pattern,
    GlobError,
};
pub use ms::{CasacoreReader, MsReadError, MsTableRead};
