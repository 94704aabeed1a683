// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
A pipeline for ASKAP measurement sets: import, averaging, concatenation,
calibration, self-calibration and model subtraction, with CASA doing the data
transformations.

Every stage writes a new generation of a measurement set whose name is derived
from its input. A generation is only removed once its successor exists and has
the same number of rows.
 */

pub mod casa;
mod cli;
pub mod constants;
pub mod io;
pub mod lineage;
pub(crate) mod misc;
mod params;
pub mod selfcal;

#[cfg(test)]
mod tests;

use crossbeam_utils::atomic::AtomicCell;

// Re-exports.
pub use cli::{Msflow, MsflowError};
pub use params::RunStatus;

/// Should progress bars be drawn? Set once by the CLI.
static PROGRESS_BARS: AtomicCell<bool> = AtomicCell::new(false);
