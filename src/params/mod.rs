// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parameters of each pipeline stage, and the code that runs the stages.
//!
//! The code here is kind of "mirroring" the code within the `cli` module; the
//! idea is that `cli` is unparsed, user-facing code, whereas parameters have
//! been parsed and are ready to be used directly.
//!
//! Every stage follows the same steps for each input: derive the output name,
//! run CASA, validate the output and (if asked) remove the input.

mod applycal;
mod average;
mod beams;
mod clearcal;
mod concat;
mod error;
mod import;
mod intervals;
mod selfcal;
mod uvsub;

pub(crate) use applycal::ApplycalParams;
pub(crate) use average::AverageParams;
pub use beams::RunStatus;
pub(crate) use beams::{Inputs, Target};
pub(crate) use clearcal::ClearcalParams;
pub(crate) use concat::ConcatParams;
pub(crate) use error::StageError;
pub(crate) use import::ImportParams;
pub(crate) use intervals::{IntervalsError, IntervalsParams, IntervalsReport};
pub(crate) use selfcal::{GaincalOptions, SelfCalParams};
pub(crate) use uvsub::UvsubParams;

use log::info;

use crate::{
    casa::{CasaTask, CasaTasks, TaskCall},
    io::MsTableRead,
};

/// The external collaborators of a stage.
pub(crate) struct StageContext<'a> {
    pub(crate) casa: &'a dyn CasaTasks,
    pub(crate) reader: &'a dyn MsTableRead,

    /// Resolve inputs and derive outputs, but don't touch the filesystem,
    /// run CASA or open any tables.
    pub(crate) dry_run: bool,
}

impl StageContext<'_> {
    /// Check that CASA can run every task a stage needs. Dry runs don't need
    /// CASA at all.
    fn ensure_available(&self, tasks: &[CasaTask]) -> Result<(), StageError> {
        if !self.dry_run {
            self.casa.ensure_available(tasks)?;
        }
        Ok(())
    }

    fn run_task(&self, call: TaskCall) -> Result<(), StageError> {
        match call.output() {
            Some(out) => info!("{}: -> {}", call.task(), out.display()),
            None => info!("{}", call.task()),
        }
        self.casa.run(&call)?;
        Ok(())
    }
}
