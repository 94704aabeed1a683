// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use log::info;

use super::{beams::plan_and_run, Inputs, RunStatus, StageContext, StageError};
use crate::{
    casa::{CasaTask, TaskCall},
    lineage::{derive_output_name, ensure_container, StageTag},
};

/// Time average measurement sets. Averaging changes the number of rows, so
/// outputs are only checked for existence, and inputs are always kept.
pub(crate) struct AverageParams {
    pub(crate) inputs: Inputs,

    /// e.g. "9.90s".
    pub(crate) timebin: String,
}

impl AverageParams {
    pub(crate) fn run(&self, ctx: &StageContext) -> Result<RunStatus, StageError> {
        ctx.ensure_available(&[CasaTask::Mstransform])?;

        let summary = plan_and_run(
            "average",
            &self.inputs.targets(),
            ctx.dry_run,
            |target| {
                let mut pairs: Vec<(PathBuf, PathBuf)> = vec![];
                for ms in self.inputs.resolve(target)? {
                    let avg = derive_output_name(&ms, &StageTag::Averaged)?;
                    info!("{target}: {} -> {}", ms.display(), avg.display());
                    pairs.push((ms, avg));
                }
                Ok((!pairs.is_empty()).then_some(pairs))
            },
            |_, pairs| {
                for (ms, avg) in pairs {
                    ctx.run_task(TaskCall::time_average(&ms, &avg, &self.timebin))?;
                    ensure_container(&avg)?;
                }
                Ok(())
            },
        )?;
        Ok(summary.status())
    }
}
