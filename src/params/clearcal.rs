// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use log::info;

use super::{beams::plan_and_run, Inputs, RunStatus, StageContext, StageError};
use crate::casa::{CasaTask, TaskCall};

/// Reset the CORRECTED_DATA of measurement sets. This works in place, so no
/// new generation is made.
pub(crate) struct ClearcalParams {
    pub(crate) inputs: Inputs,
}

impl ClearcalParams {
    pub(crate) fn run(&self, ctx: &StageContext) -> Result<RunStatus, StageError> {
        ctx.ensure_available(&[CasaTask::Clearcal])?;

        let summary = plan_and_run(
            "clearcal",
            &self.inputs.targets(),
            ctx.dry_run,
            |target| {
                let mss = self.inputs.resolve(target)?;
                for ms in &mss {
                    info!("{target}: {}", ms.display());
                }
                Ok((!mss.is_empty()).then_some(mss))
            },
            |_, mss| {
                for ms in mss {
                    ctx.run_task(TaskCall::clearcal(&ms))?;
                }
                Ok(())
            },
        )?;
        Ok(summary.status())
    }
}
