// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use log::{info, warn};

use super::{
    beams::{create_parent_dir, plan_and_run},
    Inputs, RunStatus, StageContext, StageError,
};
use crate::{
    casa::{CasaTask, TaskCall},
    lineage::{derive_output_name, ensure_container, StageTag},
};

/// Concatenate the scans of each beam into one measurement set under
/// `out_root/sbid`, sorted in time.
pub(crate) struct ConcatParams {
    pub(crate) inputs: Inputs,
    pub(crate) sbid: String,
    pub(crate) out_root: PathBuf,
}

impl ConcatParams {
    pub(crate) fn run(&self, ctx: &StageContext) -> Result<RunStatus, StageError> {
        ctx.ensure_available(&[CasaTask::Concat])?;

        let tag = StageTag::Concatenated {
            out_root: self.out_root.clone(),
            sbid: self.sbid.clone(),
        };
        let summary = plan_and_run(
            "concat",
            &self.inputs.targets(),
            ctx.dry_run,
            |target| {
                let scans = self.inputs.resolve(target)?;
                let Some(first) = scans.first() else {
                    return Ok(None);
                };
                // The output is named after the earliest scan.
                let output = derive_output_name(first, &tag)?;
                info!("{target}: {} scans -> {}", scans.len(), output.display());
                for scan in &scans {
                    info!("  {}", scan.display());
                }
                Ok(Some((scans, output)))
            },
            |_, (scans, output)| {
                create_parent_dir(&output)?;
                ctx.run_task(TaskCall::concat(&scans, &output))?;
                ensure_container(&output)?;
                Ok(())
            },
        )?;

        if !ctx.dry_run && summary.processed == 0 && summary.failed == 0 {
            warn!("Nothing was concatenated");
            return Ok(RunStatus::NothingDone);
        }
        Ok(summary.status())
    }
}
