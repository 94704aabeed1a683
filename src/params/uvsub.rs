// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use log::info;

use super::{beams::plan_and_run, Inputs, RunStatus, StageContext, StageError};
use crate::{
    casa::{CasaTask, TaskCall},
    lineage::{derive_output_name, supersede, validate_generation, StageTag},
    selfcal::{SelfCalError, SelfCalState},
};

/// Subtract the model from measurement sets, and split the residuals into a
/// new generation.
pub(crate) struct UvsubParams {
    pub(crate) inputs: Inputs,

    /// If given, the inputs are self-cal bases, and the output of this
    /// self-cal iteration is used instead of the base.
    pub(crate) index: Option<i64>,

    pub(crate) label: String,
    pub(crate) delete_previous: bool,
}

impl UvsubParams {
    pub(crate) fn run(&self, ctx: &StageContext) -> Result<RunStatus, StageError> {
        if let Some(index) = self.index {
            if index < 1 {
                return Err(SelfCalError::InvalidIndex(index).into());
            }
        }
        ctx.ensure_available(&[CasaTask::Uvsub, CasaTask::Split])?;

        let summary = plan_and_run(
            "uvsub",
            &self.inputs.targets(),
            ctx.dry_run,
            |target| {
                let mut pairs: Vec<(PathBuf, PathBuf)> = vec![];
                for ms in self.inputs.resolve(target)? {
                    let ms = match self.index {
                        Some(index) => SelfCalState::new(&ms, index)?.output().to_path_buf(),
                        None => ms,
                    };
                    let output = derive_output_name(&ms, &StageTag::UvSub(self.label.clone()))?;
                    info!("{target}: {} -> {}", ms.display(), output.display());
                    pairs.push((ms, output));
                }
                Ok((!pairs.is_empty()).then_some(pairs))
            },
            |target, pairs| {
                for (ms, output) in pairs {
                    ctx.run_task(TaskCall::uvsub(&ms))?;
                    ctx.run_task(TaskCall::split_corrected(&ms, &output))?;
                    let rows = validate_generation(ctx.reader, &ms, &output)?;
                    info!("{target}: {} validated ({rows} rows)", output.display());
                    if self.delete_previous {
                        supersede(&ms)?;
                    }
                }
                Ok(())
            },
        )?;
        Ok(summary.status())
    }
}
