// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use log::info;

use super::{beams::plan_and_run, Inputs, RunStatus, StageContext, StageError, Target};
use crate::{
    casa::{CasaTask, TaskCall},
    lineage::{derive_output_name, ensure_container, StageTag},
};

/// Convert uvfits files into measurement sets next to them.
pub(crate) struct ImportParams {
    pub(crate) inputs: Inputs,

    /// With explicit files, only import the file at this position in their
    /// sorted list (one array job per file).
    pub(crate) array_index: Option<usize>,
}

impl ImportParams {
    pub(crate) fn run(&self, ctx: &StageContext) -> Result<RunStatus, StageError> {
        ctx.ensure_available(&[CasaTask::ImportUvfits])?;

        let inputs = match (&self.inputs, self.array_index) {
            (Inputs::Explicit(files), Some(index)) => {
                let mut files = files.clone();
                files.sort();
                let file = files
                    .get(index)
                    .ok_or(StageError::ArrayIndexOutOfRange {
                        index,
                        num_files: files.len(),
                    })?
                    .clone();
                Inputs::Explicit(vec![file])
            }
            (inputs, _) => inputs.clone(),
        };

        let summary = plan_and_run(
            "import",
            &inputs.targets(),
            ctx.dry_run,
            |target: &Target| {
                let mut pairs: Vec<(PathBuf, PathBuf)> = vec![];
                for uvfits in inputs.resolve(target)? {
                    let ms = derive_output_name(&uvfits, &StageTag::Raw)?;
                    if ms.exists() {
                        info!("MS already exists: {}", ms.display());
                        continue;
                    }
                    info!("{target}: {} -> {}", uvfits.display(), ms.display());
                    pairs.push((uvfits, ms));
                }
                Ok((!pairs.is_empty()).then_some(pairs))
            },
            |_, pairs| {
                for (uvfits, ms) in pairs {
                    ctx.run_task(TaskCall::import_uvfits(&uvfits, &ms))?;
                    ensure_container(&ms)?;
                }
                Ok(())
            },
        )?;
        Ok(summary.status())
    }
}
