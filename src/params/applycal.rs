// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use log::info;

use super::{beams::plan_and_run, Inputs, RunStatus, StageContext, StageError, Target};
use crate::{
    casa::{ApplycalArgs, CasaTask, TaskCall},
    io::find_caltable,
    lineage::{derive_output_name, supersede, validate_generation, CalExtension, StageTag},
};

/// Apply each beam's calibration table, then split the corrected data into
/// the next generation.
pub(crate) struct ApplycalParams {
    pub(crate) sbid: String,
    pub(crate) data_root: PathBuf,
    pub(crate) pattern: String,
    pub(crate) beams: Vec<u8>,

    /// Where calibration tables are, relative to `data_root/sbid`.
    pub(crate) cal_dir: PathBuf,
    pub(crate) extension: CalExtension,
    pub(crate) delete_previous: bool,
}

struct BeamPlan {
    caltable: PathBuf,
    pairs: Vec<(PathBuf, PathBuf)>,
}

impl ApplycalParams {
    pub(crate) fn run(&self, ctx: &StageContext) -> Result<RunStatus, StageError> {
        ctx.ensure_available(&[CasaTask::Applycal, CasaTask::Split])?;

        let inputs = Inputs::Beams {
            sbid: self.sbid.clone(),
            data_root: self.data_root.clone(),
            pattern: self.pattern.clone(),
            beams: self.beams.clone(),
        };
        let summary = plan_and_run(
            "applycal",
            &inputs.targets(),
            ctx.dry_run,
            |target| {
                let Target::Beam(beam) = target else {
                    return Ok(None);
                };
                let mss = inputs.resolve(target)?;
                if mss.is_empty() {
                    return Ok(None);
                }
                let caltable = self.caltable(*beam)?;
                info!("{target}: caltable {}", caltable.display());

                let mut pairs = vec![];
                for ms in mss {
                    let output =
                        derive_output_name(&ms, &StageTag::Calibrated(self.extension.clone()))?;
                    info!("  {} -> {}", ms.display(), output.display());
                    pairs.push((ms, output));
                }
                Ok(Some(BeamPlan { caltable, pairs }))
            },
            |target, BeamPlan { caltable, pairs }| {
                for (ms, output) in pairs {
                    self.apply(ctx, &ms, &caltable)?;
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

    fn caltable(&self, beam: u8) -> Result<PathBuf, StageError> {
        find_caltable(
            &self.data_root,
            &self.sbid,
            &self.cal_dir,
            beam,
            self.extension.as_str(),
        )
        .map_err(StageError::NoCaltable)
    }

    /// Bandpass tables are interpolated in time with the nearest solution,
    /// everything else linearly.
    fn apply(&self, ctx: &StageContext, ms: &Path, caltable: &Path) -> Result<(), StageError> {
        let time_interp = if self.extension.is_bandpass() {
            "nearest"
        } else {
            "linear"
        };
        ctx.run_task(TaskCall::Applycal(ApplycalArgs {
            vis: ms.to_path_buf(),
            gaintable: vec![caltable.to_path_buf()],
            interp: vec![time_interp.to_string(), "linear".to_string()],
            ..Default::default()
        }))
    }
}
