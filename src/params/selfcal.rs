// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use log::info;
use vec1::Vec1;

use super::{
    beams::{create_parent_dir, plan_and_run},
    Inputs, RunStatus, StageContext, StageError,
};
use crate::{
    casa::{ApplycalArgs, CasaTask, GaincalArgs, TaskCall},
    lineage::{ensure_container, supersede, validate_generation},
    selfcal::{SelfCalError, SelfCalState},
};

/// Phase (or amplitude and phase) self-calibration.
pub(crate) struct SelfCalParams {
    /// Externally calibrated measurement sets (e.g. "*.calB0.ms").
    pub(crate) inputs: Inputs,

    /// The iteration to start at.
    pub(crate) index: i64,

    /// One iteration is run per solution interval, in order.
    pub(crate) solints: Vec1<String>,

    pub(crate) gaincal: GaincalOptions,
    pub(crate) caltable_prefix: String,
    pub(crate) apply_calwt: bool,
    pub(crate) delete_previous: bool,
}

/// Options handed straight to `gaincal` (and some to `applycal`).
pub(crate) struct GaincalOptions {
    pub(crate) field: String,
    pub(crate) spw: String,
    pub(crate) calmode: String,
    pub(crate) refant: String,
    pub(crate) combine: String,
    pub(crate) minsnr: f64,
    pub(crate) parang: bool,
}

struct Iteration {
    state: SelfCalState,
    caltable: PathBuf,
    solint: String,
}

impl SelfCalParams {
    pub(crate) fn run(&self, ctx: &StageContext) -> Result<RunStatus, StageError> {
        if self.index < 1 {
            return Err(SelfCalError::InvalidIndex(self.index).into());
        }
        ctx.ensure_available(&[CasaTask::Gaincal, CasaTask::Applycal, CasaTask::Split])?;

        let summary = plan_and_run(
            "selfcal",
            &self.inputs.targets(),
            ctx.dry_run,
            |target| {
                let mut iterations = vec![];
                for base in self.inputs.resolve(target)? {
                    let mut state = SelfCalState::new(&base, self.index)?;
                    if !ctx.dry_run {
                        state.ensure_model_data(ctx.reader)?;
                    }
                    for (i, solint) in self.solints.iter().enumerate() {
                        if i > 0 {
                            state.advance()?;
                        }
                        let caltable = state.caltable(&self.caltable_prefix, solint)?;
                        info!(
                            "{target}: iteration {} ({solint}): {} -> {}",
                            state.index(),
                            state.input().display(),
                            state.output().display()
                        );
                        iterations.push(Iteration {
                            state: state.clone(),
                            caltable,
                            solint: solint.clone(),
                        });
                    }
                }
                Ok((!iterations.is_empty()).then_some(iterations))
            },
            |target, iterations| {
                for it in iterations {
                    self.iterate(ctx, &it)?;
                    info!(
                        "{target}: iteration {} complete: {}",
                        it.state.index(),
                        it.state.output().display()
                    );
                }
                Ok(())
            },
        )?;
        Ok(summary.status())
    }

    /// Solve for gains from the input generation, apply them, and split the
    /// corrected data into the output generation.
    fn iterate(&self, ctx: &StageContext, it: &Iteration) -> Result<(), StageError> {
        let Iteration {
            state,
            caltable,
            solint,
        } = it;
        let g = &self.gaincal;
        state.check_preconditions()?;

        create_parent_dir(caltable)?;
        ctx.run_task(TaskCall::Gaincal(GaincalArgs {
            vis: state.input().to_path_buf(),
            caltable: caltable.clone(),
            field: g.field.clone(),
            spw: g.spw.clone(),
            solint: solint.clone(),
            combine: g.combine.clone(),
            refant: g.refant.clone(),
            minsnr: g.minsnr,
            gaintype: "G".to_string(),
            calmode: g.calmode.clone(),
            parang: g.parang,
        }))?;
        ensure_container(caltable)?;

        ctx.run_task(TaskCall::Applycal(ApplycalArgs {
            vis: state.input().to_path_buf(),
            field: Some(g.field.clone()),
            spw: Some(g.spw.clone()),
            gaintable: vec![caltable.clone()],
            gainfield: Some(vec![String::new()]),
            interp: vec!["linear,nearest".to_string()],
            calwt: Some(vec![self.apply_calwt]),
            parang: Some(g.parang),
            flagbackup: Some(true),
        }))?;
        ctx.run_task(TaskCall::split_corrected(state.input(), state.output()))?;

        let rows = validate_generation(ctx.reader, state.input(), state.output())?;
        info!("{} validated ({rows} rows)", state.output().display());
        // The first iteration's input is the externally calibrated base; it
        // is never removed.
        if self.delete_previous && state.index().get() >= 2 {
            supersede(state.input())?;
        }
        Ok(())
    }
}
