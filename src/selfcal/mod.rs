// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The self-calibration index.
//!
//! Iteration `k` reads generation `k - 1` (iteration 1 reads the externally
//! calibrated measurement set, the "base") and writes generation `k`. Nothing
//! here decides when to stop; callers advance the state for as long as they
//! have solution intervals to use.

mod error;

pub use error::SelfCalError;

use std::{
    num::NonZeroU32,
    path::{Path, PathBuf},
};

use crate::{
    constants::MODEL_DATA_COL,
    io::MsTableRead,
    lineage::{selfcal_caltable_name, selfcal_generation_names},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfCalState {
    base: PathBuf,
    index: NonZeroU32,
    input: PathBuf,
    output: PathBuf,
}

impl SelfCalState {
    /// Start at iteration `index` of the chain rooted at `base`. Indices less
    /// than 1, and bases that can't be named from, are rejected before
    /// anything is run.
    pub fn new(base: &Path, index: i64) -> Result<SelfCalState, SelfCalError> {
        let index = u32::try_from(index)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or(SelfCalError::InvalidIndex(index))?;
        let (input, output) = selfcal_generation_names(base, index)?;
        Ok(SelfCalState {
            base: base.to_path_buf(),
            index,
            input,
            output,
        })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn index(&self) -> NonZeroU32 {
        self.index
    }

    /// The generation this iteration reads.
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// The generation this iteration writes.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// The gain table this iteration solves for.
    pub fn caltable(&self, prefix: &str, solint: &str) -> Result<PathBuf, SelfCalError> {
        Ok(selfcal_caltable_name(&self.base, self.index, prefix, solint)?)
    }

    /// The first iteration divides by the model, so it must be there. Later
    /// iterations read a split of the first, which carries the model along.
    pub fn ensure_model_data(&self, reader: &dyn MsTableRead) -> Result<(), SelfCalError> {
        if self.index.get() == 1 && !reader.has_column(&self.input, MODEL_DATA_COL)? {
            return Err(SelfCalError::NoModelData(self.input.clone()));
        }
        Ok(())
    }

    /// The input must exist and the output must not; a generation is never
    /// overwritten.
    pub fn check_preconditions(&self) -> Result<(), SelfCalError> {
        if !self.input.exists() {
            return Err(SelfCalError::InputMissing {
                index: self.index.get(),
                path: self.input.clone(),
            });
        }
        if self.output.exists() {
            return Err(SelfCalError::OutputExists {
                index: self.index.get(),
                path: self.output.clone(),
            });
        }
        Ok(())
    }

    /// Move to the next iteration. The output of this iteration becomes the
    /// input of the next.
    pub fn advance(&mut self) -> Result<(), SelfCalError> {
        let next = self
            .index
            .checked_add(1)
            .ok_or(SelfCalError::IndexOverflow)?;
        let (input, output) = selfcal_generation_names(&self.base, next)?;
        debug_assert_eq!(input, self.output);
        self.index = next;
        self.input = input;
        self.output = output;
        Ok(())
    }
}
