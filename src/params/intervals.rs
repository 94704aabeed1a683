// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! How many imaging intervals a measurement set splits into, e.g. for
//! `wsclean -intervals-out`.

use std::path::PathBuf;

use hifitime::{Duration, Epoch, Unit};
use thiserror::Error;

use crate::io::{MsReadError, MsTableRead};

pub(crate) struct IntervalsParams {
    pub(crate) ms: PathBuf,

    /// The imaging timestep [seconds]. Without one, every timestep is an
    /// interval.
    pub(crate) timestep: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct IntervalsReport {
    /// The number of unique timestamps.
    pub(crate) num_timesteps: usize,

    /// The median spacing of unique timestamps.
    pub(crate) sampling: Duration,

    pub(crate) first: Epoch,
    pub(crate) last: Epoch,
    pub(crate) intervals: usize,

    /// The duration of the observation divided by the number of intervals.
    pub(crate) effective_timestep: Duration,
}

impl IntervalsParams {
    pub(crate) fn run(&self, reader: &dyn MsTableRead) -> Result<IntervalsReport, IntervalsError> {
        if let Some(t) = self.timestep {
            if t.is_nan() || t <= 0.0 {
                return Err(IntervalsError::BadTimestep(t));
            }
        }

        let mut times = reader.times(&self.ms)?;
        times.sort_unstable_by(|a, b| a.total_cmp(b));
        times.dedup();
        let (first, last) = match (times.first(), times.last()) {
            (Some(f), Some(l)) => (*f, *l),
            _ => return Err(MsReadError::NoTimesteps(self.ms.clone()).into()),
        };

        let diffs: Vec<f64> = times.windows(2).map(|w| w[1] - w[0]).collect();
        let duration = last - first;
        let intervals = match self.timestep {
            None => times.len(),
            Some(t) => ((duration / t).round() as usize).max(1),
        };

        Ok(IntervalsReport {
            num_timesteps: times.len(),
            sampling: Duration::from_f64(median(diffs), Unit::Second),
            first: mjd_seconds_to_epoch(first),
            last: mjd_seconds_to_epoch(last),
            intervals,
            effective_timestep: Duration::from_f64(duration / intervals as f64, Unit::Second),
        })
    }
}

/// Measurement set times are UTC MJD in seconds.
fn mjd_seconds_to_epoch(s: f64) -> Epoch {
    Epoch::from_mjd_utc(s / 86400.0)
}

/// The median of some values; zero if there aren't any.
fn median(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_unstable_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

#[derive(Error, Debug)]
pub(crate) enum IntervalsError {
    #[error("Imaging timestep must be positive, got {0}")]
    BadTimestep(f64),

    #[error(transparent)]
    MsRead(#[from] MsReadError),
}
