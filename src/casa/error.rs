// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with running CASA tasks.

use thiserror::Error;

use super::CasaTask;

#[derive(Error, Debug)]
pub enum CasaError {
    #[error("casatasks ({tasks}) not available via '{python}': {reason}")]
    Unavailable {
        python: String,
        tasks: String,
        reason: String,
    },

    #[error("CASA task '{task}' failed ({status}): {stderr}")]
    TaskFailed {
        task: CasaTask,
        status: String,
        stderr: String,
    },

    #[error("Couldn't start '{python}' to run CASA task '{task}': {err}")]
    Spawn {
        python: String,
        task: CasaTask,
        #[source]
        err: std::io::Error,
    },

    #[error("Couldn't encode the arguments of CASA task '{task}': {err}")]
    Kwargs {
        task: CasaTask,
        #[source]
        err: serde_json::Error,
    },
}
