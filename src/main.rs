// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The main msflow binary.

use clap::Parser;

use askap_msflow::{Msflow, RunStatus};

// Exit statuses other than success and an error's own.
const EXIT_BEAMS_FAILED: i32 = 2;

fn main() {
    // Stolen from BurntSushi. We don't return Result from main because it
    // prints the debug representation of the error. The code below prints the
    // "display" or human readable representation of the error.
    let code = match Msflow::parse().run() {
        Ok(RunStatus::Success) => 0,
        Ok(RunStatus::BeamsFailed { .. } | RunStatus::NothingDone) => EXIT_BEAMS_FAILED,
        Err(e) => {
            eprintln!("Error: {e}");
            e.exit_code()
        }
    };
    std::process::exit(code);
}
