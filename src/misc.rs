// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Miscellaneous things.

use std::{thread, time::Duration};

use console::Term;
use crossbeam_channel::{bounded, RecvTimeoutError};
use is_terminal::IsTerminal;

const INITIAL_WAIT_TIME: Duration = Duration::from_secs(2);
const INC_WAIT_TIME: Duration = Duration::from_millis(250);

fn is_a_tty() -> bool {
    std::io::stdout().is_terminal() || std::io::stderr().is_terminal()
}

/// A single line on stderr that gets rewritten with how long we've been
/// waiting.
struct WaitLine {
    term: Term,
    printed: bool,
}

impl WaitLine {
    fn update(&mut self, message: &str, waited: Duration) {
        // Terminal errors only affect cosmetics; ignore them.
        self.clear();
        let _ = self
            .term
            .write_line(&format!("{message}: {:.2}s", waited.as_secs_f64()));
        self.printed = true;
    }

    fn clear(&mut self) {
        if self.printed {
            let _ = self.term.move_cursor_up(1);
            let _ = self.term.clear_line();
            self.printed = false;
        }
    }
}

/// Perform this expensive operation as a normal Rust function, but if it takes
/// more than a certain amount of time, display a message to the user that
/// you're still waiting for this operation to complete. Nothing is displayed
/// unless we're attached to a terminal.
pub(crate) fn expensive_op<F, R>(func: F, wait_message: &str) -> R
where
    F: FnOnce() -> R + Send,
    R: Send,
{
    let (tx, rx) = bounded(1);

    thread::scope(|s| {
        let handle = s.spawn(move || {
            let r = func();
            // The receiver outlives this thread.
            let _ = tx.send(r);
        });

        let mut line = is_a_tty().then(|| WaitLine {
            term: Term::stderr(),
            printed: false,
        });
        let mut waited = Duration::ZERO;
        loop {
            match rx.recv_timeout(INC_WAIT_TIME) {
                Ok(r) => {
                    if let Some(line) = line.as_mut() {
                        line.clear();
                    }
                    return r;
                }

                Err(RecvTimeoutError::Timeout) => {
                    waited += INC_WAIT_TIME;
                    if let Some(line) = line.as_mut() {
                        if waited >= INITIAL_WAIT_TIME {
                            line.update(wait_message, waited);
                        }
                    }
                }

                // The sender is only dropped without sending if `func`
                // panicked; pass the panic on.
                Err(RecvTimeoutError::Disconnected) => match handle.join() {
                    Err(payload) => std::panic::resume_unwind(payload),
                    Ok(()) => unreachable!("the worker always sends before finishing"),
                },
            }
        }
    })
}
