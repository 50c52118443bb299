//! Operator-facing progress output.
//!
//! Progress lines go to stdout; failure details go to stderr. Write errors
//! (e.g. a closed pipe) are ignored so they never abort a run midway.

use std::io::{self, Write};

use flakehunt_core::{RunResult, TrialObserver, TrialOutcome};

pub struct ConsoleReporter<O, E> {
    out: O,
    err: E,
}

impl ConsoleReporter<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> ConsoleReporter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    /// Print the final line for the run.
    pub fn summary(&mut self, result: &RunResult) {
        if result.is_success() {
            let _ = writeln!(
                self.out,
                "successfully completed {} executions.",
                result.attempts_completed
            );
        } else {
            let _ = writeln!(
                self.out,
                "program failed on execution {}",
                result.attempts_completed
            );
        }
        let _ = self.out.flush();
    }

    #[cfg(test)]
    fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> TrialObserver for ConsoleReporter<O, E> {
    fn attempt_started(&mut self, attempt: u64) {
        let _ = writeln!(self.out, "run execution nr. {attempt}");
        // The child shares our stdout; get our line out before it writes.
        let _ = self.out.flush();
    }

    fn attempt_finished(&mut self, attempt: u64, outcome: &TrialOutcome) {
        match outcome {
            TrialOutcome::Succeeded => {
                let _ = writeln!(self.out, "execution nr. {attempt} was successful.");
            }
            TrialOutcome::FailedExit(_) | TrialOutcome::FailedSignal(_) => {
                let _ = writeln!(self.err, "execution nr. {attempt} {outcome}");
            }
            TrialOutcome::SpawnError(err) => {
                let _ = writeln!(self.err, "{err}");
            }
        }
    }
}
