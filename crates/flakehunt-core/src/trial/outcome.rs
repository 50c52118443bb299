use std::fmt;
use std::process::ExitStatus;

use crate::error::SpawnError;

/// How a single trial ended.
#[derive(Debug)]
pub enum TrialOutcome {
    /// The child exited with status code 0.
    Succeeded,
    /// The child exited normally with a non-zero code.
    FailedExit(i32),
    /// The child was terminated abnormally. Holds the signal number when
    /// the platform reports one.
    FailedSignal(Option<i32>),
    /// The child could not be created, started, or reaped.
    SpawnError(SpawnError),
}

impl TrialOutcome {
    /// Classify the exit status of a reaped child.
    pub fn from_status(status: ExitStatus) -> Self {
        match status.code() {
            Some(0) => Self::Succeeded,
            Some(code) => Self::FailedExit(code),
            None => Self::FailedSignal(termination_signal(&status)),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl fmt::Display for TrialOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => write!(f, "succeeded"),
            Self::FailedExit(code) => write!(f, "exited with code {code}"),
            Self::FailedSignal(Some(signal)) => write!(f, "terminated by signal {signal}"),
            Self::FailedSignal(None) => write!(f, "terminated abnormally"),
            Self::SpawnError(err) => write!(f, "{err}"),
        }
    }
}

impl From<SpawnError> for TrialOutcome {
    fn from(err: SpawnError) -> Self {
        Self::SpawnError(err)
    }
}

#[cfg(unix)]
fn termination_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn termination_signal(_status: &ExitStatus) -> Option<i32> {
    None
}
