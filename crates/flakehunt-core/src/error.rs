//! Error types shared by the router and the supervisor.

use std::ffi::OsStr;
use std::io;
use std::num::ParseIntError;

use thiserror::Error;

/// The invocation could not be turned into a runnable configuration.
///
/// Every variant is reported before any child process is spawned.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Number of iterations is invalid: {value}")]
    InvalidIterations { value: String },

    #[error("Failed to parse number of iterations: {value}: {source}")]
    IterationsOutOfRange {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("missing required argument: test")]
    MissingTest,

    #[error("test program must not be empty")]
    EmptyProgram,
}

/// Which step of starting a trial went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnStage {
    /// The OS could not create a new process at all.
    Create,
    /// A process was created but the program image could not be executed.
    Exec,
    /// The child was started but its exit status could not be collected.
    Wait,
}

/// A trial could not be run to completion.
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("failed to create child process: {source}")]
    Create {
        #[source]
        source: io::Error,
    },

    #[error("failed to start test process {program:?}: {source}")]
    Exec {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for test process {program:?}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl SpawnError {
    /// Sort a failed `spawn()` into the creation or exec channel.
    ///
    /// Errors that describe the program image (missing, not executable,
    /// not a regular file, argument list too long) belong to the exec
    /// step. Everything else means the process-creation facility itself
    /// is broken.
    pub fn from_spawn(program: impl AsRef<OsStr>, source: io::Error) -> Self {
        if is_exec_failure(&source) {
            Self::Exec {
                program: program.as_ref().to_string_lossy().into_owned(),
                source,
            }
        } else {
            Self::Create { source }
        }
    }

    pub fn stage(&self) -> SpawnStage {
        match self {
            Self::Create { .. } => SpawnStage::Create,
            Self::Exec { .. } => SpawnStage::Exec,
            Self::Wait { .. } => SpawnStage::Wait,
        }
    }

    /// A started child whose exit status could not be collected.
    pub fn from_wait(program: impl AsRef<OsStr>, source: io::Error) -> Self {
        Self::Wait {
            program: program.as_ref().to_string_lossy().into_owned(),
            source,
        }
    }
}

fn is_exec_failure(err: &io::Error) -> bool {
    use io::ErrorKind;

    if matches!(
        err.kind(),
        ErrorKind::NotFound | ErrorKind::PermissionDenied | ErrorKind::InvalidInput
    ) {
        return true;
    }

    #[cfg(unix)]
    if let Some(code) = err.raw_os_error() {
        return matches!(
            code,
            libc::ENOEXEC
                | libc::E2BIG
                | libc::ENOTDIR
                | libc::EISDIR
                | libc::ETXTBSY
                | libc::ELOOP
                | libc::ENAMETOOLONG
        );
    }

    false
}
