//! Spawning one trial and waiting for it.
//!
//! The [`Launcher`] trait is the seam between the trial loop and the OS:
//! the loop only ever sees a [`TrialOutcome`], so tests can script
//! outcomes without touching real processes.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::command::CommandSpec;
use crate::error::SpawnError;

use super::outcome::TrialOutcome;

/// Runs a [`CommandSpec`] once, to completion.
///
/// Implementations must not return until the child (if one was created)
/// has terminated and been reaped.
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(&self, spec: &CommandSpec) -> TrialOutcome;
}

/// Launches the program as a real child process.
///
/// The child inherits the environment, working directory and standard
/// streams of the runner. Bare program names are resolved through `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    fn command(spec: &CommandSpec) -> Command {
        let mut command = Command::new(spec.program());
        command.args(spec.arguments());
        #[cfg(unix)]
        command.arg0(spec.program());
        command
    }
}

#[async_trait]
impl Launcher for ProcessLauncher {
    async fn launch(&self, spec: &CommandSpec) -> TrialOutcome {
        let mut child = match Self::command(spec).spawn() {
            Ok(child) => child,
            Err(source) => return SpawnError::from_spawn(spec.program(), source).into(),
        };
        debug!(pid = ?child.id(), argv = ?spec.argv(), "spawned trial");

        match child.wait().await {
            Ok(status) => TrialOutcome::from_status(status),
            Err(source) => SpawnError::from_wait(spec.program(), source).into(),
        }
    }
}

#[async_trait]
impl<T: Launcher + ?Sized> Launcher for &T {
    async fn launch(&self, spec: &CommandSpec) -> TrialOutcome {
        (**self).launch(spec).await
    }
}

// Compile-time assertion: Launcher must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn Launcher) {}
};
