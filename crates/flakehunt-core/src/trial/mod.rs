//! Trial loop: run a command up to N times, stopping at the first failure.
//!
//! Trials are strictly sequential. The loop awaits each child's
//! termination before starting the next, so at most one child exists at
//! any time and the only suspension point is the wait inside
//! [`Launcher::launch`].

pub mod launcher;
pub mod outcome;

use tracing::{Instrument, debug, info, info_span};

use crate::command::{CommandSpec, RunConfig};

use self::launcher::Launcher;
use self::outcome::TrialOutcome;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Summary of a whole run.
#[derive(Debug)]
pub struct RunResult {
    /// Number of trials that were started. On failure this is the 1-based
    /// number of the failing trial.
    pub attempts_completed: u64,
    /// Outcome of the last trial, or [`TrialOutcome::Succeeded`] when no
    /// trial ran.
    pub final_outcome: TrialOutcome,
}

impl RunResult {
    pub fn is_success(&self) -> bool {
        self.final_outcome.is_success()
    }
}

/// Receives progress notifications from the trial loop.
///
/// Both methods default to no-ops.
pub trait TrialObserver {
    /// Called right before trial `attempt` is spawned.
    fn attempt_started(&mut self, _attempt: u64) {}

    /// Called once trial `attempt` has terminated and been classified.
    fn attempt_finished(&mut self, _attempt: u64, _outcome: &TrialOutcome) {}
}

impl TrialObserver for () {}

// ---------------------------------------------------------------------------
// TrialLoop
// ---------------------------------------------------------------------------

/// Supervises repeated runs of a single [`CommandSpec`].
pub struct TrialLoop<L> {
    launcher: L,
    spec: CommandSpec,
    config: RunConfig,
}

impl<L: Launcher> TrialLoop<L> {
    pub fn new(launcher: L, spec: CommandSpec, config: RunConfig) -> Self {
        Self {
            launcher,
            spec,
            config,
        }
    }

    /// Run trials until one fails or the iteration limit is reached.
    ///
    /// A limit of zero or less spawns nothing and counts as success.
    pub async fn run(&self, observer: &mut dyn TrialObserver) -> RunResult {
        let budget = self.config.trial_budget();
        let mut attempt = 0;
        let mut outcome = TrialOutcome::Succeeded;

        while attempt < budget {
            attempt += 1;
            let span = info_span!("trial", attempt, program = ?self.spec.program());

            observer.attempt_started(attempt);
            outcome = self.launcher.launch(&self.spec).instrument(span).await;
            observer.attempt_finished(attempt, &outcome);

            if !outcome.is_success() {
                info!(attempt, %outcome, "trial failed");
                break;
            }
            debug!(attempt, "trial succeeded");
        }

        RunResult {
            attempts_completed: attempt,
            final_outcome: outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::{SpawnError, SpawnStage};

    /// Launcher that replays a script of outcomes and counts spawns.
    /// Once the script runs out every launch succeeds.
    #[derive(Default)]
    struct ScriptedLauncher {
        script: Mutex<VecDeque<TrialOutcome>>,
        launches: AtomicU64,
    }

    impl ScriptedLauncher {
        fn failing_at(attempt: u64, failure: TrialOutcome) -> Self {
            let mut script: VecDeque<TrialOutcome> =
                (1..attempt).map(|_| TrialOutcome::Succeeded).collect();
            script.push_back(failure);
            Self {
                script: Mutex::new(script),
                launches: AtomicU64::new(0),
            }
        }

        fn launches(&self) -> u64 {
            self.launches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Launcher for ScriptedLauncher {
        async fn launch(&self, _spec: &CommandSpec) -> TrialOutcome {
            self.launches.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(TrialOutcome::Succeeded)
        }
    }

    /// Records the observer callbacks as strings.
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl TrialObserver for Recorder {
        fn attempt_started(&mut self, attempt: u64) {
            self.events.push(format!("start {attempt}"));
        }

        fn attempt_finished(&mut self, attempt: u64, outcome: &TrialOutcome) {
            self.events.push(format!("end {attempt}: {outcome}"));
        }
    }

    fn spec() -> CommandSpec {
        CommandSpec::new("test-program").unwrap()
    }

    #[tokio::test]
    async fn zero_limit_spawns_nothing_and_succeeds() {
        let launcher = ScriptedLauncher::default();
        let trials = TrialLoop::new(&launcher, spec(), RunConfig::new(0));

        let result = trials.run(&mut ()).await;

        assert_eq!(launcher.launches(), 0);
        assert_eq!(result.attempts_completed, 0);
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn negative_limit_is_vacuous_success() {
        let launcher = ScriptedLauncher::default();
        let trials = TrialLoop::new(&launcher, spec(), RunConfig::new(-5));

        let result = trials.run(&mut ()).await;

        assert_eq!(launcher.launches(), 0);
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn always_passing_runs_exactly_limit_times() {
        let launcher = ScriptedLauncher::default();
        let trials = TrialLoop::new(&launcher, spec(), RunConfig::new(7));

        let result = trials.run(&mut ()).await;

        assert_eq!(launcher.launches(), 7);
        assert_eq!(result.attempts_completed, 7);
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn stops_at_first_failure() {
        let launcher = ScriptedLauncher::failing_at(4, TrialOutcome::FailedExit(2));
        let trials = TrialLoop::new(&launcher, spec(), RunConfig::new(10));

        let result = trials.run(&mut ()).await;

        assert_eq!(launcher.launches(), 4);
        assert_eq!(result.attempts_completed, 4);
        assert!(matches!(result.final_outcome, TrialOutcome::FailedExit(2)));
        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn failure_on_last_allowed_attempt_is_reported() {
        let launcher = ScriptedLauncher::failing_at(3, TrialOutcome::FailedSignal(Some(9)));
        let trials = TrialLoop::new(&launcher, spec(), RunConfig::new(3));

        let result = trials.run(&mut ()).await;

        assert_eq!(launcher.launches(), 3);
        assert_eq!(result.attempts_completed, 3);
        assert!(matches!(result.final_outcome, TrialOutcome::FailedSignal(Some(9))));
    }

    #[tokio::test]
    async fn spawn_error_ends_the_loop() {
        let err = SpawnError::from_spawn("x", std::io::Error::from(std::io::ErrorKind::NotFound));
        let launcher = ScriptedLauncher::failing_at(1, err.into());
        let trials = TrialLoop::new(&launcher, spec(), RunConfig::new(5));

        let result = trials.run(&mut ()).await;

        assert_eq!(launcher.launches(), 1);
        assert_eq!(result.attempts_completed, 1);
        match result.final_outcome {
            TrialOutcome::SpawnError(err) => assert_eq!(err.stage(), SpawnStage::Exec),
            other => panic!("expected spawn error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn reap_failure_ends_the_loop_at_current_attempt() {
        let err = SpawnError::from_wait("x", std::io::Error::other("no child to reap"));
        let launcher = ScriptedLauncher::failing_at(3, err.into());
        let trials = TrialLoop::new(&launcher, spec(), RunConfig::new(6));
        let mut recorder = Recorder::default();

        let result = trials.run(&mut recorder).await;

        assert_eq!(launcher.launches(), 3);
        assert_eq!(result.attempts_completed, 3);
        assert!(!result.is_success());
        match result.final_outcome {
            TrialOutcome::SpawnError(err) => assert_eq!(err.stage(), SpawnStage::Wait),
            other => panic!("expected spawn error, got {other:?}"),
        }
        assert_eq!(
            recorder.events.last().map(String::as_str),
            Some("end 3: failed to wait for test process \"x\": no child to reap")
        );
    }

    #[tokio::test]
    async fn observer_sees_every_attempt_in_order() {
        let launcher = ScriptedLauncher::failing_at(2, TrialOutcome::FailedExit(1));
        let trials = TrialLoop::new(&launcher, spec(), RunConfig::new(5));
        let mut recorder = Recorder::default();

        trials.run(&mut recorder).await;

        assert_eq!(
            recorder.events,
            [
                "start 1",
                "end 1: succeeded",
                "start 2",
                "end 2: exited with code 1",
            ]
        );
    }
}
