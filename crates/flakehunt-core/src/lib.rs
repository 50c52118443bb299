//! Core of `flakehunt`: turn an invocation into a [`CommandSpec`] and run it
//! in a loop until it fails.
//!
//! The CLI crate owns argument parsing and console output; everything that
//! decides *what* runs and *how a run is judged* lives here.

pub mod command;
pub mod error;
pub mod trial;

pub use command::{CommandSpec, DEFAULT_ITERATIONS, RunConfig, parse_iterations};
pub use error::{ConfigError, SpawnError, SpawnStage};
pub use trial::launcher::{Launcher, ProcessLauncher};
pub use trial::outcome::TrialOutcome;
pub use trial::{RunResult, TrialLoop, TrialObserver};
