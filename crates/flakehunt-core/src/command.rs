//! The argument router's output: what to run and how many times.

use std::ffi::{OsStr, OsString};
use std::num::IntErrorKind;

use crate::error::ConfigError;

/// Number of trials when the operator does not pass `--iterations`.
pub const DEFAULT_ITERATIONS: i64 = 10;

// -----------------------------------------------------------------------
// CommandSpec
// -----------------------------------------------------------------------

/// The program under test plus the arguments forwarded to it.
///
/// Tokens are kept as `OsString` so bytes that are not valid UTF-8 reach
/// the child unchanged. Fixed for the whole run. Build it with
/// [`CommandSpec::new`] and [`CommandSpec::args`], or from the raw
/// positional tokens with [`CommandSpec::from_tokens`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: OsString,
    arguments: Vec<OsString>,
}

impl CommandSpec {
    /// Create a spec with no forwarded arguments.
    pub fn new(program: impl Into<OsString>) -> Result<Self, ConfigError> {
        let program = program.into();
        if program.is_empty() {
            return Err(ConfigError::EmptyProgram);
        }
        Ok(Self {
            program,
            arguments: Vec::new(),
        })
    }

    /// Append forwarded arguments, keeping their order.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.arguments.extend(args.into_iter().map(Into::into));
        self
    }

    /// Split positional tokens into the program and its arguments.
    ///
    /// The first token is the program. Every later token is forwarded
    /// verbatim, even if it looks like an option.
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut tokens = tokens.into_iter().map(Into::into);
        let program = tokens.next().ok_or(ConfigError::MissingTest)?;
        Ok(Self::new(program)?.args(tokens))
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.arguments
    }

    /// The child's full argument vector: the program itself followed by
    /// the forwarded arguments.
    pub fn argv(&self) -> Vec<&OsStr> {
        std::iter::once(self.program.as_os_str())
            .chain(self.arguments.iter().map(OsString::as_os_str))
            .collect()
    }
}

// -----------------------------------------------------------------------
// RunConfig
// -----------------------------------------------------------------------

/// Runner-level settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Upper bound on trials. Zero or negative runs nothing.
    pub iteration_limit: i64,
}

impl RunConfig {
    pub fn new(iteration_limit: i64) -> Self {
        Self { iteration_limit }
    }

    /// Number of trials that will actually be attempted.
    pub fn trial_budget(&self) -> u64 {
        u64::try_from(self.iteration_limit).unwrap_or(0)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS)
    }
}

/// Parse an iteration count.
///
/// Accepts a base-10 integer with an optional leading sign and nothing
/// else: no whitespace, no suffix, no empty string.
pub fn parse_iterations(value: &str) -> Result<i64, ConfigError> {
    value.parse::<i64>().map_err(|source| match source.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            ConfigError::IterationsOutOfRange {
                value: value.to_owned(),
                source,
            }
        }
        _ => ConfigError::InvalidIterations {
            value: value.to_owned(),
        },
    })
}
