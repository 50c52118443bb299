//! Configuration file management for flakehunt.
//!
//! Provides an optional TOML config file at
//! `~/.config/flakehunt/config.toml` and a resolution chain for the
//! iteration limit: CLI flag > env var > config file > default.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use flakehunt_core::{DEFAULT_ITERATIONS, RunConfig, parse_iterations};

/// Overrides the iteration limit when `--iterations` is not given.
pub const ITERATIONS_ENV: &str = "FLAKEHUNT_ITERATIONS";

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "FLAKEHUNT_CONFIG";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub run: RunSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSection {
    /// Default iteration limit for runs without `--iterations`.
    pub iterations: Option<i64>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the flakehunt config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/flakehunt` or
/// `~/.config/flakehunt`, also on macOS.
pub fn config_dir() -> PathBuf {
    config_dir_from(std::env::var_os("XDG_CONFIG_HOME"), dirs::home_dir())
}

/// An empty `XDG_CONFIG_HOME` counts as unset.
fn config_dir_from(xdg_config_home: Option<OsString>, home: Option<PathBuf>) -> PathBuf {
    if let Some(xdg) = xdg_config_home.filter(|s| !s.is_empty()) {
        return PathBuf::from(xdg).join("flakehunt");
    }
    home.unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("flakehunt")
}

/// Return the path to the config file, honouring `FLAKEHUNT_CONFIG`.
pub fn config_path() -> PathBuf {
    match std::env::var_os(CONFIG_PATH_ENV) {
        Some(path) => PathBuf::from(path),
        None => config_dir().join("config.toml"),
    }
}

// -----------------------------------------------------------------------
// Read
// -----------------------------------------------------------------------

/// Load and parse the config file at `path`.
///
/// A missing file yields `Ok(None)`. A file that exists but cannot be read
/// or parsed is an error.
pub fn load_config(path: &Path) -> Result<Option<ConfigFile>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("failed to read config file at {}", path.display()));
        }
    };
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(Some(config))
}

// -----------------------------------------------------------------------
// Resolution
// -----------------------------------------------------------------------

/// Raw iteration settings gathered from every source, before resolution.
#[derive(Debug, Default)]
pub struct IterationSources {
    pub flag: Option<i64>,
    pub env: Option<String>,
    pub file: Option<ConfigFile>,
}

impl IterationSources {
    /// Gather sources from the process environment and the config file.
    pub fn gather(flag: Option<i64>) -> Result<Self> {
        // The flag wins outright, so don't let a broken file get in the way.
        if flag.is_some() {
            return Ok(Self {
                flag,
                ..Self::default()
            });
        }
        let env = std::env::var_os(ITERATIONS_ENV).map(|v| v.to_string_lossy().into_owned());
        let file = load_config(&config_path())?;
        Ok(Self { flag, env, file })
    }

    /// Pick the highest-priority value and validate it.
    pub fn resolve(self) -> Result<RunConfig> {
        if let Some(limit) = self.flag {
            return Ok(RunConfig::new(limit));
        }
        if let Some(raw) = self.env {
            let limit = parse_iterations(&raw).with_context(|| format!("invalid {ITERATIONS_ENV}"))?;
            return Ok(RunConfig::new(limit));
        }
        let from_file = self.file.and_then(|f| f.run.iterations);
        Ok(RunConfig::new(from_file.unwrap_or(DEFAULT_ITERATIONS)))
    }
}

/// Fully resolve the run configuration for this process.
pub fn resolve_run_config(flag: Option<i64>) -> Result<RunConfig> {
    IterationSources::gather(flag)?.resolve()
}
