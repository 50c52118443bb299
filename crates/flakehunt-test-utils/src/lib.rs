//! Shared test fixtures for flakehunt integration tests.
//!
//! Each fixture is a small POSIX shell script living in its own temporary
//! directory next to the state files it writes. Scripts are run through
//! `sh <script>` rather than executed directly, so they never need the
//! executable bit and cannot hit `ETXTBSY` while other tests are forking.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// A generated shell script plus the directory holding its state.
///
/// The directory is removed when the fixture is dropped.
pub struct ScriptFixture {
    dir: TempDir,
    script: PathBuf,
}

impl ScriptFixture {
    fn write(body: &str) -> Self {
        let dir = tempfile::tempdir().expect("failed to create fixture directory");
        let script = dir.path().join("trial.sh");
        let counter = dir.path().join("count");
        let contents = format!(
            "count=$(cat '{counter}' 2>/dev/null || echo 0)\n\
             count=$((count + 1))\n\
             echo \"$count\" > '{counter}'\n\
             {body}\n",
            counter = counter.display(),
        );
        fs::write(&script, contents).expect("failed to write fixture script");
        Self { dir, script }
    }

    /// A script that exits 1 on its `n`th invocation and 0 otherwise.
    pub fn fail_on_nth(n: u32) -> Self {
        Self::write(&format!(
            "if [ \"$count\" -eq {n} ]; then exit 1; fi\nexit 0"
        ))
    }

    /// A script that always exits with `code`.
    pub fn exit_with(code: i32) -> Self {
        Self::write(&format!("exit {code}"))
    }

    /// A script that appends each argument it receives, one per line,
    /// to a log file in the fixture directory, then exits 0.
    pub fn record_args() -> Self {
        Self::write(
            "for arg in \"$@\"; do printf '%s\\n' \"$arg\" >> \"$(dirname \"$0\")/args\"; done\n\
             exit 0",
        )
    }

    /// Path of the script as a UTF-8 string, for building command lines.
    pub fn script_str(&self) -> &str {
        self.script.to_str().expect("temp paths are UTF-8")
    }

    /// Positional tokens that run this script: `sh <script>`.
    pub fn command(&self) -> Vec<String> {
        vec!["sh".to_owned(), self.script_str().to_owned()]
    }

    /// How many times the script has been run so far.
    pub fn invocations(&self) -> u32 {
        fs::read_to_string(self.dir.path().join("count"))
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Arguments captured by [`ScriptFixture::record_args`], across all
    /// invocations, in order.
    pub fn recorded_args(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("args"))
            .map(|s| s.lines().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    /// Raw bytes written by [`ScriptFixture::record_args`], for arguments
    /// that are not valid UTF-8.
    pub fn recorded_bytes(&self) -> Vec<u8> {
        fs::read(self.dir.path().join("args")).unwrap_or_default()
    }
}
