//! Command-line surface.
//!
//! Runner options are only recognised before the first positional token.
//! From the test program onwards every token, including ones shaped like
//! options, is captured into `test` untouched.

use std::ffi::OsString;

use clap::Parser;

use flakehunt_core::parse_iterations;

#[derive(Debug, Parser)]
#[command(
    name = "flakehunt",
    version,
    about = "Executes the test in a loop for the specified amount of iterations. Stops when a test fails."
)]
pub struct Cli {
    /// Repeat test for this many iterations [default: 10]
    #[arg(
        short,
        long,
        value_name = "VALUE",
        allow_negative_numbers = true,
        value_parser = parse_iterations
    )]
    pub iterations: Option<i64>,

    /// Test program to run, followed by the arguments forwarded to it
    #[arg(value_name = "TEST", num_args = 1.., trailing_var_arg = true)]
    pub test: Vec<OsString>,
}
