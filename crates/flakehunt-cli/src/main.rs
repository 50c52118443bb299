mod cli;
mod config;
mod exit_error;
mod report;

use clap::Parser;
use tracing::debug;

use flakehunt_core::{CommandSpec, ProcessLauncher, TrialLoop};

use cli::Cli;
use exit_error::{EX_FAILURE, ExitError};
use report::ConsoleReporter;

/// Parse the invocation, run the trials, and map the result to an exit
/// status carried by [`ExitError`].
async fn run() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(err) if !err.use_stderr() => {
            err.print()?;
            return Ok(());
        }
        Err(err) => {
            err.print()?;
            return Err(ExitError::silent(exit_error::EX_USAGE).into());
        }
    };

    let spec = CommandSpec::from_tokens(cli.test).map_err(|e| ExitError::usage(e.to_string()))?;
    let run_config = config::resolve_run_config(cli.iterations)
        .map_err(|e| ExitError::usage(format!("{e:#}")))?;
    debug!(
        program = ?spec.program(),
        arguments = ?spec.arguments(),
        iterations = run_config.iteration_limit,
        "starting run"
    );

    let trials = TrialLoop::new(ProcessLauncher, spec, run_config);
    let mut reporter = ConsoleReporter::stdio();
    let result = trials.run(&mut reporter).await;
    reporter.summary(&result);

    if result.is_success() {
        Ok(())
    } else {
        Err(ExitError::silent(EX_FAILURE).into())
    }
}

// Trials are strictly sequential; one thread is all the supervisor needs.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    if let Err(err) = run().await {
        let code = match err.downcast_ref::<ExitError>() {
            Some(exit) => {
                if !exit.message.is_empty() {
                    eprintln!("{}", exit.message);
                }
                exit.code
            }
            None => {
                eprintln!("{err:#}");
                EX_FAILURE
            }
        };
        std::process::exit(code);
    }
}
