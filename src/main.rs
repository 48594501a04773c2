//! CLI binary for `week_planner`.
//!
//! This binary is a thin wrapper that parses arguments and delegates to the library.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use week_planner::cli::{run, Cli};

/// Environment variable holding the log filter, e.g. `debug` or `week_planner=trace`.
const LOG_ENV_VAR: &str = "WEEK_PLANNER_LOG";

fn main() -> ExitCode {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let output = run(cli.command);

    for line in output.stdout {
        println!("{line}");
    }
    for line in output.stderr {
        eprintln!("{line}");
    }

    output.exit_code
}
