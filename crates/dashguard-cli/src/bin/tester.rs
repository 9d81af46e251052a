use std::process::ExitCode;

use clap::Parser;
use dashguard_cli::commands::probe::{self, ProbeArgs};
use dashguard_cli::logging::LogContext;

#[derive(Parser, Debug)]
#[command(
    name = "tester",
    version,
    about = "Send test traffic to a deployed stack and check its dashboard"
)]
struct Cli {
    #[command(flatten)]
    args: ProbeArgs,
}

fn main() -> anyhow::Result<ExitCode> {
    let _log = LogContext::install();
    let cli = Cli::parse();
    probe::run(&cli.args).inspect_err(|e| tracing::error!(error = %e, "test failed"))
}
