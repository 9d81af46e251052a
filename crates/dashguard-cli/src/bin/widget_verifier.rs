use std::process::ExitCode;

use clap::Parser;
use dashguard_cli::commands::verify::{self, VerifyArgs};
use dashguard_cli::logging::LogContext;

#[derive(Parser, Debug)]
#[command(
    name = "widget-verifier",
    version,
    about = "Verify dashboard widgets against the metrics behind them"
)]
struct Cli {
    #[command(flatten)]
    args: VerifyArgs,
}

fn main() -> anyhow::Result<ExitCode> {
    let _log = LogContext::install();
    let cli = Cli::parse();
    verify::run(&cli.args)
}
