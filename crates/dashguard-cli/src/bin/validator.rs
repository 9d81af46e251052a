use std::process::ExitCode;

use clap::Parser;
use dashguard_cli::commands::validate::{self, ValidateArgs};
use dashguard_cli::logging::LogContext;

#[derive(Parser, Debug)]
#[command(
    name = "validator",
    version,
    about = "Static conformance check for the monitoring dashboard template"
)]
struct Cli {
    #[command(flatten)]
    args: ValidateArgs,
}

fn main() -> anyhow::Result<ExitCode> {
    let _log = LogContext::install();
    let cli = Cli::parse();
    validate::run(&cli.args)
}
