//! `tester`: live probe against a deployed stack.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use dashguard_core::ProbeConfig;
use dashguard_probe::{AwsCloudClient, LiveProbe, ProbeTarget, ThreadPause};

use crate::exit_code;

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Region the stack is deployed in
    #[arg(long)]
    pub region: String,

    /// Name of the deployed stack
    #[arg(long)]
    pub stack_name: String,

    /// Number of test invocations (overrides the config file)
    #[arg(long)]
    pub invocations: Option<usize>,

    /// Minutes to wait for metrics (overrides the config file)
    #[arg(long)]
    pub wait_minutes: Option<u64>,

    /// Directory receiving the report file (overrides the config file)
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Probe configuration (YAML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl ProbeArgs {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn resolve_config(&self) -> Result<ProbeConfig> {
        let mut config = match &self.config {
            Some(path) => ProbeConfig::from_file(path)
                .with_context(|| format!("Failed to load probe config {}", path.display()))?,
            None => ProbeConfig::default(),
        };
        if let Some(invocations) = self.invocations {
            config.invocations = invocations;
        }
        if let Some(wait_minutes) = self.wait_minutes {
            config.wait_minutes = wait_minutes;
        }
        if let Some(dir) = &self.report_dir {
            config.report_dir = dir.clone();
        }
        config.validate().context("Invalid probe settings")?;
        Ok(config)
    }
}

pub fn run(args: &ProbeArgs) -> Result<ExitCode> {
    let config = args.resolve_config()?;
    let client = AwsCloudClient::connect(&args.region)
        .with_context(|| format!("Failed to initialize clients in {}", args.region))?;
    let target = ProbeTarget {
        region: args.region.clone(),
        stack_name: args.stack_name.clone(),
    };

    let outcome = LiveProbe::new(client, ThreadPause, &config)
        .run(&target)
        .with_context(|| format!("Live probe of stack {} failed", args.stack_name))?;

    println!("{}", outcome.report);
    tracing::info!(
        path = %outcome.report_path.display(),
        verdict = %outcome.verdict,
        "test report saved"
    );
    Ok(exit_code(outcome.exit_code()))
}
