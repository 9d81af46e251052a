//! `widget-verifier`: compare a deployed dashboard with its metrics.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use dashguard_core::VerifierConfig;
use dashguard_probe::{AwsCloudClient, WidgetVerifier};

use crate::exit_code;

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Verifier configuration (YAML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub region: Option<String>,

    #[arg(long)]
    pub dashboard_name: Option<String>,

    #[arg(long)]
    pub model_id: Option<String>,
}

impl VerifyArgs {
    pub fn resolve_config(&self) -> Result<VerifierConfig> {
        let mut config = match &self.config {
            Some(path) => VerifierConfig::from_file(path)
                .with_context(|| format!("Failed to load verifier config {}", path.display()))?,
            None => VerifierConfig::default(),
        };
        if let Some(region) = &self.region {
            config.region = region.clone();
        }
        if let Some(name) = &self.dashboard_name {
            config.dashboard_name = name.clone();
        }
        if let Some(model_id) = &self.model_id {
            config.model_id = model_id.clone();
        }
        config.validate().context("Invalid verifier settings")?;
        Ok(config)
    }
}

pub fn run(args: &VerifyArgs) -> Result<ExitCode> {
    let config = args.resolve_config()?;
    let client = AwsCloudClient::connect(&config.region)
        .with_context(|| format!("Failed to initialize clients in {}", config.region))?;

    let outcome = WidgetVerifier::new(client, &config).run();
    print!("{}", outcome.render(&config));
    tracing::info!(passed = outcome.passed(), dashboard = %config.dashboard_name, "verification complete");
    Ok(exit_code(outcome.exit_code()))
}
