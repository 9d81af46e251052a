//! `validator`: static conformance check of a template file.
//!
//! Prints the tiered report (or JSON with `--format json`) and exits 1 when any
//! rule produced an error. `--remote-validate` additionally submits the template to
//! the provider's validation endpoint.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use dashguard_core::{CheckConfig, Template};
use dashguard_probe::{AwsCloudClient, CloudClient};

use crate::exit_code;

pub const TITLE: &str = "Nova Pro Dashboard Template Validation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Template file to check
    pub template: PathBuf,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Rule configuration (YAML). Built-in defaults when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also run the provider's template validation
    #[arg(long, default_value_t = false)]
    pub remote_validate: bool,

    /// Region for --remote-validate
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    pub region: String,
}

pub fn run(args: &ValidateArgs) -> Result<ExitCode> {
    if !args.template.exists() {
        println!("❌ Template file '{}' not found", args.template.display());
        return Ok(ExitCode::FAILURE);
    }

    let config = load_config(args.config.as_deref())?;
    let template = Template::from_file(&args.template)
        .with_context(|| format!("Failed to read template {}", args.template.display()))?;
    if let Some(error) = template.parse_error() {
        tracing::warn!(error, "template is not valid YAML; tree rules will report preconditions");
    }

    let report = dashguard_rules::check(&template, &config);
    tracing::info!(
        errors = report.error_count(),
        warnings = report.warning_count(),
        status = ?report.status(),
        "validation complete"
    );

    match args.format {
        Format::Text => report.print_summary(TITLE),
        Format::Json => println!(
            "{}",
            report.to_json().context("Failed to serialize report")?
        ),
    }

    let mut code = report.exit_code();
    if args.remote_validate && !remote_validate(&template, &args.region, args.format)? {
        code = 1;
    }
    Ok(exit_code(code))
}

fn load_config(path: Option<&Path>) -> Result<CheckConfig> {
    match path {
        Some(path) => CheckConfig::from_file(path)
            .with_context(|| format!("Failed to load check config {}", path.display())),
        None => Ok(CheckConfig::default()),
    }
}

/// Credential failures propagate; a rejected template is reported and returns `false`.
fn remote_validate(template: &Template, region: &str, format: Format) -> Result<bool> {
    let client = AwsCloudClient::connect(region)
        .with_context(|| format!("Failed to connect to the provider in {region}"))?;

    let accepted = match client.validate_template(template.source()) {
        Ok(()) => {
            tracing::info!(region, "remote validation accepted the template");
            true
        }
        Err(e) => {
            tracing::error!(region, error = %e, "remote validation rejected the template");
            if format == Format::Text {
                println!("❌ Remote validation failed: {e}");
            }
            false
        }
    };
    if accepted && format == Format::Text {
        println!("✅ Remote validation passed");
    }
    Ok(accepted)
}
