//! Core types shared across dashguard crates.
//!
//! - [`template`]: the template document, its parameters and resources
//! - [`node`]: the typed YAML tree with intrinsic functions folded in
//! - [`dashboard`], [`iam`], [`query`]: extraction of the embedded dashboard body,
//!   IAM statements and log queries
//! - [`category`]: widget categories used by the widget verifier
//! - [`config`]: configuration for the three binaries

pub mod category;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod iam;
pub mod node;
pub mod query;
pub mod template;

pub use category::{CategoryTally, WidgetCategory};
pub use config::{CheckConfig, ConfigError, IdentityField, PricingConfig, ProbeConfig, VerifierConfig};
pub use dashboard::{Dashboard, MetricRow, MetricSpec, Widget, WidgetKind};
pub use error::TemplateError;
pub use iam::PolicyStatement;
pub use node::Node;
pub use query::{IdentityUse, LogQuery};
pub use template::{Parameter, Resource, Template};
