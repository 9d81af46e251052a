//! Dashguard live checks
//!
//! The live probe sends test traffic to the monitored model, waits for telemetry
//! and checks that the deployed dashboard reflects it. The widget verifier reads
//! a dashboard and its metrics and recomputes cost and throughput figures.
//!
//! Both talk to the provider only through [`CloudClient`]; [`AwsCloudClient`] is
//! the production implementation.

pub mod aws;
pub mod client;
pub mod error;
pub mod invocation;
pub mod pause;
pub mod probe;
pub mod report;
pub mod verifier;

pub use aws::AwsCloudClient;
pub use client::{CloudClient, MetricQuery, MetricSeries, StackInfo, TimeWindow};
pub use error::ProbeError;
pub use invocation::{InvocationRecord, InvocationSummary};
pub use pause::{Pause, ThreadPause};
pub use probe::{LiveProbe, ProbeOutcome, ProbeTarget, Stage, Verdict};
pub use verifier::{VerifierOutcome, WidgetVerifier};
