//! AWS implementation of [`CloudClient`].
//!
//! The SDK is async; every call is driven to completion on a private
//! current-thread runtime, so callers stay single-threaded and sequential.
//! Credentials are resolved lazily by the SDK; a missing identity surfaces as
//! [`ProbeError::Credentials`] from the first call.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_cloudwatch::primitives::DateTime;
use aws_sdk_cloudwatch::types::{Dimension, Metric, MetricDataQuery, MetricStat, ScanBy};
use serde_json::Value;
use tokio::runtime::Runtime;

use crate::client::{CloudClient, MetricQuery, MetricSeries, StackInfo, TimeWindow};
use crate::error::ProbeError;

pub struct AwsCloudClient {
    bedrock: aws_sdk_bedrockruntime::Client,
    cloudformation: aws_sdk_cloudformation::Client,
    cloudwatch: aws_sdk_cloudwatch::Client,
    runtime: Runtime,
}

impl AwsCloudClient {
    /// Loads the default credential chain for `region` and builds one client per service.
    pub fn connect(region: &str) -> Result<Self, ProbeError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ProbeError::Runtime(e.to_string()))?;

        let config: SdkConfig = runtime.block_on(
            aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(region.to_string()))
                .load(),
        );
        tracing::debug!(region, "loaded cloud provider configuration");

        Ok(Self {
            bedrock: aws_sdk_bedrockruntime::Client::new(&config),
            cloudformation: aws_sdk_cloudformation::Client::new(&config),
            cloudwatch: aws_sdk_cloudwatch::Client::new(&config),
            runtime,
        })
    }
}

fn sdk_error<E>(operation: &'static str, error: E) -> ProbeError
where
    E: std::error::Error,
{
    ProbeError::from_sdk(
        operation,
        aws_sdk_cloudwatch::error::DisplayErrorContext(error).to_string(),
    )
}

fn to_sdk_time(at: chrono::DateTime<chrono::Utc>) -> DateTime {
    DateTime::from_secs(at.timestamp())
}

fn to_sdk_query(query: &MetricQuery) -> MetricDataQuery {
    let dimensions = query
        .dimensions
        .iter()
        .map(|(name, value)| Dimension::builder().name(name).value(value).build())
        .collect();
    let metric = Metric::builder()
        .namespace(&query.namespace)
        .metric_name(&query.metric_name)
        .set_dimensions(Some(dimensions))
        .build();
    let stat = MetricStat::builder()
        .metric(metric)
        .period(query.period_seconds)
        .stat(&query.stat)
        .build();
    MetricDataQuery::builder()
        .id(&query.id)
        .metric_stat(stat)
        .return_data(true)
        .build()
}

impl CloudClient for AwsCloudClient {
    fn describe_stack(&self, stack_name: &str) -> Result<StackInfo, ProbeError> {
        let output = self
            .runtime
            .block_on(
                self.cloudformation
                    .describe_stacks()
                    .stack_name(stack_name)
                    .send(),
            )
            .map_err(|e| sdk_error("DescribeStacks", e))?;
        let stack = output
            .stacks()
            .first()
            .ok_or_else(|| ProbeError::StackNotFound(stack_name.to_string()))?;

        let parameters = stack.parameters().iter().filter_map(|p| {
            Some((
                p.parameter_key()?.to_string(),
                p.parameter_value().unwrap_or_default().to_string(),
            ))
        });
        let outputs = stack.outputs().iter().filter_map(|o| {
            Some((
                o.output_key()?.to_string(),
                o.output_value().unwrap_or_default().to_string(),
            ))
        });
        Ok(StackInfo::new(stack_name, parameters, outputs))
    }

    fn invoke_model(&self, model_id: &str, body: &Value) -> Result<Value, ProbeError> {
        let payload = serde_json::to_vec(body)?;
        let output = self
            .runtime
            .block_on(
                self.bedrock
                    .invoke_model()
                    .model_id(model_id)
                    .content_type("application/json")
                    .accept("application/json")
                    .body(Blob::new(payload))
                    .send(),
            )
            .map_err(|e| sdk_error("InvokeModel", e))?;
        Ok(serde_json::from_slice(output.body().as_ref())?)
    }

    fn get_dashboard(&self, dashboard_name: &str) -> Result<String, ProbeError> {
        let output = self
            .runtime
            .block_on(
                self.cloudwatch
                    .get_dashboard()
                    .dashboard_name(dashboard_name)
                    .send(),
            )
            .map_err(|e| sdk_error("GetDashboard", e))?;
        output
            .dashboard_body()
            .map(str::to_string)
            .ok_or_else(|| ProbeError::service("GetDashboard", "response carried no dashboard body"))
    }

    fn get_metric_data(
        &self,
        queries: &[MetricQuery],
        window: &TimeWindow,
    ) -> Result<Vec<MetricSeries>, ProbeError> {
        let output = self
            .runtime
            .block_on(
                self.cloudwatch
                    .get_metric_data()
                    .set_metric_data_queries(Some(queries.iter().map(to_sdk_query).collect()))
                    .start_time(to_sdk_time(window.start))
                    .end_time(to_sdk_time(window.end))
                    .scan_by(ScanBy::TimestampAscending)
                    .send(),
            )
            .map_err(|e| sdk_error("GetMetricData", e))?;
        Ok(output
            .metric_data_results()
            .iter()
            .map(|result| MetricSeries {
                id: result.id().unwrap_or_default().to_string(),
                values: result.values().to_vec(),
            })
            .collect())
    }

    fn validate_template(&self, template_body: &str) -> Result<(), ProbeError> {
        self.runtime
            .block_on(
                self.cloudformation
                    .validate_template()
                    .template_body(template_body)
                    .send(),
            )
            .map_err(|e| sdk_error("ValidateTemplate", e))?;
        Ok(())
    }
}
