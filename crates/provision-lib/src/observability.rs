//! Structured logging for provisioning events
//!
//! Every event carries an `event` field and the function name so the JSON
//! log lines can be filtered per handler.

use std::time::Duration;
use tracing::{error, info, warn};

/// Render an elapsed duration as `{minutes}m {seconds}s`
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}m {}s", secs / 60, secs % 60)
}

/// Structured logger for provisioning events
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    function_name: String,
}

impl StructuredLogger {
    pub fn new(function_name: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
        }
    }

    /// Log cold start
    pub fn log_startup(&self, version: &str, endpoint_name: &str, region: &str) {
        info!(
            event = "function_started",
            function = %self.function_name,
            version = %version,
            endpoint = %endpoint_name,
            region = %region,
            "Endpoint provisioning handler initialized"
        );
    }

    /// Log the deployment request about to be submitted
    pub fn log_deploy_started(
        &self,
        request_id: &str,
        endpoint_name: &str,
        image_uri: &str,
        instance_type: &str,
    ) {
        info!(
            event = "deploy_started",
            function = %self.function_name,
            request_id = %request_id,
            endpoint = %endpoint_name,
            image_uri = %image_uri,
            instance_type = %instance_type,
            "Deploying model to SageMaker inference"
        );
    }

    /// Log a successful deployment with its elapsed time
    pub fn log_endpoint_created(
        &self,
        request_id: &str,
        endpoint_name: &str,
        model_name: &str,
        elapsed: Duration,
    ) {
        info!(
            event = "endpoint_created",
            function = %self.function_name,
            request_id = %request_id,
            endpoint = %endpoint_name,
            model_name = %model_name,
            elapsed_secs = elapsed.as_secs(),
            "Endpoint created in {}",
            format_elapsed(elapsed)
        );
    }

    /// Log a failed deployment
    pub fn log_deploy_failed(&self, request_id: &str, endpoint_name: &str, error: &str) {
        error!(
            event = "deploy_failed",
            function = %self.function_name,
            request_id = %request_id,
            endpoint = %endpoint_name,
            error = %error,
            "Unable to deploy endpoint"
        );
    }

    /// Log a sink that could not accept an error record
    pub fn log_report_failure(&self, sink: &str, request_id: &str, error: &str) {
        warn!(
            event = "error_report_failed",
            function = %self.function_name,
            sink = %sink,
            request_id = %request_id,
            error = %error,
            "Failed to report deployment error, continuing"
        );
    }
}
