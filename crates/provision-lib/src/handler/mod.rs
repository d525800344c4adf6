//! Endpoint provisioning handler
//!
//! One invocation builds the deployment request, deploys it, and on failure
//! reports an error record to both sinks before returning the error.

#[cfg(test)]
mod tests;

use crate::config::ProvisionerConfig;
use crate::deploy::{EndpointDeployer, EndpointHandle};
use crate::error::{DeploymentError, ImageError};
use crate::image::resolve_llm_image_uri;
use crate::models::{
    DeploymentRequest, ErrorRecord, InvocationContext, IMAGE_BACKEND, IMAGE_VERSION,
    SUCCESS_MESSAGE,
};
use crate::observability::StructuredLogger;
use crate::report::{ErrorLogSink, ErrorReporter, NotificationSink};
use std::sync::Arc;
use std::time::Instant;

/// Assemble the deployment request for `config`
pub fn build_deployment_request(
    config: &ProvisionerConfig,
) -> Result<DeploymentRequest, ImageError> {
    let image_uri = resolve_llm_image_uri(IMAGE_BACKEND, IMAGE_VERSION, &config.region)?;

    Ok(DeploymentRequest::new(
        &config.model_location,
        &config.execution_role,
        image_uri,
        &config.endpoint_name,
    ))
}

/// Provisions the configured endpoint once per invocation
#[derive(Clone)]
pub struct Provisioner {
    config: ProvisionerConfig,
    deployer: Arc<dyn EndpointDeployer>,
    reporter: ErrorReporter,
    logger: StructuredLogger,
}

impl Provisioner {
    pub fn new(
        config: ProvisionerConfig,
        deployer: Arc<dyn EndpointDeployer>,
        notifier: Arc<dyn NotificationSink>,
        error_log: Arc<dyn ErrorLogSink>,
        logger: StructuredLogger,
    ) -> Self {
        let reporter = ErrorReporter::new(notifier, error_log, logger.clone());
        Self {
            config,
            deployer,
            reporter,
            logger,
        }
    }

    /// Handle one invocation.
    ///
    /// The event payload is not consumed. On failure the error is reported
    /// to the notification topic and the error bucket, then returned.
    pub async fn handle(
        &self,
        _event: &serde_json::Value,
        ctx: &InvocationContext,
    ) -> Result<String, DeploymentError> {
        let started = Instant::now();

        match self.provision(ctx).await {
            Ok(handle) => {
                self.logger.log_endpoint_created(
                    &ctx.request_id,
                    &handle.endpoint_name,
                    &handle.model_name,
                    started.elapsed(),
                );
                Ok(SUCCESS_MESSAGE.to_string())
            }
            Err(err) => {
                self.logger.log_deploy_failed(
                    &ctx.request_id,
                    &self.config.endpoint_name,
                    &err.to_string(),
                );

                let record = ErrorRecord::new(ctx, &err);
                self.reporter.report(&record).await;

                Err(err)
            }
        }
    }

    async fn provision(&self, ctx: &InvocationContext) -> Result<EndpointHandle, DeploymentError> {
        let request = build_deployment_request(&self.config)?;

        self.logger.log_deploy_started(
            &ctx.request_id,
            &request.endpoint_name,
            &request.image_uri,
            &request.instance_type,
        );

        self.deployer.deploy(&request).await
    }
}
