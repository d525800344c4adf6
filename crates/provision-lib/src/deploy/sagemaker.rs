//! SageMaker endpoint deployment
//!
//! Mirrors what a model `deploy` does on the hosting platform:
//! - CreateModel with the inference image, artifact and environment
//! - CreateEndpointConfig with a single production variant
//! - CreateEndpoint
//! - DescribeEndpoint polling until the endpoint leaves `Creating`

use super::{EndpointDeployer, EndpointHandle};
use crate::error::DeploymentError;
use crate::models::DeploymentRequest;
use async_trait::async_trait;
use aws_sdk_sagemaker::error::DisplayErrorContext;
use aws_sdk_sagemaker::types::{
    ContainerDefinition, ProductionVariant, ProductionVariantInstanceType,
};
use aws_sdk_sagemaker::Client;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

/// Prefix for generated model names
const MODEL_NAME_BASE: &str = "huggingface-pytorch-tgi-inference";

/// Longest name SageMaker accepts for models
const MAX_NAME_LEN: usize = 63;

const VARIANT_NAME: &str = "AllTraffic";

/// Where an endpoint is after a status check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    /// Still being created or updated
    Pending,
    InService,
    /// Settled in a status other than `InService`
    Failed(String),
}

impl PollState {
    pub fn from_status(status: Option<&str>) -> Self {
        match status {
            Some("Creating") | Some("Updating") | Some("SystemUpdating") => PollState::Pending,
            Some("InService") => PollState::InService,
            Some(other) => PollState::Failed(other.to_string()),
            None => PollState::Failed("Unknown".to_string()),
        }
    }
}

/// Generate a unique resource name from `base` and a UTC timestamp
pub fn model_name_from_base(base: &str, now: DateTime<Utc>) -> String {
    let timestamp = now.format("%Y-%m-%d-%H-%M-%S-%3f").to_string();
    let keep = MAX_NAME_LEN.saturating_sub(timestamp.len() + 1);
    let base: String = base.chars().take(keep).collect();
    format!("{}-{}", base, timestamp)
}

/// Deploys endpoints through the SageMaker control plane
#[derive(Debug, Clone)]
pub struct SageMakerDeployer {
    client: Client,
    poll_interval: Duration,
}

impl SageMakerDeployer {
    pub fn new(client: Client, poll_interval: Duration) -> Self {
        Self {
            client,
            poll_interval,
        }
    }

    async fn create_model(
        &self,
        model_name: &str,
        request: &DeploymentRequest,
    ) -> Result<(), DeploymentError> {
        let environment: HashMap<String, String> =
            request.resource_hints.to_environment().into_iter().collect();

        let container = ContainerDefinition::builder()
            .image(&request.image_uri)
            .model_data_url(&request.model_data_url)
            .set_environment(Some(environment))
            .build();

        self.client
            .create_model()
            .model_name(model_name)
            .execution_role_arn(&request.execution_role_arn)
            .primary_container(container)
            .send()
            .await
            .map_err(|e| DeploymentError::api("CreateModel", DisplayErrorContext(&e).to_string()))?;

        debug!(model_name = %model_name, "Model created");
        Ok(())
    }

    async fn create_endpoint_config(
        &self,
        model_name: &str,
        request: &DeploymentRequest,
    ) -> Result<(), DeploymentError> {
        let variant = ProductionVariant::builder()
            .variant_name(VARIANT_NAME)
            .model_name(model_name)
            .initial_instance_count(request.initial_instance_count)
            .instance_type(ProductionVariantInstanceType::from(
                request.instance_type.as_str(),
            ))
            .container_startup_health_check_timeout_in_seconds(request.health_check_timeout_secs)
            .build();

        self.client
            .create_endpoint_config()
            .endpoint_config_name(&request.endpoint_name)
            .production_variants(variant)
            .send()
            .await
            .map_err(|e| {
                DeploymentError::api("CreateEndpointConfig", DisplayErrorContext(&e).to_string())
            })?;

        debug!(endpoint_config = %request.endpoint_name, "Endpoint config created");
        Ok(())
    }

    async fn create_endpoint(&self, request: &DeploymentRequest) -> Result<(), DeploymentError> {
        self.client
            .create_endpoint()
            .endpoint_name(&request.endpoint_name)
            .endpoint_config_name(&request.endpoint_name)
            .send()
            .await
            .map_err(|e| DeploymentError::api("CreateEndpoint", DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }

    /// Block until the endpoint settles
    async fn wait_for_endpoint(&self, endpoint_name: &str) -> Result<(), DeploymentError> {
        loop {
            let output = self
                .client
                .describe_endpoint()
                .endpoint_name(endpoint_name)
                .send()
                .await
                .map_err(|e| {
                    DeploymentError::api("DescribeEndpoint", DisplayErrorContext(&e).to_string())
                })?;

            let status = output.endpoint_status().map(|s| s.as_str());
            match PollState::from_status(status) {
                PollState::Pending => {
                    debug!(
                        endpoint = %endpoint_name,
                        status = ?status,
                        "Endpoint not ready, waiting"
                    );
                    tokio::time::sleep(self.poll_interval).await;
                }
                PollState::InService => return Ok(()),
                PollState::Failed(status) => {
                    return Err(DeploymentError::EndpointFailed {
                        endpoint: endpoint_name.to_string(),
                        status,
                        reason: output
                            .failure_reason()
                            .unwrap_or("no failure reason reported")
                            .to_string(),
                    })
                }
            }
        }
    }
}

#[async_trait]
impl EndpointDeployer for SageMakerDeployer {
    async fn deploy(&self, request: &DeploymentRequest) -> Result<EndpointHandle, DeploymentError> {
        let model_name = model_name_from_base(MODEL_NAME_BASE, Utc::now());

        self.create_model(&model_name, request).await?;
        self.create_endpoint_config(&model_name, request).await?;
        self.create_endpoint(request).await?;

        info!(
            endpoint = %request.endpoint_name,
            model_name = %model_name,
            "Endpoint creation started, waiting for InService"
        );
        self.wait_for_endpoint(&request.endpoint_name).await?;

        Ok(EndpointHandle {
            endpoint_name: request.endpoint_name.clone(),
            model_name,
        })
    }
}
