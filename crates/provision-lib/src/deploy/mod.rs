//! Endpoint deployment against the model-hosting platform
//!
//! The handler only sees the [`EndpointDeployer`] trait; the SageMaker
//! implementation lives in [`sagemaker`].

mod sagemaker;

pub use sagemaker::{model_name_from_base, PollState, SageMakerDeployer};

use crate::error::DeploymentError;
use crate::models::DeploymentRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An endpoint that reached service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointHandle {
    pub endpoint_name: String,
    pub model_name: String,
}

/// Creates a managed inference endpoint and waits until it serves traffic
#[async_trait]
pub trait EndpointDeployer: Send + Sync {
    async fn deploy(&self, request: &DeploymentRequest) -> Result<EndpointHandle, DeploymentError>;
}
