//! endpoint-init - SageMaker endpoint provisioning function
//!
//! This binary runs on AWS Lambda. Each invocation deploys the configured
//! Hugging Face model to a SageMaker inference endpoint and reports
//! failures to SNS and S3.

use anyhow::Context;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use provision_lib::{ProvisionerConfig, StructuredLogger};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod function;

const FUNCTION_VERSION: &str = env!("CARGO_PKG_VERSION");
const FUNCTION_NAME: &str = "endpoint-init";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Loading environment variables");
    let config = ProvisionerConfig::load().context("Failed to load provisioner configuration")?;

    let logger = StructuredLogger::new(FUNCTION_NAME);
    logger.log_startup(FUNCTION_VERSION, &config.endpoint_name, &config.region);

    // Clients live for the whole execution environment
    let provisioner = provision_lib::connect(config, logger).await;
    let provisioner = &provisioner;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        function::handle_event(provisioner, event).await
    }))
    .await
}
