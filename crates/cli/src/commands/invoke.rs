//! Local invocation of the provisioning handler

use crate::output::{color_status, print_error, print_info, print_success};
use anyhow::{Context, Result};
use provision_lib::{InvocationContext, ProvisionerConfig, StructuredLogger};
use tracing_subscriber::EnvFilter;

/// Run the handler once with AWS clients built from the environment
pub async fn invoke_handler(request_id: Option<String>, event: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let event: serde_json::Value = serde_json::from_str(event).context("Event is not valid JSON")?;
    let config = ProvisionerConfig::load().context("Failed to load configuration")?;
    let request_id = request_id.unwrap_or_else(local_request_id);

    print_info(&format!(
        "Deploying {} in {} (request {})",
        config.endpoint_name, config.region, request_id
    ));

    let provisioner = provision_lib::connect(config, StructuredLogger::new("epinit")).await;
    let ctx = InvocationContext::new(request_id);

    match provisioner.handle(&event, &ctx).await {
        Ok(message) => {
            print_success(&format!("{} ({})", message, color_status("InService")));
            Ok(())
        }
        Err(e) => {
            print_error(&e.to_string());
            Err(e.into())
        }
    }
}

/// Correlation id for invocations outside Lambda
fn local_request_id() -> String {
    format!("local-{}", chrono::Utc::now().format("%Y%m%dT%H%M%S%3f"))
}
