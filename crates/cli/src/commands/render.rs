//! Deployment request rendering

use crate::output::{print_fields, FieldRow, OutputFormat};
use anyhow::{Context, Result};
use provision_lib::{build_deployment_request, DeploymentRequest, ProvisionerConfig};

/// Load configuration from the environment and show the request it produces
pub fn render_request(region: Option<String>, format: OutputFormat) -> Result<()> {
    let mut config = ProvisionerConfig::load().context("Failed to load configuration")?;
    if let Some(region) = region {
        config.region = region;
    }

    let request = build_deployment_request(&config).context("Failed to resolve inference image")?;
    print_fields(&request_rows(&request), &request, format);
    Ok(())
}

/// Table rows describing a deployment request
pub fn request_rows(request: &DeploymentRequest) -> Vec<FieldRow> {
    let mut rows = vec![
        FieldRow::new("Endpoint", &request.endpoint_name),
        FieldRow::new("Model data", &request.model_data_url),
        FieldRow::new("Execution role", &request.execution_role_arn),
        FieldRow::new("Image", &request.image_uri),
        FieldRow::new("Instance type", &request.instance_type),
        FieldRow::new("Instance count", request.initial_instance_count),
        FieldRow::new(
            "Health check timeout",
            format!("{}s", request.health_check_timeout_secs),
        ),
    ];

    for (key, value) in request.resource_hints.to_environment() {
        rows.push(FieldRow::new(format!("env {}", key), value));
    }
    rows
}
