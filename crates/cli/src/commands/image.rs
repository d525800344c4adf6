//! Inference image lookup

use crate::output::{print_fields, FieldRow, OutputFormat};
use anyhow::{Context, Result};
use provision_lib::error::ImageError;
use provision_lib::image::{resolve_llm_image_uri, supported_versions};
use serde_json::json;

/// Resolve the image URI, listing the known versions when the version is unsupported
pub fn lookup_image_uri(backend: &str, version: &str, region: &str) -> Result<String> {
    match resolve_llm_image_uri(backend, version, region) {
        Ok(uri) => Ok(uri),
        Err(err @ ImageError::UnsupportedVersion { .. }) => Err(err).with_context(|| {
            format!("supported versions: {}", supported_versions().join(", "))
        }),
        Err(err) => Err(err.into()),
    }
}

/// Resolve and print the LLM image URI
pub fn show_image_uri(backend: &str, version: &str, region: &str, format: OutputFormat) -> Result<()> {
    let uri = lookup_image_uri(backend, version, region)?;

    match format {
        OutputFormat::Table => println!("{}", uri),
        OutputFormat::Json => {
            let rows = [FieldRow::new("Image", &uri)];
            print_fields(
                &rows,
                &json!({
                    "backend": backend,
                    "version": version,
                    "region": region,
                    "image_uri": uri,
                }),
                format,
            );
        }
    }
    Ok(())
}
