//! Endpoint provisioning CLI
//!
//! A command-line tool for inspecting the deployment request, resolving
//! inference images, and running the provisioning handler locally.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{image, invoke, render};

/// SageMaker endpoint provisioning CLI
#[derive(Parser)]
#[command(name = "epinit")]
#[command(author, version, about = "CLI for the SageMaker endpoint provisioning handler", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the deployment request built from the environment
    Render {
        /// Override AWS_REGION for the image lookup
        #[arg(long)]
        region: Option<String>,
    },

    /// Resolve the Hugging Face LLM inference image URI
    ImageUri {
        /// AWS region hosting the registry
        #[arg(long, env = "AWS_REGION")]
        region: String,

        /// Container version (exact or major.minor)
        #[arg(long, default_value = provision_lib::IMAGE_VERSION)]
        version: String,

        /// Inference backend
        #[arg(long, default_value = provision_lib::IMAGE_BACKEND)]
        backend: String,
    },

    /// Run the provisioning handler once against AWS
    Invoke {
        /// Correlation id for the invocation (generated if omitted)
        #[arg(long)]
        request_id: Option<String>,

        /// Event payload as JSON
        #[arg(long, default_value = "{}")]
        event: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render { region } => {
            render::render_request(region, cli.format)?;
        }
        Commands::ImageUri {
            region,
            version,
            backend,
        } => {
            image::show_image_uri(&backend, &version, &region, cli.format)?;
        }
        Commands::Invoke { request_id, event } => {
            invoke::invoke_handler(request_id, &event).await?;
        }
    }

    Ok(())
}
