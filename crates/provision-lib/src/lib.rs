//! Provisioning library for the SageMaker endpoint-init function
//!
//! This crate provides the core functionality for:
//! - Configuration loading and eager validation
//! - Hugging Face LLM container image lookup
//! - Endpoint deployment through SageMaker
//! - Failure reporting to SNS and S3
//! - Structured logging of provisioning events

pub mod clients;
pub mod config;
pub mod deploy;
pub mod error;
pub mod handler;
pub mod image;
pub mod models;
pub mod observability;
pub mod report;

pub use clients::connect;
pub use crate::config::ProvisionerConfig;
pub use deploy::{EndpointDeployer, EndpointHandle, SageMakerDeployer};
pub use error::{ConfigError, DeploymentError, ImageError, ReportError};
pub use handler::{build_deployment_request, Provisioner};
pub use models::*;
pub use observability::{format_elapsed, StructuredLogger};
pub use report::{ErrorLogSink, ErrorReporter, NotificationSink, S3ErrorLog, SnsNotifier};
