//! AWS client construction
//!
//! Clients are built once at cold start and shared by every invocation.

use crate::config::ProvisionerConfig;
use crate::deploy::SageMakerDeployer;
use crate::handler::Provisioner;
use crate::observability::StructuredLogger;
use crate::report::{S3ErrorLog, SnsNotifier};
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::config::Region;
use std::sync::Arc;
use tracing::info;

/// Load shared AWS settings pinned to `region`
pub async fn load_sdk_config(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await
}

/// Wire a [`Provisioner`] to the SageMaker, SNS and S3 clients
pub fn provisioner_from_sdk_config(
    config: ProvisionerConfig,
    sdk_config: &SdkConfig,
    logger: StructuredLogger,
) -> Provisioner {
    let deployer = SageMakerDeployer::new(
        aws_sdk_sagemaker::Client::new(sdk_config),
        config.poll_interval,
    );
    let notifier = SnsNotifier::new(
        aws_sdk_sns::Client::new(sdk_config),
        config.failure_topic_arn.clone(),
    );
    let error_log = S3ErrorLog::new(
        aws_sdk_s3::Client::new(sdk_config),
        config.error_bucket_name.clone(),
    );

    info!(
        region = %config.region,
        topic_arn = %notifier.topic_arn(),
        error_bucket = %error_log.bucket(),
        "AWS clients initialized"
    );

    Provisioner::new(
        config,
        Arc::new(deployer),
        Arc::new(notifier),
        Arc::new(error_log),
        logger,
    )
}

/// Load the SDK settings for `config.region` and wire a [`Provisioner`]
pub async fn connect(config: ProvisionerConfig, logger: StructuredLogger) -> Provisioner {
    let sdk_config = load_sdk_config(&config.region).await;
    provisioner_from_sdk_config(config, &sdk_config, logger)
}
