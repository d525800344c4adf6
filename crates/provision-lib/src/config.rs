//! Provisioner configuration
//!
//! Read once at cold start from the process environment and validated
//! eagerly, so a missing key fails the start-up instead of a deploy call.

use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Default interval between endpoint status checks
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Environment variable names
pub mod keys {
    pub const ENDPOINT_NAME: &str = "ENDPOINT_NAME";
    pub const MODEL_LOCATION: &str = "LOCATION";
    pub const EXECUTION_ROLE: &str = "ROLE";
    pub const ACCOUNT_ID: &str = "AWS_ACCOUNT_ID";
    pub const ERROR_BUCKET_NAME: &str = "ERROR_BUCKET_NAME";
    pub const REGION: &str = "AWS_REGION";
    pub const FAILURE_TOPIC_ARN: &str = "FAILURE_TOPIC_ARN";
    pub const FAILURE_TOPIC_NAME: &str = "FAILURE_TOPIC_NAME";
    pub const POLL_INTERVAL_SECS: &str = "ENDPOINT_POLL_INTERVAL_SECS";
}

/// Environment as read, before validation
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    endpoint_name: Option<String>,
    location: Option<String>,
    role: Option<String>,
    aws_account_id: Option<String>,
    error_bucket_name: Option<String>,
    aws_region: Option<String>,
    failure_topic_arn: Option<String>,
    failure_topic_name: Option<String>,
    endpoint_poll_interval_secs: Option<String>,
}

/// Validated provisioner configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionerConfig {
    /// Name of the endpoint to create
    pub endpoint_name: String,
    /// S3 URI of the model artifact
    pub model_location: String,
    /// Execution role ARN for the hosting platform
    pub execution_role: String,
    pub account_id: String,
    /// Bucket receiving error records
    pub error_bucket_name: String,
    pub region: String,
    /// Topic receiving failure notifications
    pub failure_topic_arn: String,
    /// Interval between endpoint status checks while waiting
    pub poll_interval: Duration,
}

impl ProvisionerConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_source(config::Environment::default())
    }

    /// Load configuration from an explicit key/value map
    pub fn from_map(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_source(config::Environment::default().source(Some(vars)))
    }

    fn from_source(source: config::Environment) -> Result<Self, ConfigError> {
        let raw: RawConfig = config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;

        Self::validate(raw)
    }

    fn validate(raw: RawConfig) -> Result<Self, ConfigError> {
        let endpoint_name = required(raw.endpoint_name, keys::ENDPOINT_NAME)?;
        let model_location = required(raw.location, keys::MODEL_LOCATION)?;
        let execution_role = required(raw.role, keys::EXECUTION_ROLE)?;
        let account_id = required(raw.aws_account_id, keys::ACCOUNT_ID)?;
        let error_bucket_name = required(raw.error_bucket_name, keys::ERROR_BUCKET_NAME)?;
        let region = required(raw.aws_region, keys::REGION)?;

        let failure_topic_arn = match (
            present(raw.failure_topic_arn),
            present(raw.failure_topic_name),
        ) {
            (Some(arn), _) => arn,
            (None, Some(name)) => topic_arn(&region, &account_id, &name),
            (None, None) => {
                return Err(ConfigError::Missing {
                    key: keys::FAILURE_TOPIC_ARN,
                })
            }
        };

        let poll_interval_secs = match present(raw.endpoint_poll_interval_secs) {
            Some(value) => parse_poll_interval(&value)?,
            None => DEFAULT_POLL_INTERVAL_SECS,
        };

        Ok(Self {
            endpoint_name,
            model_location,
            execution_role,
            account_id,
            error_bucket_name,
            region,
            failure_topic_arn,
            poll_interval: Duration::from_secs(poll_interval_secs),
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, key: &'static str) -> Result<String, ConfigError> {
    present(value).ok_or(ConfigError::Missing { key })
}

fn parse_poll_interval(value: &str) -> Result<u64, ConfigError> {
    match value.parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            key: keys::POLL_INTERVAL_SECS,
            reason: "must be greater than zero".to_string(),
        }),
        Ok(secs) => Ok(secs),
        Err(e) => Err(ConfigError::Invalid {
            key: keys::POLL_INTERVAL_SECS,
            reason: e.to_string(),
        }),
    }
}

/// Build an SNS topic ARN in the partition that owns `region`
pub fn topic_arn(region: &str, account_id: &str, topic_name: &str) -> String {
    let partition = if region.starts_with("cn-") {
        "aws-cn"
    } else if region.starts_with("us-gov-") {
        "aws-us-gov"
    } else {
        "aws"
    };
    format!("arn:{}:sns:{}:{}:{}", partition, region, account_id, topic_name)
}
