//! Core data models for endpoint provisioning

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Local path the model artifact is unpacked to inside the container
pub const MODEL_ID: &str = "/opt/ml/model";
pub const NUM_GPUS: u32 = 1;
pub const MAX_INPUT_LENGTH: u32 = 12287;
pub const MAX_TOTAL_TOKENS: u32 = 12288;
pub const MAX_BATCH_PREFILL_TOKENS: u32 = 12288;

/// Inference backend and container version for the LLM image lookup
pub const IMAGE_BACKEND: &str = "huggingface";
pub const IMAGE_VERSION: &str = "1.3.3";

pub const INSTANCE_TYPE: &str = "ml.g5.4xlarge";
pub const INSTANCE_COUNT: i32 = 1;
pub const HEALTH_CHECK_TIMEOUT_SECS: i32 = 1200;

/// Returned to the invoker when the endpoint comes up
pub const SUCCESS_MESSAGE: &str = "Successfully created endpoint.";

/// Service tag stamped on every error record
pub const SERVICE_TAG: &str = "lambda/sagemaker-endpoint-init";

/// Container environment handed to the text-generation-inference server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHints {
    pub model_id: String,
    pub num_gpus: u32,
    pub max_input_length: u32,
    pub max_total_tokens: u32,
    pub max_batch_prefill_tokens: u32,
}

impl Default for ResourceHints {
    fn default() -> Self {
        Self::fixed()
    }
}

impl ResourceHints {
    /// The hints every deployment uses
    pub fn fixed() -> Self {
        Self {
            model_id: MODEL_ID.to_string(),
            num_gpus: NUM_GPUS,
            max_input_length: MAX_INPUT_LENGTH,
            max_total_tokens: MAX_TOTAL_TOKENS,
            max_batch_prefill_tokens: MAX_BATCH_PREFILL_TOKENS,
        }
    }

    /// Render as container environment variables.
    ///
    /// Numeric values are JSON-encoded, which for integers is the bare
    /// decimal form.
    pub fn to_environment(&self) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();
        env.insert("HF_MODEL_ID".to_string(), self.model_id.clone());
        env.insert("SM_NUM_GPUS".to_string(), json_number(self.num_gpus));
        env.insert(
            "MAX_INPUT_LENGTH".to_string(),
            json_number(self.max_input_length),
        );
        env.insert(
            "MAX_TOTAL_TOKENS".to_string(),
            json_number(self.max_total_tokens),
        );
        env.insert(
            "MAX_BATCH_PREFILL_TOKENS".to_string(),
            json_number(self.max_batch_prefill_tokens),
        );
        env
    }
}

fn json_number(value: u32) -> String {
    serde_json::Value::from(value).to_string()
}

/// Everything the hosting platform needs to stand up the endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRequest {
    /// S3 location of the packaged model artifact
    pub model_data_url: String,
    /// IAM role the hosting platform assumes
    pub execution_role_arn: String,
    /// Inference container image
    pub image_uri: String,
    pub resource_hints: ResourceHints,
    pub endpoint_name: String,
    pub instance_type: String,
    pub initial_instance_count: i32,
    pub health_check_timeout_secs: i32,
}

impl DeploymentRequest {
    pub fn new(
        model_data_url: impl Into<String>,
        execution_role_arn: impl Into<String>,
        image_uri: impl Into<String>,
        endpoint_name: impl Into<String>,
    ) -> Self {
        Self {
            model_data_url: model_data_url.into(),
            execution_role_arn: execution_role_arn.into(),
            image_uri: image_uri.into(),
            resource_hints: ResourceHints::fixed(),
            endpoint_name: endpoint_name.into(),
            instance_type: INSTANCE_TYPE.to_string(),
            initial_instance_count: INSTANCE_COUNT,
            health_check_timeout_secs: HEALTH_CHECK_TIMEOUT_SECS,
        }
    }
}

/// Per-invocation context supplied by the function runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    pub request_id: String,
}

impl InvocationContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }
}

/// Failure report sent to the notification topic and the error bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Local wall-clock time the failure was recorded
    pub timestamp: String,
    pub aws_request_id: String,
    pub error: String,
    pub service: String,
}

impl ErrorRecord {
    pub fn new(ctx: &InvocationContext, error: &impl std::fmt::Display) -> Self {
        Self::at(Local::now(), ctx, error)
    }

    pub fn at(
        time: DateTime<Local>,
        ctx: &InvocationContext,
        error: &impl std::fmt::Display,
    ) -> Self {
        Self {
            timestamp: format_timestamp(&time),
            aws_request_id: ctx.request_id.clone(),
            error: error.to_string(),
            service: SERVICE_TAG.to_string(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Object key under the error bucket, partitioned by UTC date
    pub fn object_key(&self, utc_date: NaiveDate) -> String {
        format!(
            "error/endpoint_init/{}/{}/error.json",
            utc_date.format("%Y-%m-%d"),
            self.timestamp
        )
    }
}

/// `YYYY-MM-DD HH:MM:SS.ffffff`
pub fn format_timestamp(time: &DateTime<Local>) -> String {
    time.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}
