//! Handler tests against recording fakes
//!
//! These tests verify:
//! - Success path leaves the error sinks untouched
//! - Failure path reports once to each sink and returns the original error
//! - Reporting failures never hide the deployment error

use super::*;
use crate::error::ReportError;
use crate::report::ReportOutcome;
use crate::models::{ResourceHints, SERVICE_TAG};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::sync::Mutex;
use std::time::Duration;

fn test_config() -> ProvisionerConfig {
    ProvisionerConfig {
        endpoint_name: "llm-endpoint".to_string(),
        model_location: "s3://models/llm/model.tar.gz".to_string(),
        execution_role: "arn:aws:iam::123456789012:role/sagemaker".to_string(),
        account_id: "123456789012".to_string(),
        error_bucket_name: "error-bucket".to_string(),
        region: "us-east-1".to_string(),
        failure_topic_arn: "arn:aws:sns:us-east-1:123456789012:endpoint-failures".to_string(),
        poll_interval: Duration::from_secs(1),
    }
}

#[derive(Default)]
struct FakeDeployer {
    fail_with: Option<String>,
    requests: Mutex<Vec<DeploymentRequest>>,
}

impl FakeDeployer {
    fn succeeding() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            fail_with: Some(message.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<DeploymentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl EndpointDeployer for FakeDeployer {
    async fn deploy(&self, request: &DeploymentRequest) -> Result<EndpointHandle, DeploymentError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.fail_with {
            Some(message) => Err(DeploymentError::api("CreateEndpoint", message.clone())),
            None => Ok(EndpointHandle {
                endpoint_name: request.endpoint_name.clone(),
                model_name: "model".to_string(),
            }),
        }
    }
}

#[derive(Default)]
struct RecordingNotifier {
    fail: bool,
    published: Mutex<Vec<ErrorRecord>>,
}

#[async_trait]
impl NotificationSink for RecordingNotifier {
    async fn publish(&self, record: &ErrorRecord) -> Result<(), ReportError> {
        if self.fail {
            return Err(ReportError::Publish("topic does not exist".to_string()));
        }
        self.published.lock().unwrap().push(record.clone());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingErrorLog {
    fail: bool,
    stored: Mutex<Vec<(String, ErrorRecord)>>,
}

#[async_trait]
impl ErrorLogSink for RecordingErrorLog {
    async fn store(&self, key: &str, record: &ErrorRecord) -> Result<(), ReportError> {
        if self.fail {
            return Err(ReportError::Store("NoSuchBucket".to_string()));
        }
        self.stored
            .lock()
            .unwrap()
            .push((key.to_string(), record.clone()));
        Ok(())
    }
}

struct Harness {
    provisioner: Provisioner,
    deployer: Arc<FakeDeployer>,
    notifier: Arc<RecordingNotifier>,
    error_log: Arc<RecordingErrorLog>,
}

fn harness(
    config: ProvisionerConfig,
    deployer: Arc<FakeDeployer>,
    notifier: RecordingNotifier,
    error_log: RecordingErrorLog,
) -> Harness {
    let notifier = Arc::new(notifier);
    let error_log = Arc::new(error_log);
    let provisioner = Provisioner::new(
        config,
        deployer.clone(),
        notifier.clone(),
        error_log.clone(),
        StructuredLogger::new("endpoint-init-test"),
    );
    Harness {
        provisioner,
        deployer,
        notifier,
        error_log,
    }
}

fn ctx() -> InvocationContext {
    InvocationContext::new("c0ffee-1234")
}

mod success_tests {
    use super::*;

    #[tokio::test]
    async fn test_success_returns_message_without_reporting() {
        let h = harness(
            test_config(),
            FakeDeployer::succeeding(),
            RecordingNotifier::default(),
            RecordingErrorLog::default(),
        );

        let result = h.provisioner.handle(&json!({}), &ctx()).await.unwrap();

        assert_eq!(result, "Successfully created endpoint.");
        assert_eq!(h.deployer.requests().len(), 1);
        assert!(h.notifier.published.lock().unwrap().is_empty());
        assert!(h.error_log.stored.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_request_carries_configuration_and_fixed_settings() {
        let h = harness(
            test_config(),
            FakeDeployer::succeeding(),
            RecordingNotifier::default(),
            RecordingErrorLog::default(),
        );

        h.provisioner.handle(&json!({}), &ctx()).await.unwrap();

        let request = &h.deployer.requests()[0];
        assert_eq!(request.model_data_url, "s3://models/llm/model.tar.gz");
        assert_eq!(
            request.execution_role_arn,
            "arn:aws:iam::123456789012:role/sagemaker"
        );
        assert_eq!(request.endpoint_name, "llm-endpoint");
        assert_eq!(request.instance_type, "ml.g5.4xlarge");
        assert_eq!(request.initial_instance_count, 1);
        assert_eq!(request.health_check_timeout_secs, 1200);
        assert!(request
            .image_uri
            .ends_with("huggingface-pytorch-tgi-inference:2.1.1-tgi1.3.3-gpu-py310-cu121-ubuntu20.04"));
    }

    #[tokio::test]
    async fn test_event_contents_do_not_change_resource_hints() {
        let events = [
            json!(null),
            json!({}),
            json!({"SM_NUM_GPUS": 8, "MAX_INPUT_LENGTH": 1, "endpoint_name": "other"}),
            json!(["unexpected", 42]),
            json!("just a string"),
        ];

        for event in events {
            let h = harness(
                test_config(),
                FakeDeployer::succeeding(),
                RecordingNotifier::default(),
                RecordingErrorLog::default(),
            );
            h.provisioner.handle(&event, &ctx()).await.unwrap();

            let request = &h.deployer.requests()[0];
            assert_eq!(request.resource_hints, ResourceHints::fixed());
            assert_eq!(request.endpoint_name, "llm-endpoint");
        }
    }
}

mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_failure_reports_once_to_each_sink_and_returns_error() {
        let h = harness(
            test_config(),
            FakeDeployer::failing("ResourceLimitExceeded: quota for ml.g5.4xlarge is 0"),
            RecordingNotifier::default(),
            RecordingErrorLog::default(),
        );

        let date_before = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        let err = h.provisioner.handle(&json!({}), &ctx()).await.unwrap_err();
        let date_after = Utc::now().date_naive().format("%Y-%m-%d").to_string();

        match &err {
            DeploymentError::Api { operation, message } => {
                assert_eq!(*operation, "CreateEndpoint");
                assert_eq!(message, "ResourceLimitExceeded: quota for ml.g5.4xlarge is 0");
            }
            other => panic!("unexpected error {:?}", other),
        }

        let published = h.notifier.published.lock().unwrap().clone();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].aws_request_id, "c0ffee-1234");
        assert_eq!(published[0].error, err.to_string());
        assert_eq!(published[0].service, SERVICE_TAG);

        let stored = h.error_log.stored.lock().unwrap().clone();
        assert_eq!(stored.len(), 1);
        let (key, record) = &stored[0];
        assert_eq!(record, &published[0]);
        assert!(key.starts_with("error/endpoint_init/"));
        assert!(key.ends_with("/error.json"));
        assert!(key.contains(&date_before) || key.contains(&date_after));
        assert!(key.contains(&record.timestamp));
    }

    #[tokio::test]
    async fn test_error_message_with_quotes_and_newlines_is_reported_verbatim() {
        let message = "container said \"no\"\nstack:\n\tframe 1";
        let h = harness(
            test_config(),
            FakeDeployer::failing(message),
            RecordingNotifier::default(),
            RecordingErrorLog::default(),
        );

        let err = h.provisioner.handle(&json!({}), &ctx()).await.unwrap_err();

        let published = h.notifier.published.lock().unwrap().clone();
        assert_eq!(published[0].error, err.to_string());
        assert!(published[0].error.contains(message));

        let json = published[0].to_json().unwrap();
        let parsed: ErrorRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, published[0]);
    }

    #[tokio::test]
    async fn test_image_resolution_failure_is_reported_without_deploying() {
        let mut config = test_config();
        config.region = "us-west-3".to_string();

        let h = harness(
            config,
            FakeDeployer::succeeding(),
            RecordingNotifier::default(),
            RecordingErrorLog::default(),
        );

        let err = h.provisioner.handle(&json!({}), &ctx()).await.unwrap_err();

        assert!(matches!(
            err,
            DeploymentError::Image(ImageError::UnsupportedRegion(_))
        ));
        assert!(h.deployer.requests().is_empty());
        assert_eq!(h.notifier.published.lock().unwrap().len(), 1);
        assert_eq!(h.error_log.stored.lock().unwrap().len(), 1);
    }
}

mod reporting_boundary_tests {
    use super::*;

    #[tokio::test]
    async fn test_storage_failure_does_not_mask_deployment_error() {
        let h = harness(
            test_config(),
            FakeDeployer::failing("endpoint already exists"),
            RecordingNotifier::default(),
            RecordingErrorLog {
                fail: true,
                ..Default::default()
            },
        );

        let err = h.provisioner.handle(&json!({}), &ctx()).await.unwrap_err();

        assert!(matches!(err, DeploymentError::Api { .. }));
        assert!(err.to_string().contains("endpoint already exists"));
        assert_eq!(h.notifier.published.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_notification_failure_still_writes_error_log() {
        let h = harness(
            test_config(),
            FakeDeployer::failing("endpoint already exists"),
            RecordingNotifier {
                fail: true,
                ..Default::default()
            },
            RecordingErrorLog::default(),
        );

        let err = h.provisioner.handle(&json!({}), &ctx()).await.unwrap_err();

        assert!(err.to_string().contains("endpoint already exists"));
        assert_eq!(h.error_log.stored.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_reporter_outcome() {
        let notifier = Arc::new(RecordingNotifier::default());
        let error_log = Arc::new(RecordingErrorLog {
            fail: true,
            ..Default::default()
        });
        let reporter = ErrorReporter::new(
            notifier.clone(),
            error_log,
            StructuredLogger::new("endpoint-init-test"),
        );

        let record = ErrorRecord::new(&ctx(), &"boom");
        let outcome = tokio_test::block_on(reporter.report(&record));

        assert_eq!(
            outcome,
            ReportOutcome {
                notified: true,
                stored: false
            }
        );
    }
}

mod configuration_tests {
    use super::*;
    use crate::config::keys;
    use crate::error::ConfigError;
    use std::collections::HashMap;

    #[test]
    fn test_missing_error_bucket_fails_before_any_invocation() {
        let env: HashMap<String, String> = [
            (keys::ENDPOINT_NAME, "llm-endpoint"),
            (keys::MODEL_LOCATION, "s3://models/llm/model.tar.gz"),
            (keys::EXECUTION_ROLE, "arn:aws:iam::123456789012:role/sagemaker"),
            (keys::ACCOUNT_ID, "123456789012"),
            (keys::REGION, "us-east-1"),
            (keys::FAILURE_TOPIC_NAME, "endpoint-failures"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let err = ProvisionerConfig::from_map(env).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Missing {
                key: "ERROR_BUCKET_NAME"
            }
        ));
    }

    #[test]
    fn test_build_deployment_request_uses_region() {
        let mut config = test_config();
        config.region = "eu-south-1".to_string();

        let request = build_deployment_request(&config).unwrap();
        assert!(request
            .image_uri
            .starts_with("692866216735.dkr.ecr.eu-south-1.amazonaws.com/"));
    }
}
