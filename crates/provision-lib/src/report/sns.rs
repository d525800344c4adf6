//! SNS failure notifications

use super::NotificationSink;
use crate::error::ReportError;
use crate::models::ErrorRecord;
use async_trait::async_trait;
use aws_sdk_sns::error::DisplayErrorContext;
use aws_sdk_sns::Client;
use tracing::debug;

/// Wrap a record for a `json` message structure publish.
///
/// The record is serialized once and carried as the string value of the
/// `default` protocol key.
pub fn notification_envelope(record: &ErrorRecord) -> Result<String, ReportError> {
    let body = record.to_json()?;
    Ok(serde_json::json!({ "default": body }).to_string())
}

/// Publishes error records to an SNS topic
#[derive(Debug, Clone)]
pub struct SnsNotifier {
    client: Client,
    topic_arn: String,
}

impl SnsNotifier {
    pub fn new(client: Client, topic_arn: impl Into<String>) -> Self {
        Self {
            client,
            topic_arn: topic_arn.into(),
        }
    }

    pub fn topic_arn(&self) -> &str {
        &self.topic_arn
    }
}

#[async_trait]
impl NotificationSink for SnsNotifier {
    async fn publish(&self, record: &ErrorRecord) -> Result<(), ReportError> {
        let message = notification_envelope(record)?;

        let output = self
            .client
            .publish()
            .target_arn(&self.topic_arn)
            .message(message)
            .message_structure("json")
            .send()
            .await
            .map_err(|e| ReportError::Publish(DisplayErrorContext(&e).to_string()))?;

        debug!(
            topic_arn = %self.topic_arn,
            message_id = ?output.message_id(),
            "Published failure notification"
        );
        Ok(())
    }
}
