//! S3 error log

use super::ErrorLogSink;
use crate::error::ReportError;
use crate::models::ErrorRecord;
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::debug;

/// Writes error records as JSON objects into a bucket
#[derive(Debug, Clone)]
pub struct S3ErrorLog {
    client: Client,
    bucket: String,
}

impl S3ErrorLog {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ErrorLogSink for S3ErrorLog {
    async fn store(&self, key: &str, record: &ErrorRecord) -> Result<(), ReportError> {
        let body = record.to_json()?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("application/json")
            .body(ByteStream::from(body.into_bytes()))
            .send()
            .await
            .map_err(|e| ReportError::Store(DisplayErrorContext(&e).to_string()))?;

        debug!(bucket = %self.bucket, key = %key, "Stored error record");
        Ok(())
    }
}
