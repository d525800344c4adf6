//! Failure reporting to the notification topic and the error bucket
//!
//! Each sink is attempted independently. A sink that fails is logged and
//! skipped so the deployment error that triggered the report still reaches
//! the caller.

mod s3;
mod sns;

pub use s3::S3ErrorLog;
pub use sns::{notification_envelope, SnsNotifier};

use crate::error::ReportError;
use crate::models::ErrorRecord;
use crate::observability::StructuredLogger;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

/// Publishes error records to subscribers
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn publish(&self, record: &ErrorRecord) -> Result<(), ReportError>;
}

/// Persists error records under an object key
#[async_trait]
pub trait ErrorLogSink: Send + Sync {
    async fn store(&self, key: &str, record: &ErrorRecord) -> Result<(), ReportError>;
}

/// Which sinks accepted a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportOutcome {
    pub notified: bool,
    pub stored: bool,
}

/// Sends an error record to both sinks
#[derive(Clone)]
pub struct ErrorReporter {
    notifier: Arc<dyn NotificationSink>,
    error_log: Arc<dyn ErrorLogSink>,
    logger: StructuredLogger,
}

impl ErrorReporter {
    pub fn new(
        notifier: Arc<dyn NotificationSink>,
        error_log: Arc<dyn ErrorLogSink>,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            notifier,
            error_log,
            logger,
        }
    }

    /// Report `record` to every sink, never failing
    pub async fn report(&self, record: &ErrorRecord) -> ReportOutcome {
        let mut outcome = ReportOutcome::default();

        match self.notifier.publish(record).await {
            Ok(()) => outcome.notified = true,
            Err(e) => self
                .logger
                .log_report_failure("notification", &record.aws_request_id, &e.to_string()),
        }

        let key = record.object_key(Utc::now().date_naive());
        match self.error_log.store(&key, record).await {
            Ok(()) => outcome.stored = true,
            Err(e) => self
                .logger
                .log_report_failure("error_log", &record.aws_request_id, &e.to_string()),
        }

        outcome
    }
}
