use async_trait::async_trait;
use tracing::info;

use crate::ServiceError;

/// Outbound text message delivery.
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, phone: &str, message: &str) -> Result<(), ServiceError>;
}

/// Writes the message to the log instead of a gateway. Used when no SMS
/// provider is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSmsSender;

#[async_trait]
impl SmsSender for LogSmsSender {
    async fn send(&self, phone: &str, message: &str) -> Result<(), ServiceError> {
        info!(phone, message, "sms");
        Ok(())
    }
}
