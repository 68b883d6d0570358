//! Transport that writes each message to the log instead of sending it.

use async_trait::async_trait;

use vitrine_core::Channel;

use super::NotificationGateway;

/// Logs every delivery at `info` and reports success.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingGateway;

#[async_trait]
impl NotificationGateway for LoggingGateway {
    async fn deliver(
        &self,
        channel: Channel,
        recipient: &str,
        subject: Option<&str>,
        body: &str,
    ) -> bool {
        tracing::info!(
            %channel,
            recipient,
            subject = subject.unwrap_or(""),
            body,
            "Notification delivered (simulated transport)"
        );
        true
    }
}
