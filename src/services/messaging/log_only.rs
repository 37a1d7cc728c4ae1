use async_trait::async_trait;

use super::MessagingProvider;

/// Used when no SMS gateway is configured: messages only reach the log.
pub struct LogMessagingProvider;

#[async_trait]
impl MessagingProvider for LogMessagingProvider {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()> {
        tracing::info!(to, body, "message not sent, no SMS gateway configured");
        Ok(())
    }
}
