use async_trait::async_trait;

/// Transport-agnostic mail seam. Adapters own addressing and delivery
/// mechanics; callers hand over a rendered HTML body.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), String>;
}
