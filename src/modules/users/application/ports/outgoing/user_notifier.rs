use crate::users::application::ports::outgoing::user_repository::CreatedUser;

#[derive(Debug, thiserror::Error)]
pub enum UserNotificationError {
    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Fire-and-forget onboarding notification. The collaborator owns code
/// generation and delivery; the core only reports that a user was created.
#[async_trait::async_trait]
pub trait UserOnboardingNotifier: Send + Sync {
    async fn notify_user_created(&self, user: &CreatedUser) -> Result<(), UserNotificationError>;
}
