use crate::email::application::ports::outgoing::email_sender::EmailSender;
use crate::users::application::ports::outgoing::user_notifier::{
    UserNotificationError, UserOnboardingNotifier,
};
use crate::users::application::ports::outgoing::user_repository::CreatedUser;
use rand::Rng;
use std::fmt;
use std::sync::Arc;

/// Emails newly created users a six-digit activation code.
///
/// The code is generated here, not in the roster core: delivery and code
/// lifecycle belong to the notification side of the boundary.
#[derive(Clone)]
pub struct OnboardingEmailService {
    sender: Arc<dyn EmailSender + Send + Sync>,
}

impl fmt::Debug for OnboardingEmailService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnboardingEmailService")
            .field("sender", &"<dyn EmailSender>")
            .finish()
    }
}

impl OnboardingEmailService {
    pub fn new(sender: Arc<dyn EmailSender + Send + Sync>) -> Self {
        Self { sender }
    }

    fn generate_activation_code() -> String {
        let code: u32 = rand::thread_rng().gen_range(0..1_000_000);
        format!("{:06}", code)
    }

    fn compose_body(user: &CreatedUser, code: &str) -> String {
        format!(
            "<h2>Welcome aboard, {first} {last}!</h2>\
             <p>An account has been created for you with the username \
             <strong>{username}</strong>.</p>\
             <p>Your activation code is:</p>\
             <h1 style=\"letter-spacing: 4px;\">{code}</h1>\
             <p>Enter it on your first sign-in to activate the account.</p>",
            first = user.first_name,
            last = user.last_name,
            username = user.username,
            code = code,
        )
    }
}

#[async_trait::async_trait]
impl UserOnboardingNotifier for OnboardingEmailService {
    async fn notify_user_created(&self, user: &CreatedUser) -> Result<(), UserNotificationError> {
        let code = Self::generate_activation_code();
        let body = Self::compose_body(user, &code);

        self.sender
            .send_email(&user.email, "Your account is ready", &body)
            .await
            .map_err(UserNotificationError::DeliveryFailed)
    }
}
