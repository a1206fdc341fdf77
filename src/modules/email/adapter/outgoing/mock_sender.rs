use crate::email::application::ports::outgoing::email_sender::EmailSender;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// One delivery captured by [`MockEmailSender`].
#[derive(Debug, Clone)]
pub struct RecordedEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// In-memory sender that records every delivery for assertions.
#[derive(Default)]
pub struct MockEmailSender {
    outbox: Arc<Mutex<Vec<RecordedEmail>>>,
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<RecordedEmail> {
        self.outbox.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), String> {
        self.outbox.lock().unwrap().push(RecordedEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
