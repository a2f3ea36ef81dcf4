//! The "submit lead" capability and its SMTP strategy.
//!
//! A lead reaches the operator through exactly one [`LeadRelay`]: the server
//! route uses [`SmtpRelay`], the contact form uses
//! [`EmailJsRelay`](crate::api::emailjs::EmailJsRelay). Neither retries.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::lead_models::LeadSubmission;
use crate::utils::lead_email::lead_notification;
use crate::utils::mailer::{MailError, Mailer};

#[derive(Error, Debug)]
pub enum RelayError {
    #[error(transparent)]
    Mail(#[from] MailError),
    #[error("delivery service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("delivery service rejected submission ({status}): {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait LeadRelay: Send + Sync {
    /// Makes a single delivery attempt.
    async fn submit(&self, lead: &LeadSubmission) -> Result<(), RelayError>;
}

pub struct SmtpRelay {
    mailer: Arc<dyn Mailer>,
    from: String,
    recipient: String,
}

impl SmtpRelay {
    pub fn new(mailer: Arc<dyn Mailer>, from: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            mailer,
            from: from.into(),
            recipient: recipient.into(),
        }
    }
}

#[async_trait]
impl LeadRelay for SmtpRelay {
    async fn submit(&self, lead: &LeadSubmission) -> Result<(), RelayError> {
        let email = lead_notification(lead, &self.from, &self.recipient);
        tracing::info!("Relaying lead to {}", self.recipient);
        tracing::debug!("Lead reply address: {}", lead.email);
        self.mailer.send(&email).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::mailer::MockMailer;
    use std::sync::Mutex;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[tokio::test]
    async fn sends_one_notification_to_recipient() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(1)
            .withf(|email| {
                email.from == "site@x.com"
                    && email.to == "ops@x.com"
                    && email.html.contains("Ann")
                    && email.html.contains("+1 555")
            })
            .returning(|_| Ok(()));

        let relay = SmtpRelay::new(Arc::new(mailer), "site@x.com", "ops@x.com");
        let lead = LeadSubmission::new("Ann", "a@x.com").unwrap().with_phone("+1 555");
        relay.submit(&lead).await.unwrap();
    }

    #[tokio::test]
    async fn surfaces_transport_error() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(1)
            .returning(|_| Err(MailError::Smtp("connection refused".into())));

        let relay = SmtpRelay::new(Arc::new(mailer), "site@x.com", "ops@x.com");
        let lead = LeadSubmission::new("Ann", "a@x.com").unwrap();
        let err = relay.submit(&lead).await.unwrap_err();
        assert_eq!(err.to_string(), "SMTP error: connection refused");
    }

    #[tokio::test]
    async fn info_logs_leave_out_visitor_address() {
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(logs.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut mailer = MockMailer::new();
        mailer.expect_send().times(1).returning(|_| Ok(()));
        let relay = SmtpRelay::new(Arc::new(mailer), "site@x.com", "ops@x.com");
        let lead = LeadSubmission::new("Ann", "visitor@example.com").unwrap();
        relay.submit(&lead).await.unwrap();

        let output = logs.contents();
        assert!(output.contains("Relaying lead to ops@x.com"));
        assert!(!output.contains("visitor@example.com"));
    }
}
