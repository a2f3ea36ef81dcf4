//! State behind the landing page's contact modal.
//!
//! The form moves `Idle -> Submitting -> Success | Error` for each attempt.
//! A successful attempt closes the modal and clears the inputs after
//! [`AUTO_CLOSE_DELAY`]; a failed one only shows a generic localized message.

use std::time::Duration;

use crate::models::lead_models::{LeadError, LeadSubmission};
use crate::relay::LeadRelay;
use crate::utils::i18n::{Locale, Translations};

pub const AUTO_CLOSE_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub preferred_time: String,
    pub message: String,
}

impl ContactFields {
    fn to_lead(&self) -> Result<LeadSubmission, LeadError> {
        let field = |value: &str| Some(value.to_string());
        LeadSubmission::from_parts(
            field(&self.name),
            field(&self.email),
            field(&self.phone),
            field(&self.preferred_time),
            field(&self.message),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Submitting,
    Success,
    Error,
}

#[derive(Debug)]
pub struct ContactForm {
    pub fields: ContactFields,
    locale: Locale,
    phase: FormPhase,
    open: bool,
}

impl ContactForm {
    pub fn new(locale: Locale) -> Self {
        Self {
            fields: ContactFields::default(),
            locale,
            phase: FormPhase::Idle,
            open: false,
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    /// The submit button is disabled while a request is in flight.
    pub fn can_submit(&self) -> bool {
        self.phase != FormPhase::Submitting
    }

    /// Sends the current fields through `relay` once.
    ///
    /// Empty name or email blocks the submit before anything is sent and
    /// leaves the phase untouched, like the browser's `required` check.
    pub async fn submit(&mut self, relay: &dyn LeadRelay) -> Result<FormPhase, LeadError> {
        let lead = self.fields.to_lead()?;

        self.phase = FormPhase::Submitting;
        self.phase = match relay.submit(&lead).await {
            Ok(()) => FormPhase::Success,
            Err(e) => {
                tracing::error!("Contact form submission failed: {}", e);
                FormPhase::Error
            }
        };
        Ok(self.phase)
    }

    /// Waits out the success message, then closes the modal and clears the inputs.
    /// Does nothing unless the last submit succeeded.
    pub async fn auto_close(&mut self) {
        if self.phase != FormPhase::Success {
            return;
        }
        tokio::time::sleep(AUTO_CLOSE_DELAY).await;
        self.close();
        self.fields = ContactFields::default();
        self.phase = FormPhase::Idle;
    }

    pub fn status_message(&self, translations: &Translations) -> Option<String> {
        match self.phase {
            FormPhase::Success => Some(translations.t(self.locale, "contact.success")),
            FormPhase::Error => Some(translations.t(self.locale, "contact.error")),
            FormPhase::Idle | FormPhase::Submitting => None,
        }
    }

    pub fn submit_label(&self, translations: &Translations) -> String {
        let key = if self.phase == FormPhase::Submitting {
            "contact.submitting"
        } else {
            "contact.submit"
        };
        translations.t(self.locale, key)
    }
}
