use thiserror::Error;

pub const PHONE_PLACEHOLDER: &str = "Не указан";
pub const MESSAGE_PLACEHOLDER: &str = "Не указано";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LeadError {
    #[error("Name and email are required")]
    MissingRequired,
}

/// A visitor's contact request. Lives for one submit attempt and is never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub preferred_time: Option<String>,
    pub message: Option<String>,
}

// Only an empty string counts as not provided; whitespace is kept as typed.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl LeadSubmission {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Result<Self, LeadError> {
        Self::from_parts(Some(name.into()), Some(email.into()), None, None, None)
    }

    /// Validates raw form/request values. Name and email must both be present.
    pub fn from_parts(
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
        preferred_time: Option<String>,
        message: Option<String>,
    ) -> Result<Self, LeadError> {
        let (name, email) = match (present(name), present(email)) {
            (Some(name), Some(email)) => (name, email),
            _ => return Err(LeadError::MissingRequired),
        };
        Ok(Self {
            name,
            email,
            phone: present(phone),
            preferred_time: present(preferred_time),
            message: present(message),
        })
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = present(Some(phone.into()));
        self
    }

    pub fn with_preferred_time(mut self, preferred_time: impl Into<String>) -> Self {
        self.preferred_time = present(Some(preferred_time.into()));
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = present(Some(message.into()));
        self
    }

    pub fn phone_or_placeholder(&self) -> &str {
        self.phone.as_deref().unwrap_or(PHONE_PLACEHOLDER)
    }

    pub fn message_or_placeholder(&self) -> &str {
        self.message.as_deref().unwrap_or(MESSAGE_PLACEHOLDER)
    }
}
