use serde::Deserialize;
use serde_json::Value;

use crate::models::lead_models::{LeadError, LeadSubmission};

/// Fields accept any JSON value; the landing page may post numbers for `phone`.
#[derive(Debug, Default, Deserialize)]
pub struct SendEmailRequest {
    pub name: Option<Value>,
    pub email: Option<Value>,
    pub phone: Option<Value>,
    pub message: Option<Value>,
}

// Strings pass through untouched, other values use their JSON text.
fn as_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

impl TryFrom<SendEmailRequest> for LeadSubmission {
    type Error = LeadError;

    fn try_from(request: SendEmailRequest) -> Result<Self, Self::Error> {
        LeadSubmission::from_parts(
            as_text(request.name),
            as_text(request.email),
            as_text(request.phone),
            None,
            as_text(request.message),
        )
    }
}
