use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::models::lead_models::LeadSubmission;
use crate::relay::{LeadRelay, RelayError};

pub const DEFAULT_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

// Public identifiers the landing page ships to every browser; quota is enforced by EmailJS.
const DEFAULT_SERVICE_ID: &str = "service_fdgdww7";
const DEFAULT_TEMPLATE_ID: &str = "template_g74a4z9";
const DEFAULT_PUBLIC_KEY: &str = "YgMpsIG3l-K4fxLM8";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailJsConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    pub endpoint: String,
}

impl Default for EmailJsConfig {
    fn default() -> Self {
        Self {
            service_id: DEFAULT_SERVICE_ID.to_string(),
            template_id: DEFAULT_TEMPLATE_ID.to_string(),
            public_key: DEFAULT_PUBLIC_KEY.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl EmailJsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str, default: String| {
            lookup(key).filter(|v| !v.is_empty()).unwrap_or(default)
        };
        Self {
            service_id: get("EMAILJS_SERVICE_ID", defaults.service_id),
            template_id: get("EMAILJS_TEMPLATE_ID", defaults.template_id),
            public_key: get("EMAILJS_PUBLIC_KEY", defaults.public_key),
            endpoint: get("EMAILJS_ENDPOINT", defaults.endpoint),
        }
    }
}

/// Field names match the inputs of the landing page's contact form.
#[derive(Debug, Serialize)]
pub struct TemplateParams<'a> {
    pub from_name: &'a str,
    pub from_email: &'a str,
    pub phone: &'a str,
    pub preferred_time: &'a str,
    pub message: &'a str,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams<'a>,
}

impl<'a> TemplateParams<'a> {
    pub fn from_lead(lead: &'a LeadSubmission) -> Self {
        Self {
            from_name: &lead.name,
            from_email: &lead.email,
            phone: lead.phone.as_deref().unwrap_or(""),
            preferred_time: lead.preferred_time.as_deref().unwrap_or(""),
            message: lead.message.as_deref().unwrap_or(""),
        }
    }
}

pub struct EmailJsRelay {
    client: Client,
    config: EmailJsConfig,
}

impl EmailJsRelay {
    pub fn new(config: EmailJsConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: EmailJsConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl LeadRelay for EmailJsRelay {
    async fn submit(&self, lead: &LeadSubmission) -> Result<(), RelayError> {
        let request = SendRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            template_params: TemplateParams::from_lead(lead),
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        // EmailJS answers a plain "OK" on success; anything else is a failure.
        if status.is_success() && body.trim() == "OK" {
            tracing::info!("EmailJS accepted lead");
            tracing::debug!("EmailJS accepted lead from {}", lead.email);
            Ok(())
        } else {
            tracing::error!("EmailJS rejected lead: {} {}", status, body);
            Err(RelayError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}
