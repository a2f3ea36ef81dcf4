use std::time::Duration;

use thiserror::Error;

use crate::utils::mailer::{SmtpSettings, TlsMode};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 465;
pub const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LEAD_RECIPIENT: &str = "gpodgorniy@gmail.com";

const REQUIRED_VARS: [&str; 2] = ["EMAIL_USER", "EMAIL_PASS"];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingVars(Vec<String>),
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Process-wide settings, read once before the listener binds.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub port: u16,
    pub allowed_origin: String,
    pub lead_recipient: String,
    pub smtp: SmtpSettings,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // An empty value is treated the same as an unset one.
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let missing: Vec<String> = REQUIRED_VARS
            .iter()
            .filter(|key| get(**key).is_none())
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingVars(missing));
        }

        let username = get("EMAIL_USER").unwrap_or_default();
        let password = get("EMAIL_PASS").unwrap_or_default();

        let tls = match get("SMTP_TLS") {
            Some(value) => TlsMode::parse(&value).ok_or(ConfigError::InvalidValue {
                name: "SMTP_TLS".into(),
                value,
            })?,
            None => TlsMode::Tls,
        };

        Ok(Self {
            port: parse_or(&get, "PORT", DEFAULT_PORT)?,
            allowed_origin: get("ALLOWED_ORIGIN")
                .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string()),
            lead_recipient: get("LEAD_RECIPIENT")
                .unwrap_or_else(|| DEFAULT_LEAD_RECIPIENT.to_string()),
            smtp: SmtpSettings {
                host: get("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                port: parse_or(&get, "SMTP_PORT", DEFAULT_SMTP_PORT)?,
                tls,
                username,
                password,
                timeout: Duration::from_secs(parse_or(
                    &get,
                    "SMTP_TIMEOUT",
                    DEFAULT_SMTP_TIMEOUT_SECS,
                )?),
            },
        })
    }

    /// The transport account doubles as the sender address.
    pub fn sender(&self) -> &str {
        &self.smtp.username
    }
}

fn parse_or<T, G>(get: &G, name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            value,
        }),
        None => Ok(default),
    }
}
