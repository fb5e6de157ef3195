//! Application configuration loaded from environment variables.
//!
//! Fail-fast: required variables must be present and valid or the process
//! exits with a clear message before binding the listener. Secrets are
//! held in this struct and passed by reference into the services; they are
//! never re-read from the environment after startup.

use std::env;
use std::time::Duration;

use thiserror::Error;
use trueview_provisioning::ActivationPolicy;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

/// SMTP settings. Optional as a group: without them the server runs with a
/// logging-only notifier (development mode).
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

/// Cloudinary credentials for the media-storage collaborator.
#[derive(Debug, Clone)]
pub struct CloudinarySettings {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Full server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Shared secret for CRM webhook signatures.
    pub webhook_secret: String,
    /// HS256 signing secret for session tokens.
    pub session_secret: String,
    pub admin_username: String,
    /// Argon2id hash of the operator password.
    pub admin_password_hash: String,
    pub portal_url: String,
    pub operator_email: String,
    pub activation_policy: ActivationPolicy,
    /// Upper bound for a single notification dispatch.
    pub notify_timeout: Duration,
    pub smtp: Option<SmtpSettings>,
    pub cloudinary: CloudinarySettings,
    pub rust_log: String,
}

fn required(var: &str) -> Result<String, ConfigError> {
    env::var(var)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::Missing(var.to_string()))
}

fn optional(var: &str) -> Option<String> {
    env::var(var).ok().filter(|value| !value.is_empty())
}

impl Config {
    /// Load and validate configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first missing or invalid variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = optional("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match optional("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                var: "PORT".to_string(),
                message: format!("Not a port number: {value}"),
            })?,
            None => 8080,
        };

        let activation_policy = match optional("ACTIVATION_POLICY").as_deref() {
            None | Some("immediate") => ActivationPolicy::Immediate,
            Some("on_deposit") => ActivationPolicy::OnDeposit,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    var: "ACTIVATION_POLICY".to_string(),
                    message: format!("Expected 'immediate' or 'on_deposit', got '{other}'"),
                })
            }
        };

        let notify_timeout = match optional("NOTIFY_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(value.parse().map_err(|_| {
                ConfigError::InvalidValue {
                    var: "NOTIFY_TIMEOUT_SECS".to_string(),
                    message: format!("Not a number of seconds: {value}"),
                }
            })?),
            None => Duration::from_secs(10),
        };

        let smtp = match optional("SMTP_HOST") {
            Some(smtp_host) => Some(SmtpSettings {
                host: smtp_host,
                port: match optional("SMTP_PORT") {
                    Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                        var: "SMTP_PORT".to_string(),
                        message: format!("Not a port number: {value}"),
                    })?,
                    None => 587,
                },
                username: required("SMTP_USER")?,
                password: required("SMTP_PASS")?,
                from: required("SMTP_FROM")?,
            }),
            None => None,
        };

        Ok(Self {
            host,
            port,
            database_url: required("DATABASE_URL")?,
            webhook_secret: required("HONEYBOOK_WEBHOOK_SECRET")?,
            session_secret: required("SESSION_SIGNING_SECRET")?,
            admin_username: required("ADMIN_USERNAME")?,
            admin_password_hash: required("ADMIN_PASSWORD_HASH")?,
            portal_url: optional("PORTAL_URL").unwrap_or_else(|| "http://localhost:8080".to_string()),
            operator_email: required("OPERATOR_EMAIL")?,
            activation_policy,
            notify_timeout,
            smtp,
            cloudinary: CloudinarySettings {
                cloud_name: required("CLOUDINARY_CLOUD_NAME")?,
                api_key: required("CLOUDINARY_API_KEY")?,
                api_secret: required("CLOUDINARY_API_SECRET")?,
            },
            rust_log: optional("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_variable_is_named() {
        let err = required("TRUEVIEW_TEST_UNSET_VARIABLE").unwrap_err();
        assert!(err
            .to_string()
            .contains("TRUEVIEW_TEST_UNSET_VARIABLE"));
    }
}
