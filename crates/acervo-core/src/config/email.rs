//! Outgoing email (SMTP) configuration.

use serde::{Deserialize, Serialize};

/// SMTP settings used for reset codes and welcome messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// When `false`, messages are logged instead of sent.
    #[serde(default)]
    pub enabled: bool,
    /// SMTP relay host.
    #[serde(default = "default_host")]
    pub smtp_host: String,
    /// SMTP port. Port 587 and 2525 use STARTTLS, everything else implicit TLS.
    #[serde(default = "default_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub smtp_username: String,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: String,
    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Sender address.
    #[serde(default = "default_from_email")]
    pub from_email: String,
    /// Frontend base URL embedded in messages.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: default_host(),
            smtp_port: default_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_name: default_from_name(),
            from_email: default_from_email(),
            frontend_url: default_frontend_url(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    587
}

fn default_from_name() -> String {
    "Acervo".to_string()
}

fn default_from_email() -> String {
    "no-reply@acervo.local".to_string()
}

fn default_frontend_url() -> String {
    "http://localhost:3000".to_string()
}
