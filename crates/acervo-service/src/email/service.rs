//! SMTP delivery through lettre.

use std::str::FromStr;

use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

use acervo_core::config::email::EmailConfig;
use acervo_core::error::{AppError, ErrorKind};

use super::templates;

/// Sends reset codes and welcome messages.
///
/// With `email.enabled = false` messages are logged instead of sent.
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl std::fmt::Debug for EmailService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailService")
            .field("enabled", &self.config.enabled)
            .field("smtp_host", &self.config.smtp_host)
            .finish()
    }
}

impl EmailService {
    /// Creates the service, building the SMTP transport when enabled.
    pub fn new(config: EmailConfig) -> Result<Self, AppError> {
        let transport = if config.enabled {
            let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(
                &config.smtp_host,
            )
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to create SMTP transport",
                    e,
                )
            })?
            .port(config.smtp_port);
            if !config.smtp_username.is_empty() {
                builder = builder.credentials(Credentials::new(
                    config.smtp_username.clone(),
                    config.smtp_password.clone(),
                ));
            }
            Some(builder.build())
        } else {
            info!("Email delivery disabled; messages will be logged");
            None
        };

        Ok(Self { config, transport })
    }

    /// Sends a password-reset code.
    pub async fn send_reset_code(
        &self,
        to_email: &str,
        code: &str,
        ttl_minutes: u64,
    ) -> Result<(), AppError> {
        let (subject, body) = templates::reset_code(code, ttl_minutes);
        self.send(to_email, &subject, body).await
    }

    /// Sends the initial credentials of a new account.
    pub async fn send_welcome(
        &self,
        to_email: &str,
        full_name: &str,
        password: &str,
    ) -> Result<(), AppError> {
        let login_url = format!("{}/login", self.config.frontend_url.trim_end_matches('/'));
        let (subject, body) = templates::welcome(full_name, to_email, password, &login_url);
        self.send(to_email, &subject, body).await
    }

    async fn send(&self, to_email: &str, subject: &str, body: String) -> Result<(), AppError> {
        let Some(transport) = &self.transport else {
            info!(to = %to_email, subject, "Email disabled; message not sent");
            return Ok(());
        };

        let from = Mailbox::from_str(&format!(
            "{} <{}>",
            self.config.from_name, self.config.from_email
        ))
        .map_err(|e| AppError::with_source(ErrorKind::Configuration, "Invalid sender address", e))?;
        let to = Mailbox::from_str(to_email)
            .map_err(|e| AppError::with_source(ErrorKind::Validation, "Invalid recipient address", e))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body)
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to build email", e))?;

        match transport.send(message).await {
            Ok(_) => {
                info!(to = %to_email, subject, "Email sent");
                Ok(())
            }
            Err(e) => {
                error!(to = %to_email, error = %e, "Failed to send email");
                Err(AppError::with_source(
                    ErrorKind::ExternalService,
                    "Failed to send email",
                    e,
                ))
            }
        }
    }
}
