//! Password reset by emailed code.

use std::sync::Arc;

use tracing::info;

use acervo_auth::password::{PasswordHasher, PasswordValidator};
use acervo_auth::reset::{RESET_CODE_LENGTH, ResetCodeStore};
use acervo_core::error::AppError;
use acervo_database::repositories::UserRepository;

use crate::email::EmailService;

/// Request, verify and confirm a password reset.
#[derive(Debug, Clone)]
pub struct PasswordResetService {
    user_repo: Arc<UserRepository>,
    codes: ResetCodeStore,
    email: Arc<EmailService>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    code_ttl_minutes: u64,
}

impl PasswordResetService {
    /// Creates a new password reset service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        codes: ResetCodeStore,
        email: Arc<EmailService>,
        hasher: PasswordHasher,
        validator: PasswordValidator,
        code_ttl_minutes: u64,
    ) -> Self {
        Self {
            user_repo,
            codes,
            email,
            hasher,
            validator,
            code_ttl_minutes,
        }
    }

    /// Issues a code for a known email and mails it.
    pub async fn request_reset(&self, email: &str) -> Result<(), AppError> {
        let email = email.trim().to_lowercase();
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::not_found("No user with this email"))?;

        let code = self.codes.issue(&user.email).await?;
        self.email
            .send_reset_code(&user.email, &code, self.code_ttl_minutes)
            .await?;

        info!(user_id = %user.id, "Password reset code sent");
        Ok(())
    }

    /// Checks a code without consuming it.
    pub async fn verify_code(&self, email: &str, code: &str) -> Result<(), AppError> {
        let code = code.trim();
        if code.len() != RESET_CODE_LENGTH {
            return Err(AppError::validation(format!(
                "Code must have {RESET_CODE_LENGTH} digits"
            )));
        }
        self.codes.verify(&email.trim().to_lowercase(), code).await
    }

    /// Sets a new password when the code is valid, then discards the code.
    pub async fn confirm_reset(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        self.validator.validate(new_password)?;
        self.verify_code(email, code).await?;

        let email = email.trim().to_lowercase();
        let hash = self.hasher.hash_password(new_password)?;
        self.user_repo.update_password_by_email(&email, &hash).await?;
        self.codes.consume(&email).await?;

        info!(email = %email, "Password reset completed");
        Ok(())
    }
}
