//! Sign-up, login and bearer token validation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use acervo_auth::jwt::{JwtDecoder, JwtEncoder};
use acervo_auth::password::{PasswordHasher, PasswordValidator};
use acervo_core::error::AppError;
use acervo_database::repositories::UserRepository;
use acervo_entity::organization::CreateOrganization;
use acervo_entity::user::{CreateUser, User, UserRole};

use crate::context::RequestContext;
use crate::user::service::normalize_email;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Result of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    /// Bearer token.
    pub token: String,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
    /// The logged-in user.
    pub user: User,
}

/// Self-service registration of a new organization and its administrator.
#[derive(Debug, Clone)]
pub struct SignUp {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub password: String,
    pub organization_name: String,
    pub organization_description: Option<String>,
}

/// Handles sign-up and login and turns bearer tokens into request contexts.
#[derive(Debug, Clone)]
pub struct AuthService {
    user_repo: Arc<UserRepository>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    encoder: JwtEncoder,
    decoder: JwtDecoder,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        hasher: PasswordHasher,
        validator: PasswordValidator,
        encoder: JwtEncoder,
        decoder: JwtDecoder,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            validator,
            encoder,
            decoder,
        }
    }

    /// Creates an organization with an ADMIN account and logs that account in.
    ///
    /// Both rows are written in one transaction. A taken email or
    /// organization name is a conflict.
    pub async fn sign_up(&self, input: SignUp) -> Result<LoginResult, AppError> {
        self.validator.validate(&input.password)?;
        let password_hash = self.hasher.hash_password(&input.password)?;
        let (organization, admin) = sign_up_records(input, password_hash)?;

        if self.user_repo.find_by_email(&admin.email).await?.is_some() {
            return Err(AppError::conflict(format!(
                "Email '{}' is already in use",
                admin.email
            )));
        }

        let (org, user) = self
            .user_repo
            .create_with_organization(&organization, &admin)
            .await?;

        let issued = self.encoder.issue(&user)?;
        info!(
            organization_id = %org.id,
            user_id = %user.id,
            "Organization registered"
        );

        Ok(LoginResult {
            token: issued.token,
            expires_at: issued.expires_at,
            user,
        })
    }

    /// Checks credentials and issues a token.
    ///
    /// Unknown email and wrong password fail the same way.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AppError> {
        let email = email.trim().to_lowercase();

        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            warn!(email = %email, "Login attempt for unknown email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        if !user.is_active {
            return Err(AppError::forbidden("This account is deactivated"));
        }

        let issued = self.encoder.issue(&user)?;
        info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(LoginResult {
            token: issued.token,
            expires_at: issued.expires_at,
            user,
        })
    }

    /// Validates a bearer token.
    pub fn authenticate(&self, token: &str) -> Result<RequestContext, AppError> {
        let claims = self.decoder.decode(token)?;
        Ok(RequestContext::new(
            claims.user_id(),
            claims.email,
            claims.role,
            claims.org,
        ))
    }

    /// The user behind the current request.
    pub async fn me(&self, ctx: &RequestContext) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("User no longer exists"))
    }
}

/// Normalized rows for a sign-up. The organization id of the user is
/// filled in when the organization is inserted.
fn sign_up_records(
    input: SignUp,
    password_hash: String,
) -> Result<(CreateOrganization, CreateUser), AppError> {
    let organization_name = input.organization_name.trim().to_string();
    let first_name = input.first_name.trim().to_string();
    let last_name = input.last_name.trim().to_string();
    if organization_name.is_empty() {
        return Err(AppError::validation("Organization name is required"));
    }
    if first_name.is_empty() || last_name.is_empty() {
        return Err(AppError::validation("First and last name are required"));
    }

    let organization = CreateOrganization {
        name: organization_name,
        description: input
            .organization_description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
    };
    let admin = CreateUser {
        organization_id: uuid::Uuid::nil(),
        first_name,
        last_name,
        email: normalize_email(&input.email)?,
        phone_number: input
            .phone_number
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty()),
        password_hash,
        role: UserRole::Admin,
    };
    Ok((organization, admin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use acervo_core::error::ErrorKind;

    fn input() -> SignUp {
        SignUp {
            first_name: " Ana ".into(),
            last_name: "Souza".into(),
            email: "Ana@Uni.EDU".into(),
            phone_number: Some("  ".into()),
            password: "secret-pass".into(),
            organization_name: "  Universidade Federal ".into(),
            organization_description: None,
        }
    }

    #[test]
    fn test_sign_up_records_create_an_admin() {
        let (org, admin) = sign_up_records(input(), "hash".into()).unwrap();
        assert_eq!(org.name, "Universidade Federal");
        assert_eq!(admin.role, UserRole::Admin);
        assert_eq!(admin.email, "ana@uni.edu");
        assert_eq!(admin.first_name, "Ana");
        assert_eq!(admin.phone_number, None);
        assert_eq!(admin.password_hash, "hash");
    }

    #[test]
    fn test_sign_up_requires_organization_name() {
        let mut bad = input();
        bad.organization_name = "   ".into();
        let err = sign_up_records(bad, "hash".into()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_sign_up_rejects_bad_email() {
        let mut bad = input();
        bad.email = "not-an-email".into();
        assert!(sign_up_records(bad, "hash".into()).is_err());
    }
}
