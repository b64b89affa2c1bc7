//! User CRUD with role rules.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use acervo_auth::password::{PasswordHasher, PasswordValidator, initial_password};
use acervo_auth::rbac::{RbacEnforcer, SystemPermission};
use acervo_core::error::AppError;
use acervo_core::types::pagination::{PageRequest, PageResponse};
use acervo_database::repositories::UserRepository;
use acervo_entity::user::{CreateUser, UpdateUser, User, UserRole};

use crate::context::RequestContext;
use crate::email::EmailService;

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
}

/// Partial update of a user. `password` requires `old_password`.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
    pub password: Option<String>,
    pub old_password: Option<String>,
}

/// Manages user accounts inside an organization.
#[derive(Debug, Clone)]
pub struct UserService {
    user_repo: Arc<UserRepository>,
    rbac: Arc<RbacEnforcer>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    email: Arc<EmailService>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        rbac: Arc<RbacEnforcer>,
        hasher: PasswordHasher,
        validator: PasswordValidator,
        email: Arc<EmailService>,
    ) -> Self {
        Self {
            user_repo,
            rbac,
            hasher,
            validator,
            email,
        }
    }

    /// Creates a user in the caller's organization with a generated
    /// password, then mails the credentials.
    ///
    /// A failed welcome message is logged; the user is still created.
    pub async fn create_user(&self, ctx: &RequestContext, input: NewUser) -> Result<User, AppError> {
        self.rbac.require_permission(ctx.role, SystemPermission::UserCreate)?;
        if input.role.is_admin() {
            self.rbac
                .require_permission(ctx.role, SystemPermission::UserChangeRole)?;
        }

        let first_name = required(&input.first_name, "first_name")?;
        let last_name = required(&input.last_name, "last_name")?;
        let email = normalize_email(&input.email)?;

        let password = initial_password(first_name);
        let password_hash = self.hasher.hash_password(&password)?;

        let user = self
            .user_repo
            .create(&CreateUser {
                organization_id: ctx.organization_id,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email,
                phone_number: input.phone_number.filter(|p| !p.trim().is_empty()),
                password_hash,
                role: input.role,
            })
            .await?;

        if let Err(e) = self
            .email
            .send_welcome(&user.email, &user.full_name(), &password)
            .await
        {
            warn!(user_id = %user.id, error = %e, "Failed to send welcome email");
        }

        info!(created_by = %ctx.user_id, user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    /// Lists the users of the caller's organization.
    pub async fn list_users(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<PageResponse<User>, AppError> {
        self.user_repo
            .find_by_organization(ctx.organization_id, &page)
            .await
    }

    /// Searches the caller's organization by name or email.
    ///
    /// An empty result is reported as not found.
    pub async fn search_users(&self, ctx: &RequestContext, term: &str) -> Result<Vec<User>, AppError> {
        let term = required(term, "search term")?;
        let users = self.user_repo.search(ctx.organization_id, term).await?;
        if users.is_empty() {
            return Err(AppError::not_found(format!("No users match '{term}'")));
        }
        Ok(users)
    }

    /// Lists the course coordinators of the caller's organization.
    pub async fn list_coordinators(&self, ctx: &RequestContext) -> Result<Vec<User>, AppError> {
        self.user_repo
            .find_by_role(ctx.organization_id, UserRole::CourseCoordenator)
            .await
    }

    /// Gets a user of the caller's organization.
    pub async fn get_user(&self, ctx: &RequestContext, user_id: Uuid) -> Result<User, AppError> {
        self.user_in_org(ctx, user_id).await
    }

    /// Updates a user.
    ///
    /// Only admins or the user themselves may update; only admins change
    /// `role` or `is_active`. A new password must come with the current one.
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        input: UserUpdate,
    ) -> Result<User, AppError> {
        let target = self.user_in_org(ctx, user_id).await?;

        if !ctx.is_admin() && ctx.user_id != target.id {
            return Err(AppError::forbidden("You can only update your own account"));
        }
        if input.role.is_some() || input.is_active.is_some() {
            self.rbac
                .require_permission(ctx.role, SystemPermission::UserChangeRole)?;
        }

        let password_hash = match &input.password {
            Some(password) => {
                let old = input
                    .old_password
                    .as_deref()
                    .ok_or_else(|| AppError::validation("old_password is required to change the password"))?;
                if !self.hasher.verify_password(old, &target.password_hash)? {
                    return Err(AppError::validation("Old password is incorrect"));
                }
                self.validator.validate(password)?;
                Some(self.hasher.hash_password(password)?)
            }
            None => None,
        };

        let email = input.email.as_deref().map(normalize_email).transpose()?;

        let updated = self
            .user_repo
            .update(
                target.id,
                &UpdateUser {
                    first_name: optional(input.first_name),
                    last_name: optional(input.last_name),
                    email,
                    phone_number: input.phone_number,
                    password_hash,
                    role: input.role,
                    is_active: input.is_active,
                },
            )
            .await?;

        info!(updated_by = %ctx.user_id, user_id = %updated.id, "User updated");
        Ok(updated)
    }

    /// Deletes a user, handing their uploaded files to another active
    /// administrator of the organization.
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: Uuid) -> Result<(), AppError> {
        self.rbac.require_permission(ctx.role, SystemPermission::UserDelete)?;
        if ctx.user_id == user_id {
            return Err(AppError::validation("You cannot delete your own account"));
        }

        let target = self.user_in_org(ctx, user_id).await?;
        if target.role.is_admin() {
            self.rbac
                .require_permission(ctx.role, SystemPermission::UserDeleteAdmin)?;
        }

        let successor = self
            .user_repo
            .find_successor(ctx.organization_id, target.id)
            .await?
            .ok_or_else(|| {
                AppError::validation(
                    "No other active administrator to receive this user's files",
                )
            })?;

        let transferred = self
            .user_repo
            .delete_transferring_files(target.id, successor.id)
            .await?;

        info!(
            deleted_by = %ctx.user_id,
            user_id = %target.id,
            successor_id = %successor.id,
            transferred,
            "User deleted"
        );
        Ok(())
    }

    /// Activates or deactivates a user.
    pub async fn set_active(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        is_active: bool,
    ) -> Result<User, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::UserActivate)?;
        let target = self.user_in_org(ctx, user_id).await?;

        let updated = self
            .user_repo
            .update(
                target.id,
                &UpdateUser {
                    is_active: Some(is_active),
                    ..UpdateUser::default()
                },
            )
            .await?;

        info!(changed_by = %ctx.user_id, user_id = %updated.id, is_active, "User activation changed");
        Ok(updated)
    }

    async fn user_in_org(&self, ctx: &RequestContext, user_id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .filter(|u| u.organization_id == ctx.organization_id)
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}

pub(crate) fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{field} cannot be empty")));
    }
    Ok(value)
}

pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Lowercases and trims an email address, rejecting obvious garbage.
pub(crate) fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(AppError::validation(format!("Invalid email address: '{email}'"))),
    }
}
