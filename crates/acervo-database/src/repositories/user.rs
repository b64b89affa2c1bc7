//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use acervo_core::error::{AppError, ErrorKind};
use acervo_core::result::AppResult;
use acervo_core::types::pagination::{PageRequest, PageResponse};
use acervo_entity::organization::{CreateOrganization, Organization};
use acervo_entity::user::{CreateUser, UpdateUser, User, UserRole};

use super::folder::like_pattern;
use super::organization::map_name_conflict;
use crate::lookup::UserLookup;

/// Repository for user CRUD and the ownership-transferring delete.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }

    /// List the users of an organization ordered by name.
    pub async fn find_by_organization(
        &self,
        organization_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<User>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE organization_id = $1")
                .bind(organization_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count users", e)
                })?;

        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE organization_id = $1 \
             ORDER BY first_name ASC, last_name ASC LIMIT $2 OFFSET $3",
        )
        .bind(organization_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list users", e))?;

        Ok(PageResponse::new(users, *page, total as u64))
    }

    /// Case-insensitive substring search over name and email, scoped to
    /// one organization.
    pub async fn search(&self, organization_id: Uuid, term: &str) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE organization_id = $1 \
             AND (first_name ILIKE $2 OR last_name ILIKE $2 OR email ILIKE $2 \
                  OR (first_name || ' ' || last_name) ILIKE $2) \
             ORDER BY first_name ASC, last_name ASC",
        )
        .bind(organization_id)
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search users", e))
    }

    /// Users of an organization holding `role`, ordered by name.
    pub async fn find_by_role(&self, organization_id: Uuid, role: UserRole) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE organization_id = $1 AND role = $2 \
             ORDER BY first_name ASC, last_name ASC",
        )
        .bind(organization_id)
        .bind(role)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list users by role", e)
        })
    }

    /// Create a new user.
    pub async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users \
                (organization_id, first_name, last_name, email, phone_number, password_hash, role) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(data.organization_id)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.phone_number)
        .bind(&data.password_hash)
        .bind(data.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_email_conflict(e, &data.email, "Failed to create user"))
    }

    /// Create an organization and its first user in one transaction.
    ///
    /// `user.organization_id` is ignored; the new organization's id is used.
    pub async fn create_with_organization(
        &self,
        organization: &CreateOrganization,
        user: &CreateUser,
    ) -> AppResult<(Organization, User)> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let org = sqlx::query_as::<_, Organization>(
            "INSERT INTO organizations (name, description) VALUES ($1, $2) RETURNING *",
        )
        .bind(&organization.name)
        .bind(&organization.description)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_name_conflict(e, &organization.name, "Failed to create organization"))?;

        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users \
                (organization_id, first_name, last_name, email, phone_number, password_hash, role) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(org.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.phone_number)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_email_conflict(e, &user.email, "Failed to create user"))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        Ok((org, created))
    }

    /// Apply a partial update.
    pub async fn update(&self, id: Uuid, data: &UpdateUser) -> AppResult<User> {
        let email = data.email.clone().unwrap_or_default();
        sqlx::query_as::<_, User>(
            "UPDATE users SET \
                first_name = COALESCE($2, first_name), \
                last_name = COALESCE($3, last_name), \
                email = COALESCE($4, email), \
                phone_number = COALESCE($5, phone_number), \
                password_hash = COALESCE($6, password_hash), \
                role = COALESCE($7, role), \
                is_active = COALESCE($8, is_active), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.phone_number)
        .bind(&data.password_hash)
        .bind(data.role)
        .bind(data.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_email_conflict(e, &email, "Failed to update user"))?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    /// Replace the password hash of the user with `email`.
    pub async fn update_password_by_email(&self, email: &str, password_hash: &str) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update password", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User '{email}' not found")));
        }
        Ok(())
    }

    /// Another active ADMIN or SISTEM_MANAGER of the organization, other than `exclude_id`.
    pub async fn find_successor(
        &self,
        organization_id: Uuid,
        exclude_id: Uuid,
    ) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users \
             WHERE organization_id = $1 AND id <> $2 AND is_active \
               AND role IN ('ADMIN', 'SISTEM_MANAGER') \
             ORDER BY (role = 'ADMIN') DESC, created_at ASC LIMIT 1",
        )
        .bind(organization_id)
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find successor", e))
    }

    /// Delete a user in one transaction: remove their access history, hand
    /// their uploaded files to `successor_id`, then delete the row.
    pub async fn delete_transferring_files(&self, user_id: Uuid, successor_id: Uuid) -> AppResult<u64> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("DELETE FROM access_history WHERE accessed_by = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete access history", e)
            })?;

        let transferred = sqlx::query(
            "UPDATE files SET uploaded_by = $2, updated_at = NOW() WHERE uploaded_by = $1",
        )
        .bind(user_id)
        .bind(successor_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to transfer files", e))?
        .rows_affected();

        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete user", e))?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        Ok(transferred)
    }
}

#[async_trait]
impl UserLookup for UserRepository {
    async fn user(&self, id: Uuid) -> AppResult<Option<User>> {
        self.find_by_id(id).await
    }
}

fn map_email_conflict(e: sqlx::Error, email: &str, context: &str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_email_key") => {
            AppError::conflict(format!("Email '{email}' is already in use"))
        }
        _ => AppError::with_source(ErrorKind::Database, context.to_string(), e),
    }
}
