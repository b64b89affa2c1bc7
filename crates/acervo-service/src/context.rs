//! Request context carrying the authenticated user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use acervo_auth::TccActor;
use acervo_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Built by the API layer from a validated token and passed into service
/// methods so that every operation knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// Email from the token.
    pub email: String,
    /// The user's role at the time the token was issued.
    pub role: UserRole,
    /// The organization the user belongs to.
    pub organization_id: Uuid,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, email: String, role: UserRole, organization_id: Uuid) -> Self {
        Self {
            user_id,
            email,
            role,
            organization_id,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Returns whether the current user sees every folder with MANAGE.
    pub fn bypasses_folder_acl(&self) -> bool {
        self.role.bypasses_folder_acl()
    }

    /// The caller as seen by the TCC role rules.
    pub fn tcc_actor(&self) -> TccActor {
        TccActor {
            user_id: self.user_id,
            role: self.role,
            organization_id: self.organization_id,
        }
    }
}
