//! Role rules for TCC records.
//!
//! - ADMIN and SISTEM_MANAGER read, modify and delete every TCC of their
//!   organization.
//! - COURSE_COORDENATOR reads and modifies TCCs of the courses they
//!   coordinate.
//! - ACADEMIC_REGISTER reads and modifies every TCC of their organization.
//! - Only ADMIN and SISTEM_MANAGER delete.
//!
//! Nobody reaches a TCC of another organization.

use uuid::Uuid;

use acervo_core::error::AppError;
use acervo_core::result::AppResult;
use acervo_entity::user::UserRole;

/// The caller as seen by the TCC rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TccActor {
    pub user_id: Uuid,
    pub role: UserRole,
    pub organization_id: Uuid,
}

/// Where a TCC (or a course's records) sits: its organization and the
/// coordinator of its course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TccScope {
    pub organization_id: Uuid,
    pub coordinator_id: Option<Uuid>,
}

impl TccActor {
    /// Whether the actor may read a TCC in `scope`.
    pub fn can_read(&self, scope: &TccScope) -> bool {
        if scope.organization_id != self.organization_id {
            return false;
        }
        match self.role {
            UserRole::Admin | UserRole::SistemManager | UserRole::AcademicRegister => true,
            UserRole::CourseCoordenator => scope.coordinator_id == Some(self.user_id),
        }
    }

    /// Whether the actor may edit a TCC in `scope`. Creating a TCC or a
    /// student is checked against the scope of the target course.
    pub fn can_modify(&self, scope: &TccScope) -> bool {
        self.can_read(scope)
    }

    /// Whether the actor may delete a TCC in `scope`.
    pub fn can_delete(&self, scope: &TccScope) -> bool {
        self.role.bypasses_folder_acl() && self.can_read(scope)
    }

    /// Only coordinators see a restricted listing: their own courses.
    pub fn listing_coordinator(&self) -> Option<Uuid> {
        (self.role == UserRole::CourseCoordenator).then_some(self.user_id)
    }

    pub fn require_read(&self, scope: &TccScope) -> AppResult<()> {
        check(self.can_read(scope), "You do not have access to this TCC")
    }

    pub fn require_modify(&self, scope: &TccScope) -> AppResult<()> {
        check(
            self.can_modify(scope),
            "You are not allowed to modify this TCC",
        )
    }

    pub fn require_delete(&self, scope: &TccScope) -> AppResult<()> {
        check(
            self.can_delete(scope),
            "Only administrators and system managers can delete TCCs",
        )
    }
}

fn check(allowed: bool, message: &str) -> AppResult<()> {
    if allowed {
        Ok(())
    } else {
        Err(AppError::forbidden(message))
    }
}
