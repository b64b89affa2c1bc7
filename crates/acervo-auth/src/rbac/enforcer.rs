//! RBAC enforcement: checks whether a role holds a system permission.

use acervo_core::error::AppError;
use acervo_entity::user::UserRole;

use super::policies::{RbacPolicies, SystemPermission};

/// Enforces role-based access control for organization-level operations.
#[derive(Debug, Clone, Default)]
pub struct RbacEnforcer {
    policies: RbacPolicies,
}

impl RbacEnforcer {
    /// Creates a new enforcer with the default policy set.
    pub fn new() -> Self {
        Self {
            policies: RbacPolicies::new(),
        }
    }

    /// Creates an enforcer with custom policies.
    pub fn with_policies(policies: RbacPolicies) -> Self {
        Self { policies }
    }

    /// Returns `Err(Forbidden)` unless `role` holds `permission`.
    pub fn require_permission(
        &self,
        role: UserRole,
        permission: SystemPermission,
    ) -> Result<(), AppError> {
        if self.policies.has_permission(role, permission) {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "Role '{role}' does not have permission '{permission:?}'"
            )))
        }
    }

    /// Checks whether the role has the permission.
    pub fn has_permission(&self, role: UserRole, permission: SystemPermission) -> bool {
        self.policies.has_permission(role, permission)
    }

    /// Returns whether the role is an admin.
    pub fn is_admin(&self, role: UserRole) -> bool {
        role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acervo_core::error::ErrorKind;

    #[test]
    fn test_admin_has_everything_manager_has() {
        let rbac = RbacEnforcer::new();
        for perm in RbacPolicies::new().permissions_for_role(UserRole::SistemManager) {
            assert!(rbac.has_permission(UserRole::Admin, perm));
        }
    }

    #[test]
    fn test_manager_cannot_manage_organizations() {
        let rbac = RbacEnforcer::new();
        let err = rbac
            .require_permission(UserRole::SistemManager, SystemPermission::OrganizationManage)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert!(rbac
            .require_permission(UserRole::SistemManager, SystemPermission::PermissionManage)
            .is_ok());
    }

    #[test]
    fn test_staff_roles_hold_nothing() {
        let rbac = RbacEnforcer::new();
        assert!(!rbac.has_permission(UserRole::CourseCoordenator, SystemPermission::AuditView));
        assert!(!rbac.has_permission(UserRole::AcademicRegister, SystemPermission::UserCreate));
    }
}
