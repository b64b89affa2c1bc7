//! Role-to-permission mapping definitions.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use acervo_entity::user::UserRole;

/// An organization-level permission, distinct from per-folder access levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemPermission {
    /// Create, update, delete and (de)activate organizations.
    OrganizationManage,
    /// Create users in the caller's organization.
    UserCreate,
    /// Delete users in the caller's organization.
    UserDelete,
    /// Activate or deactivate users.
    UserActivate,
    /// Change another user's role or activation flag through an update.
    UserChangeRole,
    /// Delete users holding the ADMIN role.
    UserDeleteAdmin,
    /// Grant, inspect and revoke folder permissions.
    PermissionManage,
    /// Query the access history.
    AuditView,
    /// Create, update and delete courses.
    CourseManage,
}

/// Mapping from each role to its set of allowed system permissions.
#[derive(Debug, Clone)]
pub struct RbacPolicies {
    policies: HashMap<UserRole, HashSet<SystemPermission>>,
}

impl RbacPolicies {
    /// Creates the default policy set.
    pub fn new() -> Self {
        let mut policies = HashMap::new();

        let manager: HashSet<SystemPermission> = [
            SystemPermission::UserCreate,
            SystemPermission::UserDelete,
            SystemPermission::UserActivate,
            SystemPermission::PermissionManage,
            SystemPermission::AuditView,
            SystemPermission::CourseManage,
        ]
        .into_iter()
        .collect();

        let mut admin = manager.clone();
        admin.extend([
            SystemPermission::OrganizationManage,
            SystemPermission::UserChangeRole,
            SystemPermission::UserDeleteAdmin,
        ]);

        policies.insert(UserRole::Admin, admin);
        policies.insert(UserRole::SistemManager, manager);
        policies.insert(UserRole::CourseCoordenator, HashSet::new());
        policies.insert(UserRole::AcademicRegister, HashSet::new());

        Self { policies }
    }

    /// Returns the set of permissions for the given role.
    pub fn permissions_for_role(&self, role: UserRole) -> HashSet<SystemPermission> {
        self.policies.get(&role).cloned().unwrap_or_default()
    }

    /// Checks whether the given role has the specified permission.
    pub fn has_permission(&self, role: UserRole, permission: SystemPermission) -> bool {
        self.policies
            .get(&role)
            .is_some_and(|perms| perms.contains(&permission))
    }
}

impl Default for RbacPolicies {
    fn default() -> Self {
        Self::new()
    }
}
