//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles a user can hold inside an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Organization administrator.
    Admin,
    /// System manager; manages users and folder grants.
    SistemManager,
    /// Course coordinator.
    CourseCoordenator,
    /// Academic registry staff.
    AcademicRegister,
}

impl UserRole {
    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Roles that are granted MANAGE on every folder of their organization
    /// without an explicit folder permission.
    pub fn bypasses_folder_acl(&self) -> bool {
        matches!(self, Self::Admin | Self::SistemManager)
    }

    /// Return the role as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::SistemManager => "SISTEM_MANAGER",
            Self::CourseCoordenator => "COURSE_COORDENATOR",
            Self::AcademicRegister => "ACADEMIC_REGISTER",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = acervo_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "SISTEM_MANAGER" => Ok(Self::SistemManager),
            "COURSE_COORDENATOR" => Ok(Self::CourseCoordenator),
            "ACADEMIC_REGISTER" => Ok(Self::AcademicRegister),
            _ => Err(acervo_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: ADMIN, SISTEM_MANAGER, \
                 COURSE_COORDENATOR, ACADEMIC_REGISTER"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bypass_roles() {
        assert!(UserRole::Admin.bypasses_folder_acl());
        assert!(UserRole::SistemManager.bypasses_folder_acl());
        assert!(!UserRole::CourseCoordenator.bypasses_folder_acl());
        assert!(!UserRole::AcademicRegister.bypasses_folder_acl());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("ADMIN".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!(
            "sistem_manager".parse::<UserRole>().unwrap(),
            UserRole::SistemManager
        );
        assert!("librarian".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_serde_wire_format() {
        let json = serde_json::to_string(&UserRole::CourseCoordenator).unwrap();
        assert_eq!(json, "\"COURSE_COORDENATOR\"");
    }
}
