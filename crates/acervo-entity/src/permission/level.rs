//! Access level enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access a user holds on a folder and everything inside it.
///
/// Ordered by privilege: Manage > Read > NoAccess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "access_level", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessLevel {
    /// Explicitly denied.
    NoAccess,
    /// May list, view and download.
    Read,
    /// May also create, rename, move, upload and delete.
    Manage,
}

impl AccessLevel {
    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::NoAccess => 0,
            Self::Read => 1,
            Self::Manage => 2,
        }
    }

    /// Check if this level satisfies `required`.
    pub fn has_at_least(&self, required: AccessLevel) -> bool {
        self.privilege_level() >= required.privilege_level()
    }

    /// Whether this level allows anything at all.
    pub fn is_granted(&self) -> bool {
        !matches!(self, Self::NoAccess)
    }

    /// Return the level as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoAccess => "NO_ACCESS",
            Self::Read => "READ",
            Self::Manage => "MANAGE",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = acervo_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NO_ACCESS" => Ok(Self::NoAccess),
            "READ" => Ok(Self::Read),
            "MANAGE" => Ok(Self::Manage),
            _ => Err(acervo_core::AppError::validation(format!(
                "Invalid access level: '{s}'. Expected one of: NO_ACCESS, READ, MANAGE"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(AccessLevel::Manage.has_at_least(AccessLevel::Read));
        assert!(AccessLevel::Read.has_at_least(AccessLevel::Read));
        assert!(!AccessLevel::Read.has_at_least(AccessLevel::Manage));
        assert!(!AccessLevel::NoAccess.has_at_least(AccessLevel::Read));
    }

    #[test]
    fn test_is_granted() {
        assert!(!AccessLevel::NoAccess.is_granted());
        assert!(AccessLevel::Read.is_granted());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("read".parse::<AccessLevel>().unwrap(), AccessLevel::Read);
        assert_eq!(
            "NO_ACCESS".parse::<AccessLevel>().unwrap(),
            AccessLevel::NoAccess
        );
        assert!("WRITE".parse::<AccessLevel>().is_err());
    }
}
