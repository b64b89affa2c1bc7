//! TCC type and attached file kind.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Academic level of a TCC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tcc_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TccType {
    /// Undergraduate monograph.
    Monografia,
    /// Master's dissertation.
    Dissertacao,
    /// Doctoral thesis.
    Tese,
}

impl TccType {
    /// Return the type as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monografia => "MONOGRAFIA",
            Self::Dissertacao => "DISSERTACAO",
            Self::Tese => "TESE",
        }
    }
}

impl fmt::Display for TccType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TccType {
    type Err = acervo_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MONOGRAFIA" => Ok(Self::Monografia),
            "DISSERTACAO" => Ok(Self::Dissertacao),
            "TESE" => Ok(Self::Tese),
            _ => Err(acervo_core::AppError::validation(format!(
                "Invalid TCC type: '{s}'. Expected one of: MONOGRAFIA, DISSERTACAO, TESE"
            ))),
        }
    }
}

/// Which file of a TCC to download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TccFileKind {
    /// The thesis document itself.
    Main,
    /// The signed defense record.
    Defense,
}

impl FromStr for TccFileKind {
    type Err = acervo_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "main" => Ok(Self::Main),
            "defense" => Ok(Self::Defense),
            _ => Err(acervo_core::AppError::validation(format!(
                "Invalid file type: '{s}'. Expected 'main' or 'defense'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tcc_type_from_str() {
        assert_eq!("tese".parse::<TccType>().unwrap(), TccType::Tese);
        assert_eq!(
            "DISSERTACAO".parse::<TccType>().unwrap(),
            TccType::Dissertacao
        );
        assert!("thesis".parse::<TccType>().is_err());
    }

    #[test]
    fn test_tcc_type_wire_format() {
        let json = serde_json::to_string(&TccType::Monografia).unwrap();
        assert_eq!(json, "\"MONOGRAFIA\"");
    }

    #[test]
    fn test_file_kind_from_str() {
        assert_eq!("main".parse::<TccFileKind>().unwrap(), TccFileKind::Main);
        assert_eq!(
            "Defense".parse::<TccFileKind>().unwrap(),
            TccFileKind::Defense
        );
        assert!("appendix".parse::<TccFileKind>().is_err());
    }
}
