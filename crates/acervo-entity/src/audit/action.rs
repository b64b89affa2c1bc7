//! Audit action enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Actions recorded in the access history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "audit_action", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// A folder was created.
    CreateFolder,
    /// A folder was moved to a new parent.
    MoveFolder,
    /// A file was uploaded.
    UploadFile,
    /// A file was moved to another folder.
    MoveFile,
    /// A file was downloaded.
    DownloadFile,
    /// File metadata was viewed.
    ViewFile,
    /// File metadata was edited.
    EditFile,
}

impl AuditAction {
    /// Return the action as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateFolder => "CREATE_FOLDER",
            Self::MoveFolder => "MOVE_FOLDER",
            Self::UploadFile => "UPLOAD_FILE",
            Self::MoveFile => "MOVE_FILE",
            Self::DownloadFile => "DOWNLOAD_FILE",
            Self::ViewFile => "VIEW_FILE",
            Self::EditFile => "EDIT_FILE",
        }
    }

    /// Whether the action targets a folder rather than a file.
    pub fn is_folder_action(&self) -> bool {
        matches!(self, Self::CreateFolder | Self::MoveFolder)
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = acervo_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CREATE_FOLDER" => Ok(Self::CreateFolder),
            "MOVE_FOLDER" => Ok(Self::MoveFolder),
            "UPLOAD_FILE" => Ok(Self::UploadFile),
            "MOVE_FILE" => Ok(Self::MoveFile),
            "DOWNLOAD_FILE" => Ok(Self::DownloadFile),
            "VIEW_FILE" => Ok(Self::ViewFile),
            "EDIT_FILE" => Ok(Self::EditFile),
            _ => Err(acervo_core::AppError::validation(format!(
                "Invalid audit action: '{s}'"
            ))),
        }
    }
}
