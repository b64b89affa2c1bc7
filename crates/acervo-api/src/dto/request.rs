//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use acervo_entity::audit::{AccessHistoryFilter, AuditAction};
use acervo_entity::permission::AccessLevel;
use acervo_entity::tcc::TccType;
use acervo_entity::user::UserRole;
use acervo_service::academic::{NewStudent, NewTcc, StudentUpdate, TccQuery, TccUpdate};
use acervo_service::auth::SignUp;
use acervo_service::user::{NewUser, UserUpdate};

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Public sign-up: a new organization and its administrator.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    pub phone_number: Option<String>,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(length(min = 1, max = 200, message = "Organization name is required"))]
    pub organization_name: String,
    pub organization_description: Option<String>,
}

impl From<SignUpRequest> for SignUp {
    fn from(req: SignUpRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone_number: req.phone_number,
            password: req.password,
            organization_name: req.organization_name,
            organization_description: req.organization_description,
        }
    }
}

/// Password reset: ask for a code.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
}

/// Password reset: check a code.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyCodeRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(equal = 6, message = "Code must have 6 digits"))]
    pub code: String,
}

/// Password reset: set the new password.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConfirmResetRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(equal = 6, message = "Code must have 6 digits"))]
    pub code: String,
    #[validate(length(min = 6, message = "Password must have at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateOrganizationRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Create user request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone_number: req.phone_number,
            role: req.role,
        }
    }
}

/// Update user request. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
    #[validate(length(min = 6, message = "Password must have at least 6 characters"))]
    pub password: Option<String>,
    pub old_password: Option<String>,
}

impl From<UpdateUserRequest> for UserUpdate {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone_number: req.phone_number,
            role: req.role,
            is_active: req.is_active,
            password: req.password,
            old_password: req.old_password,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub parent_folder_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameFolderRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// `null` or a missing parent moves the folder to the root.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MoveFolderRequest {
    #[serde(default)]
    pub new_parent_folder_id: Option<Uuid>,
}

/// Query of `GET /api/folders/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderSearchQuery {
    pub organization_id: Uuid,
    pub folder_id: Option<Uuid>,
    pub search_term: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateFileRequest {
    #[validate(length(min = 1, max = 255))]
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MoveFileRequest {
    pub new_folder_id: Uuid,
}

/// Grant or change a folder permission.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpsertPermissionRequest {
    pub folder_id: Uuid,
    pub user_id: Uuid,
    pub access_level: AccessLevel,
}

/// Filters of `GET /api/audit`. Pagination comes separately.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditQuery {
    pub user_id: Option<Uuid>,
    pub file_id: Option<Uuid>,
    pub folder_id: Option<Uuid>,
    pub action: Option<AuditAction>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl From<AuditQuery> for AccessHistoryFilter {
    fn from(q: AuditQuery) -> Self {
        Self {
            user_id: q.user_id,
            file_id: q.file_id,
            folder_id: q.folder_id,
            action: q.action,
            start_date: q.start_date,
            end_date: q.end_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub coordinator_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCourseRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub coordinator_id: Option<Uuid>,
}

/// Query of `GET /api/students`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentListQuery {
    pub course_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateStudentRequest {
    pub course_id: Uuid,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, max = 50))]
    pub student_number: String,
}

impl From<CreateStudentRequest> for NewStudent {
    fn from(req: CreateStudentRequest) -> Self {
        Self {
            course_id: req.course_id,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            student_number: req.student_number,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateStudentRequest {
    pub course_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email(message = "A valid email is required"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub student_number: Option<String>,
}

impl From<UpdateStudentRequest> for StudentUpdate {
    fn from(req: UpdateStudentRequest) -> Self {
        Self {
            course_id: req.course_id,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            student_number: req.student_number,
        }
    }
}

/// Filters of `GET /api/tccs`. Pagination comes separately.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TccListQuery {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub tcc_type: Option<TccType>,
    pub year: Option<i32>,
    pub course_id: Option<Uuid>,
}

impl From<TccListQuery> for TccQuery {
    fn from(q: TccListQuery) -> Self {
        Self {
            search: q.search,
            tcc_type: q.tcc_type,
            year: q.year,
            course_id: q.course_id,
        }
    }
}

/// Registers a TCC over files already uploaded through `/api/files/upload`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTccRequest {
    #[validate(length(min = 1, max = 500))]
    pub title: String,
    pub year: i32,
    pub keywords: Option<String>,
    #[serde(rename = "type")]
    pub tcc_type: TccType,
    pub author_id: Uuid,
    pub supervisor_id: Option<Uuid>,
    pub course_id: Uuid,
    pub file_id: Uuid,
    pub defense_record_file_id: Option<Uuid>,
}

impl From<CreateTccRequest> for NewTcc {
    fn from(req: CreateTccRequest) -> Self {
        Self {
            title: req.title,
            year: req.year,
            keywords: req.keywords,
            tcc_type: req.tcc_type,
            author_id: req.author_id,
            supervisor_id: req.supervisor_id,
            course_id: req.course_id,
            file_id: req.file_id,
            defense_record_file_id: req.defense_record_file_id,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTccRequest {
    #[validate(length(min = 1, max = 500))]
    pub title: Option<String>,
    pub year: Option<i32>,
    pub keywords: Option<String>,
    #[serde(rename = "type")]
    pub tcc_type: Option<TccType>,
    pub author_id: Option<Uuid>,
    pub supervisor_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
}

impl From<UpdateTccRequest> for TccUpdate {
    fn from(req: UpdateTccRequest) -> Self {
        Self {
            title: req.title,
            year: req.year,
            keywords: req.keywords,
            tcc_type: req.tcc_type,
            author_id: req.author_id,
            supervisor_id: req.supervisor_id,
            course_id: req.course_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DefenseRecordRequest {
    pub file_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_up_request_requires_organization() {
        let req: SignUpRequest = serde_json::from_value(serde_json::json!({
            "first_name": "Ana",
            "last_name": "Souza",
            "email": "ana@uni.edu",
            "password": "secret-pass",
            "organization_name": ""
        }))
        .unwrap();
        assert!(req.validate().is_err());

        let req = SignUpRequest {
            organization_name: "Universidade Federal".into(),
            ..req
        };
        assert!(req.validate().is_ok());
        let input = SignUp::from(req);
        assert_eq!(input.organization_name, "Universidade Federal");
        assert!(input.phone_number.is_none());
    }

    #[test]
    fn test_verify_code_length() {
        let req = VerifyCodeRequest {
            email: "ana@uni.edu".into(),
            code: "12345".into(),
        };
        assert!(req.validate().is_err());

        let req = VerifyCodeRequest {
            code: "123456".into(),
            ..req
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_user_rejects_bad_email() {
        let req = CreateUserRequest {
            first_name: "Ana".into(),
            last_name: "Souza".into(),
            email: "not-an-email".into(),
            phone_number: None,
            role: UserRole::CourseCoordenator,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_move_folder_null_parent() {
        let req: MoveFolderRequest =
            serde_json::from_str(r#"{"new_parent_folder_id": null}"#).unwrap();
        assert!(req.new_parent_folder_id.is_none());
        let req: MoveFolderRequest = serde_json::from_str("{}").unwrap();
        assert!(req.new_parent_folder_id.is_none());
    }

    #[test]
    fn test_permission_level_wire_format() {
        let req: UpsertPermissionRequest = serde_json::from_value(serde_json::json!({
            "folder_id": Uuid::nil(),
            "user_id": Uuid::nil(),
            "access_level": "MANAGE",
        }))
        .unwrap();
        assert_eq!(req.access_level, AccessLevel::Manage);
    }

    #[test]
    fn test_tcc_request_reads_type_field() {
        let req: CreateTccRequest = serde_json::from_value(serde_json::json!({
            "title": "Redes neurais aplicadas",
            "year": 2024,
            "type": "DISSERTACAO",
            "author_id": Uuid::new_v4(),
            "course_id": Uuid::new_v4(),
            "file_id": Uuid::new_v4()
        }))
        .unwrap();
        assert_eq!(req.tcc_type, TccType::Dissertacao);
        assert!(req.validate().is_ok());
        assert!(req.supervisor_id.is_none());

        let bad = serde_json::from_value::<CreateTccRequest>(serde_json::json!({
            "title": "T",
            "year": 2024,
            "type": "ESSAY",
            "author_id": Uuid::new_v4(),
            "course_id": Uuid::new_v4(),
            "file_id": Uuid::new_v4()
        }));
        assert!(bad.is_err());
    }
}
