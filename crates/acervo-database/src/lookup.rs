//! Persistence seams. The path builder, the permission resolver and the
//! audit recorder use the narrow lookups; the services hold the stores.

use async_trait::async_trait;
use uuid::Uuid;

use acervo_core::result::AppResult;
use acervo_core::types::pagination::{PageRequest, PageResponse};
use acervo_entity::audit::CreateAccessHistoryEntry;
use acervo_entity::course::{Course, CourseSummary, CreateCourse, UpdateCourse};
use acervo_entity::file::{CreateFile, File};
use acervo_entity::folder::{CreateFolder, Folder};
use acervo_entity::permission::{AccessLevel, FolderPermission};
use acervo_entity::student::{CreateStudent, Student, StudentSummary, UpdateStudent};
use acervo_entity::tcc::{CreateTcc, Tcc, TccFilter, TccRecord, UpdateTcc};
use acervo_entity::user::User;

/// Read access to the folder hierarchy.
#[async_trait]
pub trait FolderLookup: Send + Sync {
    /// Find a folder by id.
    async fn folder(&self, id: Uuid) -> AppResult<Option<Folder>>;

    /// Direct children of every folder in `parent_ids`, as `(child_id, parent_id)`.
    async fn child_folder_ids(&self, parent_ids: &[Uuid]) -> AppResult<Vec<(Uuid, Uuid)>>;
}

/// Read access to explicit folder grants.
#[async_trait]
pub trait PermissionLookup: Send + Sync {
    /// The grant for `(user_id, folder_id)`, if one exists.
    async fn grant(&self, user_id: Uuid, folder_id: Uuid) -> AppResult<Option<AccessLevel>>;

    /// Every grant held by `user_id`.
    async fn grants_for_user(&self, user_id: Uuid) -> AppResult<Vec<FolderPermission>>;
}

/// Append-only sink for access history entries.
#[async_trait]
pub trait AccessHistorySink: Send + Sync {
    /// Persist one entry.
    async fn append(&self, entry: &CreateAccessHistoryEntry) -> AppResult<()>;
}

/// Folder persistence behind the folder, file, tree and search services.
#[async_trait]
pub trait FolderStore: FolderLookup + std::fmt::Debug {
    /// Several folders at once, ordered by path.
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Folder>>;

    /// Whether a folder with this name already sits under the same parent.
    async fn exists_sibling(
        &self,
        organization_id: Uuid,
        parent_folder_id: Option<Uuid>,
        name: &str,
    ) -> AppResult<bool>;

    /// All folders of an organization, ordered by path.
    async fn find_by_organization(&self, organization_id: Uuid) -> AppResult<Vec<Folder>>;

    /// Direct children of a folder ordered by name.
    async fn find_children(&self, parent_id: Uuid) -> AppResult<Vec<Folder>>;

    /// Folders of an organization whose name contains `term`, optionally
    /// restricted to `scope`.
    async fn search(
        &self,
        organization_id: Uuid,
        scope: Option<&[Uuid]>,
        term: &str,
    ) -> AppResult<Vec<Folder>>;

    /// IDs of the folders of an organization that directly contain a file.
    async fn ids_with_files(&self, organization_id: Uuid) -> AppResult<Vec<Uuid>>;

    /// Insert a folder.
    async fn create(&self, data: &CreateFolder) -> AppResult<Folder>;

    /// Rename and/or re-parent a folder and rewrite the stored paths of its
    /// whole subtree atomically.
    ///
    /// `folder_paths` holds the new path of the folder itself and of every
    /// descendant folder. File paths follow their folder's new path.
    async fn relocate(
        &self,
        folder_id: Uuid,
        name: &str,
        parent_folder_id: Option<Uuid>,
        folder_paths: &[(Uuid, String)],
    ) -> AppResult<Folder>;

    /// Delete a folder with everything beneath it.
    async fn delete(&self, folder_id: Uuid) -> AppResult<bool>;
}

/// File metadata persistence.
#[async_trait]
pub trait FileStore: Send + Sync + std::fmt::Debug {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>>;

    /// Files directly inside a folder, ordered by display name.
    async fn find_by_folder(&self, folder_id: Uuid) -> AppResult<Vec<File>>;

    /// Every file inside the given folders.
    async fn find_in_folders(&self, folder_ids: &[Uuid]) -> AppResult<Vec<File>>;

    /// Files of an organization, newest first. When `folder_ids` is given
    /// only files inside those folders are returned.
    async fn find_by_organization(
        &self,
        organization_id: Uuid,
        folder_ids: Option<&[Uuid]>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<File>>;

    /// Files whose storage key or display name contains `term`, optionally
    /// restricted to files inside `scope` folders.
    async fn search(
        &self,
        organization_id: Uuid,
        scope: Option<&[Uuid]>,
        term: &str,
    ) -> AppResult<Vec<File>>;

    /// Register an uploaded file. A reused storage key is a conflict.
    async fn create(&self, data: &CreateFile) -> AppResult<File>;

    async fn update_display_name(&self, id: Uuid, display_name: &str) -> AppResult<File>;

    /// Move a file to another folder and store its new path.
    async fn move_to(&self, id: Uuid, folder_id: Uuid, path: &str) -> AppResult<File>;

    /// Delete a file together with its access history.
    async fn delete_with_history(&self, id: Uuid) -> AppResult<bool>;
}

/// Per-organization storage accounting.
#[async_trait]
pub trait StorageUsage: Send + Sync + std::fmt::Debug {
    /// Adjust the used byte count of an organization by `delta`.
    async fn add_used_storage(&self, organization_id: Uuid, delta: i64) -> AppResult<()>;
}

/// Read access to users, for checks that a referenced user exists.
#[async_trait]
pub trait UserLookup: Send + Sync + std::fmt::Debug {
    async fn user(&self, id: Uuid) -> AppResult<Option<User>>;
}

/// Course persistence. Soft-deleted courses are never returned.
#[async_trait]
pub trait CourseStore: Send + Sync + std::fmt::Debug {
    async fn find(&self, organization_id: Uuid, id: Uuid) -> AppResult<Option<Course>>;

    /// Live courses of an organization with their counts, newest first.
    async fn list(&self, organization_id: Uuid) -> AppResult<Vec<CourseSummary>>;

    async fn create(&self, data: &CreateCourse) -> AppResult<Course>;

    async fn update(&self, id: Uuid, data: &UpdateCourse) -> AppResult<Course>;

    /// Mark a course deleted. Returns false when it was already gone.
    async fn soft_delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Which unique student attribute a candidate collides on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentConflict {
    Email,
    StudentNumber,
}

/// Student persistence. Soft-deleted students are never returned.
#[async_trait]
pub trait StudentStore: Send + Sync + std::fmt::Debug {
    async fn find(&self, organization_id: Uuid, id: Uuid) -> AppResult<Option<Student>>;

    /// Live students ordered by name, optionally of one course.
    async fn list(
        &self,
        organization_id: Uuid,
        course_id: Option<Uuid>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<StudentSummary>>;

    /// The first live student other than `exclude` already holding
    /// `email` or `student_number`.
    async fn find_conflict(
        &self,
        organization_id: Uuid,
        email: &str,
        student_number: &str,
        exclude: Option<Uuid>,
    ) -> AppResult<Option<StudentConflict>>;

    async fn create(&self, data: &CreateStudent) -> AppResult<Student>;

    async fn update(&self, id: Uuid, data: &UpdateStudent) -> AppResult<Student>;

    /// Mark a student and every TCC they authored deleted, atomically.
    async fn soft_delete_with_tccs(&self, id: Uuid) -> AppResult<bool>;
}

/// TCC persistence. Soft-deleted TCCs are never returned.
#[async_trait]
pub trait TccStore: Send + Sync + std::fmt::Debug {
    async fn find(&self, organization_id: Uuid, id: Uuid) -> AppResult<Option<TccRecord>>;

    /// Live TCCs matching `filter`, newest first.
    async fn list(
        &self,
        organization_id: Uuid,
        filter: &TccFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<TccRecord>>;

    async fn create(&self, data: &CreateTcc) -> AppResult<Tcc>;

    async fn update(&self, id: Uuid, data: &UpdateTcc) -> AppResult<Tcc>;

    async fn soft_delete(&self, id: Uuid) -> AppResult<bool>;
}
