//! Repository implementations for all Acervo entities.

pub mod access_history;
pub mod course;
pub mod file;
pub mod folder;
pub mod organization;
pub mod permission;
pub mod student;
pub mod tcc;
pub mod user;

pub use access_history::AccessHistoryRepository;
pub use course::CourseRepository;
pub use file::FileRepository;
pub use folder::FolderRepository;
pub use organization::OrganizationRepository;
pub use permission::PermissionRepository;
pub use student::StudentRepository;
pub use tcc::TccRepository;
pub use user::UserRepository;
