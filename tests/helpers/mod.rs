//! Shared in-memory fakes for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use acervo_core::AppError;
use acervo_core::result::AppResult;
use acervo_core::traits::storage::{ByteStream, StorageProvider};
use acervo_core::types::pagination::{PageRequest, PageResponse};
use acervo_database::{
    AccessHistorySink, CourseStore, FileStore, FolderLookup, FolderStore, PermissionLookup,
    StorageUsage, StudentConflict, StudentStore, TccStore, UserLookup,
};
use acervo_entity::audit::CreateAccessHistoryEntry;
use acervo_entity::course::{Course, CourseSummary, CreateCourse, UpdateCourse};
use acervo_entity::file::{CreateFile, File};
use acervo_entity::folder::{CreateFolder, Folder};
use acervo_entity::permission::{AccessLevel, FolderPermission};
use acervo_entity::student::{CreateStudent, Student, StudentSummary, UpdateStudent};
use acervo_entity::tcc::{CreateTcc, Tcc, TccFilter, TccRecord, UpdateTcc};
use acervo_entity::user::{User, UserRole};

/// One organization's folder hierarchy.
#[derive(Debug, Default)]
pub struct TestFolders {
    pub organization_id: Uuid,
    folders: Mutex<HashMap<Uuid, Folder>>,
}

impl TestFolders {
    pub fn new(organization_id: Uuid) -> Self {
        Self {
            organization_id,
            folders: Mutex::default(),
        }
    }

    /// Inserts a folder with a precomputed path.
    pub fn insert(&self, name: &str, path: &str, parent: Option<Uuid>) -> Uuid {
        let folder = Folder {
            id: Uuid::new_v4(),
            name: name.to_string(),
            path: path.to_string(),
            parent_folder_id: parent,
            organization_id: self.organization_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let id = folder.id;
        self.folders.lock().unwrap().insert(id, folder);
        id
    }

    pub fn reparent(&self, id: Uuid, parent: Option<Uuid>) {
        if let Some(folder) = self.folders.lock().unwrap().get_mut(&id) {
            folder.parent_folder_id = parent;
        }
    }

    pub fn all(&self) -> Vec<Folder> {
        self.folders.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl FolderLookup for TestFolders {
    async fn folder(&self, id: Uuid) -> AppResult<Option<Folder>> {
        Ok(self.folders.lock().unwrap().get(&id).cloned())
    }

    async fn child_folder_ids(&self, parent_ids: &[Uuid]) -> AppResult<Vec<(Uuid, Uuid)>> {
        let folders = self.folders.lock().unwrap();
        Ok(folders
            .values()
            .filter_map(|f| match f.parent_folder_id {
                Some(p) if parent_ids.contains(&p) => Some((f.id, p)),
                _ => None,
            })
            .collect())
    }
}

#[async_trait]
impl FolderStore for TestFolders {
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Folder>> {
        let folders = self.folders.lock().unwrap();
        Ok(ids.iter().filter_map(|id| folders.get(id).cloned()).collect())
    }

    async fn exists_sibling(
        &self,
        organization_id: Uuid,
        parent_folder_id: Option<Uuid>,
        name: &str,
    ) -> AppResult<bool> {
        Ok(self.folders.lock().unwrap().values().any(|f| {
            f.organization_id == organization_id
                && f.parent_folder_id == parent_folder_id
                && f.name == name
        }))
    }

    async fn find_by_organization(&self, organization_id: Uuid) -> AppResult<Vec<Folder>> {
        let mut folders: Vec<Folder> = self
            .all()
            .into_iter()
            .filter(|f| f.organization_id == organization_id)
            .collect();
        folders.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(folders)
    }

    async fn find_children(&self, parent_id: Uuid) -> AppResult<Vec<Folder>> {
        let mut children: Vec<Folder> = self
            .all()
            .into_iter()
            .filter(|f| f.parent_folder_id == Some(parent_id))
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    async fn search(
        &self,
        organization_id: Uuid,
        scope: Option<&[Uuid]>,
        term: &str,
    ) -> AppResult<Vec<Folder>> {
        let term = term.to_lowercase();
        Ok(self
            .find_by_organization(organization_id)
            .await?
            .into_iter()
            .filter(|f| scope.is_none_or(|ids| ids.contains(&f.id)))
            .filter(|f| f.name.to_lowercase().contains(&term))
            .collect())
    }

    async fn ids_with_files(&self, _organization_id: Uuid) -> AppResult<Vec<Uuid>> {
        Ok(Vec::new())
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        let folder = Folder {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            path: data.path.clone(),
            parent_folder_id: data.parent_folder_id,
            organization_id: data.organization_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.folders.lock().unwrap().insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn relocate(
        &self,
        folder_id: Uuid,
        name: &str,
        parent_folder_id: Option<Uuid>,
        folder_paths: &[(Uuid, String)],
    ) -> AppResult<Folder> {
        let mut folders = self.folders.lock().unwrap();
        for (id, path) in folder_paths {
            if let Some(folder) = folders.get_mut(id) {
                folder.path = path.clone();
            }
        }
        let folder = folders
            .get_mut(&folder_id)
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        folder.name = name.to_string();
        folder.parent_folder_id = parent_folder_id;
        Ok(folder.clone())
    }

    async fn delete(&self, folder_id: Uuid) -> AppResult<bool> {
        Ok(self.folders.lock().unwrap().remove(&folder_id).is_some())
    }
}

/// File records of one organization.
#[derive(Debug, Default)]
pub struct TestFiles {
    files: Mutex<HashMap<Uuid, File>>,
}

impl TestFiles {
    /// Registers a file inside `folder`, keyed `<display_name>.pdf`.
    pub fn add(&self, folder: &Folder, display_name: &str, size_bytes: i64) -> File {
        let filename = format!("{}_{}.pdf", display_name.to_lowercase(), Uuid::new_v4().simple());
        let file = File {
            id: Uuid::new_v4(),
            path: format!("{}/{filename}", folder.path),
            filename,
            display_name: display_name.to_string(),
            mime_type: "application/pdf".to_string(),
            size_bytes,
            folder_id: folder.id,
            organization_id: folder.organization_id,
            uploaded_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.files.lock().unwrap().insert(file.id, file.clone());
        file
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.files.lock().unwrap().contains_key(&id)
    }

    fn matching(&self, keep: impl Fn(&File) -> bool) -> Vec<File> {
        let mut files: Vec<File> = self
            .files
            .lock()
            .unwrap()
            .values()
            .filter(|f| keep(f))
            .cloned()
            .collect();
        files.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        files
    }
}

#[async_trait]
impl FileStore for TestFiles {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        Ok(self.files.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_folder(&self, folder_id: Uuid) -> AppResult<Vec<File>> {
        Ok(self.matching(|f| f.folder_id == folder_id))
    }

    async fn find_in_folders(&self, folder_ids: &[Uuid]) -> AppResult<Vec<File>> {
        Ok(self.matching(|f| folder_ids.contains(&f.folder_id)))
    }

    async fn find_by_organization(
        &self,
        organization_id: Uuid,
        folder_ids: Option<&[Uuid]>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<File>> {
        let files = self.matching(|f| {
            f.organization_id == organization_id
                && folder_ids.is_none_or(|ids| ids.contains(&f.folder_id))
        });
        let total = files.len() as u64;
        let items = files
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, *page, total))
    }

    async fn search(
        &self,
        organization_id: Uuid,
        scope: Option<&[Uuid]>,
        term: &str,
    ) -> AppResult<Vec<File>> {
        let term = term.to_lowercase();
        Ok(self.matching(|f| {
            f.organization_id == organization_id
                && scope.is_none_or(|ids| ids.contains(&f.folder_id))
                && f.display_name.to_lowercase().contains(&term)
        }))
    }

    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        let mut files = self.files.lock().unwrap();
        if files.values().any(|f| f.filename == data.filename) {
            return Err(AppError::conflict("Storage key already exists"));
        }
        let file = File {
            id: Uuid::new_v4(),
            filename: data.filename.clone(),
            display_name: data.display_name.clone(),
            path: data.path.clone(),
            mime_type: data.mime_type.clone(),
            size_bytes: data.size_bytes,
            folder_id: data.folder_id,
            organization_id: data.organization_id,
            uploaded_by: data.uploaded_by,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        files.insert(file.id, file.clone());
        Ok(file)
    }

    async fn update_display_name(&self, id: Uuid, display_name: &str) -> AppResult<File> {
        let mut files = self.files.lock().unwrap();
        let file = files
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("File not found"))?;
        file.display_name = display_name.to_string();
        Ok(file.clone())
    }

    async fn move_to(&self, id: Uuid, folder_id: Uuid, path: &str) -> AppResult<File> {
        let mut files = self.files.lock().unwrap();
        let file = files
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("File not found"))?;
        file.folder_id = folder_id;
        file.path = path.to_string();
        Ok(file.clone())
    }

    async fn delete_with_history(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.files.lock().unwrap().remove(&id).is_some())
    }
}

/// Running total of storage deltas per organization.
#[derive(Debug, Default)]
pub struct TestUsage {
    used: Mutex<HashMap<Uuid, i64>>,
}

impl TestUsage {
    pub fn used(&self, organization_id: Uuid) -> i64 {
        self.used
            .lock()
            .unwrap()
            .get(&organization_id)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl StorageUsage for TestUsage {
    async fn add_used_storage(&self, organization_id: Uuid, delta: i64) -> AppResult<()> {
        *self.used.lock().unwrap().entry(organization_id).or_default() += delta;
        Ok(())
    }
}

/// Object storage held in memory. Issues no direct URLs.
#[derive(Debug, Default)]
pub struct TestObjects {
    objects: Mutex<HashMap<String, Bytes>>,
}

impl TestObjects {
    pub fn put(&self, key: &str, data: &'static [u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), Bytes::from_static(data));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }
}

#[async_trait]
impl StorageProvider for TestObjects {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn read(&self, path: &str) -> AppResult<ByteStream> {
        let data = self
            .objects
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Object not found: {path}")))?;
        Ok(Box::pin(futures::stream::iter([Ok(data)])))
    }

    async fn write(&self, path: &str, data: Bytes, _content_type: Option<&str>) -> AppResult<()> {
        self.objects.lock().unwrap().insert(path.to_string(), data);
        Ok(())
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        self.objects
            .lock()
            .unwrap()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Object not found: {path}")))
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        Ok(self.contains(path))
    }

    async fn presigned_url(&self, _path: &str, _ttl: Duration) -> AppResult<Option<String>> {
        Ok(None)
    }
}

/// Grant table keyed by `(user_id, folder_id)`.
#[derive(Default)]
pub struct TestGrants {
    grants: Mutex<HashMap<(Uuid, Uuid), AccessLevel>>,
}

impl TestGrants {
    pub fn set(&self, user_id: Uuid, folder_id: Uuid, level: AccessLevel) {
        self.grants
            .lock()
            .unwrap()
            .insert((user_id, folder_id), level);
    }
}

#[async_trait]
impl PermissionLookup for TestGrants {
    async fn grant(&self, user_id: Uuid, folder_id: Uuid) -> AppResult<Option<AccessLevel>> {
        Ok(self.grants.lock().unwrap().get(&(user_id, folder_id)).copied())
    }

    async fn grants_for_user(&self, user_id: Uuid) -> AppResult<Vec<FolderPermission>> {
        let grants = self.grants.lock().unwrap();
        Ok(grants
            .iter()
            .filter(|((user, _), _)| *user == user_id)
            .map(|(&(user, folder), &level)| FolderPermission {
                id: Uuid::new_v4(),
                user_id: user,
                folder_id: folder,
                access_level: level,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .collect())
    }
}

/// Audit sink that stores entries, optionally slowly or failing.
#[derive(Default)]
pub struct TestSink {
    pub entries: Mutex<Vec<CreateAccessHistoryEntry>>,
    pub delay: Option<Duration>,
    pub fail: bool,
}

impl TestSink {
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[async_trait]
impl AccessHistorySink for TestSink {
    async fn append(&self, entry: &CreateAccessHistoryEntry) -> AppResult<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(AppError::database("history table unavailable"));
        }
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

/// Users keyed by id.
#[derive(Debug, Default)]
pub struct TestUsers {
    users: Mutex<HashMap<Uuid, User>>,
}

impl TestUsers {
    pub fn add(&self, organization_id: Uuid, role: UserRole) -> Uuid {
        let user = User {
            id: Uuid::new_v4(),
            organization_id,
            first_name: "Ana".to_string(),
            last_name: "Souza".to_string(),
            email: format!("{}@uni.edu", Uuid::new_v4().simple()),
            phone_number: None,
            password_hash: String::new(),
            role,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let id = user.id;
        self.users.lock().unwrap().insert(id, user);
        id
    }
}

#[async_trait]
impl UserLookup for TestUsers {
    async fn user(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }
}

/// Courses of any organization; deleted ones are hidden.
#[derive(Debug, Default)]
pub struct TestCourses {
    courses: Mutex<HashMap<Uuid, Course>>,
}

impl TestCourses {
    pub fn add(&self, organization_id: Uuid, name: &str, coordinator_id: Option<Uuid>) -> Uuid {
        let course = Course {
            id: Uuid::new_v4(),
            organization_id,
            name: name.to_string(),
            coordinator_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };
        let id = course.id;
        self.courses.lock().unwrap().insert(id, course);
        id
    }

    pub fn get(&self, id: Uuid) -> Option<Course> {
        self.courses.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl CourseStore for TestCourses {
    async fn find(&self, organization_id: Uuid, id: Uuid) -> AppResult<Option<Course>> {
        Ok(self
            .get(id)
            .filter(|c| c.organization_id == organization_id && c.deleted_at.is_none()))
    }

    async fn list(&self, organization_id: Uuid) -> AppResult<Vec<CourseSummary>> {
        let courses = self.courses.lock().unwrap();
        Ok(courses
            .values()
            .filter(|c| c.organization_id == organization_id && c.deleted_at.is_none())
            .map(|c| CourseSummary {
                course: c.clone(),
                coordinator_name: None,
                student_count: 0,
                tcc_count: 0,
            })
            .collect())
    }

    async fn create(&self, data: &CreateCourse) -> AppResult<Course> {
        let id = self.add(data.organization_id, &data.name, data.coordinator_id);
        self.get(id)
            .ok_or_else(|| AppError::not_found("Course not found"))
    }

    async fn update(&self, id: Uuid, data: &UpdateCourse) -> AppResult<Course> {
        let mut courses = self.courses.lock().unwrap();
        let course = courses
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Course not found"))?;
        if let Some(name) = &data.name {
            course.name = name.clone();
        }
        if data.coordinator_id.is_some() {
            course.coordinator_id = data.coordinator_id;
        }
        Ok(course.clone())
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<bool> {
        let mut courses = self.courses.lock().unwrap();
        Ok(match courses.get_mut(&id) {
            Some(c) if c.deleted_at.is_none() => {
                c.deleted_at = Some(Utc::now());
                true
            }
            _ => false,
        })
    }
}

/// Students of any organization. Deleting one also deletes the TCCs in
/// the attached [`TestTccs`].
#[derive(Debug, Default)]
pub struct TestStudents {
    students: Mutex<HashMap<Uuid, Student>>,
    pub tccs: Option<std::sync::Arc<TestTccs>>,
}

impl TestStudents {
    pub fn with_tccs(tccs: std::sync::Arc<TestTccs>) -> Self {
        Self {
            students: Mutex::default(),
            tccs: Some(tccs),
        }
    }

    pub fn add(&self, organization_id: Uuid, course_id: Uuid, email: &str, number: &str) -> Uuid {
        let student = Student {
            id: Uuid::new_v4(),
            organization_id,
            course_id,
            first_name: "Bruno".to_string(),
            last_name: "Lima".to_string(),
            email: email.to_string(),
            student_number: number.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };
        let id = student.id;
        self.students.lock().unwrap().insert(id, student);
        id
    }

    pub fn get(&self, id: Uuid) -> Option<Student> {
        self.students.lock().unwrap().get(&id).cloned()
    }

    fn live(&self, organization_id: Uuid) -> Vec<Student> {
        self.students
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.organization_id == organization_id && s.deleted_at.is_none())
            .cloned()
            .collect()
    }
}

#[async_trait]
impl StudentStore for TestStudents {
    async fn find(&self, organization_id: Uuid, id: Uuid) -> AppResult<Option<Student>> {
        Ok(self
            .get(id)
            .filter(|s| s.organization_id == organization_id && s.deleted_at.is_none()))
    }

    async fn list(
        &self,
        organization_id: Uuid,
        course_id: Option<Uuid>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<StudentSummary>> {
        let students: Vec<StudentSummary> = self
            .live(organization_id)
            .into_iter()
            .filter(|s| course_id.is_none_or(|c| s.course_id == c))
            .map(|student| StudentSummary {
                student,
                course_name: String::new(),
                tcc_count: 0,
            })
            .collect();
        let total = students.len() as u64;
        Ok(PageResponse::new(students, *page, total))
    }

    async fn find_conflict(
        &self,
        organization_id: Uuid,
        email: &str,
        student_number: &str,
        exclude: Option<Uuid>,
    ) -> AppResult<Option<StudentConflict>> {
        let others: Vec<Student> = self
            .live(organization_id)
            .into_iter()
            .filter(|s| Some(s.id) != exclude)
            .collect();
        if others.iter().any(|s| s.email.eq_ignore_ascii_case(email)) {
            return Ok(Some(StudentConflict::Email));
        }
        if others.iter().any(|s| s.student_number == student_number) {
            return Ok(Some(StudentConflict::StudentNumber));
        }
        Ok(None)
    }

    async fn create(&self, data: &CreateStudent) -> AppResult<Student> {
        let id = self.add(
            data.organization_id,
            data.course_id,
            &data.email,
            &data.student_number,
        );
        let mut students = self.students.lock().unwrap();
        let student = students
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Student not found"))?;
        student.first_name = data.first_name.clone();
        student.last_name = data.last_name.clone();
        Ok(student.clone())
    }

    async fn update(&self, id: Uuid, data: &UpdateStudent) -> AppResult<Student> {
        let mut students = self.students.lock().unwrap();
        let student = students
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Student not found"))?;
        if let Some(course_id) = data.course_id {
            student.course_id = course_id;
        }
        if let Some(email) = &data.email {
            student.email = email.clone();
        }
        if let Some(number) = &data.student_number {
            student.student_number = number.clone();
        }
        Ok(student.clone())
    }

    async fn soft_delete_with_tccs(&self, id: Uuid) -> AppResult<bool> {
        let deleted = match self.students.lock().unwrap().get_mut(&id) {
            Some(s) if s.deleted_at.is_none() => {
                s.deleted_at = Some(Utc::now());
                true
            }
            _ => false,
        };
        if let Some(tccs) = &self.tccs {
            tccs.delete_by_author(id);
        }
        Ok(deleted)
    }
}

/// TCC records with their coordinator precomputed at insert.
#[derive(Debug, Default)]
pub struct TestTccs {
    records: Mutex<HashMap<Uuid, TccRecord>>,
}

impl TestTccs {
    /// Inserts a TCC of `course` written by `author_id`.
    pub fn add(&self, course: &Course, author_id: Uuid, file_id: Option<Uuid>) -> Uuid {
        let tcc = Tcc {
            id: Uuid::new_v4(),
            organization_id: course.organization_id,
            title: "Sistemas distribuidos".to_string(),
            year: 2024,
            keywords: None,
            tcc_type: acervo_entity::tcc::TccType::Monografia,
            author_id,
            supervisor_id: None,
            course_id: course.id,
            file_id,
            defense_record_file_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };
        let id = tcc.id;
        self.records.lock().unwrap().insert(
            id,
            TccRecord {
                tcc,
                author_name: "Bruno Lima".to_string(),
                student_number: "2020001".to_string(),
                supervisor_name: None,
                course_name: course.name.clone(),
                coordinator_id: course.coordinator_id,
            },
        );
        id
    }

    pub fn get(&self, id: Uuid) -> Option<Tcc> {
        self.records.lock().unwrap().get(&id).map(|r| r.tcc.clone())
    }

    fn delete_by_author(&self, author_id: Uuid) {
        for record in self.records.lock().unwrap().values_mut() {
            if record.tcc.author_id == author_id {
                record.tcc.deleted_at = Some(Utc::now());
            }
        }
    }
}

#[async_trait]
impl TccStore for TestTccs {
    async fn find(&self, organization_id: Uuid, id: Uuid) -> AppResult<Option<TccRecord>> {
        Ok(self.records.lock().unwrap().get(&id).cloned().filter(|r| {
            r.tcc.organization_id == organization_id && r.tcc.deleted_at.is_none()
        }))
    }

    async fn list(
        &self,
        organization_id: Uuid,
        filter: &TccFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<TccRecord>> {
        let records: Vec<TccRecord> = self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.tcc.organization_id == organization_id && r.tcc.deleted_at.is_none())
            .filter(|r| filter.course_id.is_none_or(|c| r.tcc.course_id == c))
            .filter(|r| filter.year.is_none_or(|y| r.tcc.year == y))
            .filter(|r| filter.tcc_type.is_none_or(|t| r.tcc.tcc_type == t))
            .filter(|r| {
                filter
                    .coordinator_id
                    .is_none_or(|c| r.coordinator_id == Some(c))
            })
            .cloned()
            .collect();
        let total = records.len() as u64;
        Ok(PageResponse::new(records, *page, total))
    }

    async fn create(&self, data: &CreateTcc) -> AppResult<Tcc> {
        let tcc = Tcc {
            id: Uuid::new_v4(),
            organization_id: data.organization_id,
            title: data.title.clone(),
            year: data.year,
            keywords: data.keywords.clone(),
            tcc_type: data.tcc_type,
            author_id: data.author_id,
            supervisor_id: data.supervisor_id,
            course_id: data.course_id,
            file_id: Some(data.file_id),
            defense_record_file_id: data.defense_record_file_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };
        self.records.lock().unwrap().insert(
            tcc.id,
            TccRecord {
                tcc: tcc.clone(),
                author_name: String::new(),
                student_number: String::new(),
                supervisor_name: None,
                course_name: String::new(),
                coordinator_id: None,
            },
        );
        Ok(tcc)
    }

    async fn update(&self, id: Uuid, data: &UpdateTcc) -> AppResult<Tcc> {
        let mut records = self.records.lock().unwrap();
        let tcc = &mut records
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("TCC not found"))?
            .tcc;
        if let Some(title) = &data.title {
            tcc.title = title.clone();
        }
        if let Some(year) = data.year {
            tcc.year = year;
        }
        if data.defense_record_file_id.is_some() {
            tcc.defense_record_file_id = data.defense_record_file_id;
        }
        Ok(tcc.clone())
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<bool> {
        let mut records = self.records.lock().unwrap();
        Ok(match records.get_mut(&id) {
            Some(r) if r.tcc.deleted_at.is_none() => {
                r.tcc.deleted_at = Some(Utc::now());
                true
            }
            _ => false,
        })
    }
}
