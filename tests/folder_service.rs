//! Folder and file services over in-memory stores.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use acervo_auth::FolderAccessResolver;
use acervo_core::error::ErrorKind;
use acervo_entity::permission::AccessLevel;
use acervo_entity::user::UserRole;
use acervo_service::file::service::download_route;
use acervo_service::{AuditRecorder, FileService, FolderService, RequestContext};
use acervo_storage::StorageManager;

use helpers::{TestFiles, TestFolders, TestGrants, TestObjects, TestSink, TestUsage};

struct Fixture {
    org: Uuid,
    folders: Arc<TestFolders>,
    files: Arc<TestFiles>,
    grants: Arc<TestGrants>,
    usage: Arc<TestUsage>,
    objects: Arc<TestObjects>,
    folder_service: FolderService,
    file_service: FileService,
}

fn fixture() -> Fixture {
    let org = Uuid::new_v4();
    let folders = Arc::new(TestFolders::new(org));
    let files = Arc::new(TestFiles::default());
    let grants = Arc::new(TestGrants::default());
    let usage = Arc::new(TestUsage::default());
    let objects = Arc::new(TestObjects::default());

    let storage = Arc::new(StorageManager::from_provider(
        objects.clone(),
        Duration::from_secs(60),
    ));
    let access = Arc::new(FolderAccessResolver::new(grants.clone()));
    let (recorder, _worker) = AuditRecorder::spawn(Arc::new(TestSink::default()), 64);

    let folder_service = FolderService::new(
        folders.clone(),
        files.clone(),
        usage.clone(),
        Arc::clone(&storage),
        Arc::clone(&access),
        recorder.clone(),
    );
    let file_service = FileService::new(
        files.clone(),
        folders.clone(),
        usage.clone(),
        storage,
        access,
        recorder,
    );

    Fixture {
        org,
        folders,
        files,
        grants,
        usage,
        objects,
        folder_service,
        file_service,
    }
}

fn ctx(org: Uuid, role: UserRole) -> RequestContext {
    RequestContext::new(Uuid::new_v4(), "staff@uni.edu".into(), role, org)
}

#[tokio::test]
async fn test_read_grant_tags_folder_content() {
    let fx = fixture();
    let root = fx.folders.insert("Theses", "Theses", None);
    let visible = fx.folders.insert("2023", "Theses/2023", Some(root));
    let hidden = fx.folders.insert("2024", "Theses/2024", Some(root));
    let root_folder = fx.folders.all().into_iter().find(|f| f.id == root).unwrap();
    fx.files.add(&root_folder, "Final", 10);

    let user = ctx(fx.org, UserRole::AcademicRegister);
    fx.grants.set(user.user_id, root, AccessLevel::Read);
    fx.grants.set(user.user_id, visible, AccessLevel::Read);

    let content = fx.folder_service.get_content(&user, root).await.unwrap();

    assert_eq!(content.folder.access_level, AccessLevel::Read);
    assert_eq!(content.subfolders.len(), 1);
    assert_eq!(content.subfolders[0].item.id, visible);
    assert!(content.subfolders.iter().all(|f| f.item.id != hidden));
    assert_eq!(content.files.len(), 1);
    assert_eq!(content.files[0].access_level, AccessLevel::Read);

    let json = serde_json::to_value(&content).unwrap();
    assert_eq!(json["folder"]["accessLevel"], "READ");
    assert_eq!(json["files"][0]["accessLevel"], "READ");
}

#[tokio::test]
async fn test_no_grant_denies_content() {
    let fx = fixture();
    let root = fx.folders.insert("Theses", "Theses", None);
    let user = ctx(fx.org, UserRole::CourseCoordenator);

    let err = fx.folder_service.get_content(&user, root).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_delete_file_with_missing_object_succeeds() {
    let fx = fixture();
    let root = fx.folders.insert("Theses", "Theses", None);
    let folder = fx.folders.all().into_iter().find(|f| f.id == root).unwrap();
    let file = fx.files.add(&folder, "Orphan", 2048);
    assert!(!fx.objects.contains(&file.filename));

    let admin = ctx(fx.org, UserRole::Admin);
    fx.file_service.delete_file(&admin, file.id).await.unwrap();

    assert!(!fx.files.contains(file.id));
    assert_eq!(fx.usage.used(fx.org), -2048);
}

#[tokio::test]
async fn test_delete_file_removes_stored_object() {
    let fx = fixture();
    let root = fx.folders.insert("Theses", "Theses", None);
    let folder = fx.folders.all().into_iter().find(|f| f.id == root).unwrap();
    let file = fx.files.add(&folder, "Kept", 4);
    fx.objects.put(&file.filename, b"%PDF");

    let admin = ctx(fx.org, UserRole::Admin);
    fx.file_service.delete_file(&admin, file.id).await.unwrap();

    assert!(!fx.objects.contains(&file.filename));
}

#[tokio::test]
async fn test_file_url_falls_back_to_download_route() {
    let fx = fixture();
    let root = fx.folders.insert("Theses", "Theses", None);
    let folder = fx.folders.all().into_iter().find(|f| f.id == root).unwrap();
    let file = fx.files.add(&folder, "Final", 4);

    let admin = ctx(fx.org, UserRole::Admin);
    let details = fx.file_service.get_file(&admin, file.id).await.unwrap();

    assert_eq!(details.url, format!("/api/files/{}/download", file.id));
    assert_eq!(details.url, download_route(file.id));
    assert!(!details.content_available);
    assert_eq!(details.access_level, AccessLevel::Manage);
}

#[tokio::test]
async fn test_duplicate_folder_name_conflicts() {
    let fx = fixture();
    let admin = ctx(fx.org, UserRole::Admin);

    let first = fx
        .folder_service
        .create_folder(&admin, "Theses", None)
        .await
        .unwrap();
    assert_eq!(first.path, "Theses");

    let err = fx
        .folder_service
        .create_folder(&admin, "Theses", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    // The same name is free under a different parent.
    let nested = fx
        .folder_service
        .create_folder(&admin, "Theses", Some(first.id))
        .await
        .unwrap();
    assert_eq!(nested.path, "Theses/Theses");
}

#[tokio::test]
async fn test_move_into_descendant_is_rejected() {
    let fx = fixture();
    let root = fx.folders.insert("Theses", "Theses", None);
    let child = fx.folders.insert("2024", "Theses/2024", Some(root));
    let grandchild = fx.folders.insert("Drafts", "Theses/2024/Drafts", Some(child));
    let admin = ctx(fx.org, UserRole::Admin);

    let err = fx
        .folder_service
        .move_folder(&admin, root, Some(grandchild))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = fx
        .folder_service
        .move_folder(&admin, root, Some(root))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_move_rewrites_subtree_paths() {
    let fx = fixture();
    let archive = fx.folders.insert("Archive", "Archive", None);
    let theses = fx.folders.insert("Theses", "Theses", None);
    let year = fx.folders.insert("2024", "Theses/2024", Some(theses));
    let admin = ctx(fx.org, UserRole::Admin);

    let moved = fx
        .folder_service
        .move_folder(&admin, theses, Some(archive))
        .await
        .unwrap();
    assert_eq!(moved.path, "Archive/Theses");

    let year = fx.folders.all().into_iter().find(|f| f.id == year).unwrap();
    assert_eq!(year.path, "Archive/Theses/2024");
}
