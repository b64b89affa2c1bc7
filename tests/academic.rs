//! Course, student and TCC services under the TCC role rules.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use futures::TryStreamExt;
use uuid::Uuid;

use acervo_auth::RbacEnforcer;
use acervo_core::error::ErrorKind;
use acervo_core::types::pagination::PageRequest;
use acervo_entity::audit::{AuditAction, AuditTarget};
use acervo_entity::tcc::{TccFileKind, TccType};
use acervo_entity::user::UserRole;
use acervo_service::academic::{NewStudent, NewTcc, StudentUpdate, TccQuery};
use acervo_service::{AuditRecorder, CourseService, RequestContext, StudentService, TccService};
use acervo_storage::StorageManager;

use helpers::{
    TestCourses, TestFiles, TestFolders, TestObjects, TestSink, TestStudents, TestTccs, TestUsers,
};

struct Fixture {
    org: Uuid,
    coordinator: Uuid,
    course: Uuid,
    other_course: Uuid,
    users: Arc<TestUsers>,
    courses: Arc<TestCourses>,
    students: Arc<TestStudents>,
    tccs: Arc<TestTccs>,
    folders: Arc<TestFolders>,
    files: Arc<TestFiles>,
    objects: Arc<TestObjects>,
    sink: Arc<TestSink>,
    recorder: Option<AuditRecorder>,
    worker: tokio::task::JoinHandle<u64>,
    course_service: CourseService,
    student_service: StudentService,
    tcc_service: TccService,
}

fn fixture() -> Fixture {
    let org = Uuid::new_v4();
    let users = Arc::new(TestUsers::default());
    let coordinator = users.add(org, UserRole::CourseCoordenator);
    let rival = users.add(org, UserRole::CourseCoordenator);

    let courses = Arc::new(TestCourses::default());
    let course = courses.add(org, "Computer Science", Some(coordinator));
    let other_course = courses.add(org, "Law", Some(rival));

    let tccs = Arc::new(TestTccs::default());
    let students = Arc::new(TestStudents::with_tccs(tccs.clone()));
    let folders = Arc::new(TestFolders::new(org));
    let files = Arc::new(TestFiles::default());
    let objects = Arc::new(TestObjects::default());
    let sink = Arc::new(TestSink::default());

    let storage = Arc::new(StorageManager::from_provider(
        objects.clone(),
        Duration::from_secs(60),
    ));
    let (recorder, worker) = AuditRecorder::spawn(sink.clone(), 64);

    let course_service = CourseService::new(
        courses.clone(),
        users.clone(),
        Arc::new(RbacEnforcer::new()),
    );
    let student_service = StudentService::new(students.clone(), courses.clone());
    let tcc_service = TccService::new(
        tccs.clone(),
        students.clone(),
        courses.clone(),
        files.clone(),
        users.clone(),
        storage,
        recorder.clone(),
    );

    Fixture {
        org,
        coordinator,
        course,
        other_course,
        users,
        courses,
        students,
        tccs,
        folders,
        files,
        objects,
        sink,
        recorder: Some(recorder),
        worker,
        course_service,
        student_service,
        tcc_service,
    }
}

fn ctx(org: Uuid, role: UserRole) -> RequestContext {
    RequestContext::new(Uuid::new_v4(), "staff@uni.edu".into(), role, org)
}

fn as_user(org: Uuid, user_id: Uuid, role: UserRole) -> RequestContext {
    RequestContext::new(user_id, "staff@uni.edu".into(), role, org)
}

fn new_student(course_id: Uuid, email: &str, number: &str) -> NewStudent {
    NewStudent {
        course_id,
        first_name: "Carla".into(),
        last_name: "Dias".into(),
        email: email.into(),
        student_number: number.into(),
    }
}

impl Fixture {
    /// A TCC of `course` with its thesis document stored under `content`.
    fn tcc_with_file(&self, course: Uuid, content: &'static [u8]) -> (Uuid, Uuid) {
        let folder_id = self.folders.insert("Theses", "Theses", None);
        let folder = self
            .folders
            .all()
            .into_iter()
            .find(|f| f.id == folder_id)
            .unwrap();
        let file = self.files.add(&folder, "Thesis", content.len() as i64);
        self.objects.put(&file.filename, content);

        let course = self.courses.get(course).unwrap();
        let author = self.students.add(self.org, course.id, "author@uni.edu", "2020001");
        (self.tccs.add(&course, author, Some(file.id)), file.id)
    }
}

#[tokio::test]
async fn test_coordinator_cannot_reach_another_course() {
    let fx = fixture();
    let coordinator = as_user(fx.org, fx.coordinator, UserRole::CourseCoordenator);

    let err = fx
        .student_service
        .create(
            &coordinator,
            new_student(fx.other_course, "x@uni.edu", "1"),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let (foreign, _) = fx.tcc_with_file(fx.other_course, b"pdf");
    let err = fx.tcc_service.get(&coordinator, foreign).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let own = fx
        .student_service
        .create(&coordinator, new_student(fx.course, "own@uni.edu", "2"))
        .await
        .unwrap();
    assert_eq!(own.course_id, fx.course);
}

#[tokio::test]
async fn test_coordinator_listing_only_shows_own_courses() {
    let fx = fixture();
    let course = fx.courses.get(fx.course).unwrap();
    let other = fx.courses.get(fx.other_course).unwrap();
    let mine = fx.tccs.add(&course, Uuid::new_v4(), None);
    fx.tccs.add(&other, Uuid::new_v4(), None);

    let coordinator = as_user(fx.org, fx.coordinator, UserRole::CourseCoordenator);
    let page = fx
        .tcc_service
        .list(&coordinator, TccQuery::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].tcc.id, mine);

    let register = ctx(fx.org, UserRole::AcademicRegister);
    let page = fx
        .tcc_service
        .list(&register, TccQuery::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
}

#[tokio::test]
async fn test_register_edits_but_cannot_delete() {
    let fx = fixture();
    let register = ctx(fx.org, UserRole::AcademicRegister);
    let student = fx.students.add(fx.org, fx.course, "e@uni.edu", "10");

    let updated = fx
        .student_service
        .update(
            &register,
            student,
            StudentUpdate {
                student_number: Some("11".into()),
                ..StudentUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.student_number, "11");

    let err = fx
        .student_service
        .delete(&register, student)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
    assert!(fx.students.get(student).unwrap().deleted_at.is_none());
}

#[tokio::test]
async fn test_deleting_a_student_removes_their_tccs() {
    let fx = fixture();
    let (tcc, _) = fx.tcc_with_file(fx.course, b"pdf");
    let author = fx.tccs.get(tcc).unwrap().author_id;

    let admin = ctx(fx.org, UserRole::Admin);
    fx.student_service.delete(&admin, author).await.unwrap();

    assert!(fx.tccs.get(tcc).unwrap().deleted_at.is_some());
    let err = fx.tcc_service.get(&admin, tcc).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_duplicate_student_email_is_rejected() {
    let fx = fixture();
    fx.students.add(fx.org, fx.course, "taken@uni.edu", "100");
    let admin = ctx(fx.org, UserRole::Admin);

    let err = fx
        .student_service
        .create(&admin, new_student(fx.course, "Taken@Uni.edu", "101"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(err.message.contains("email"));

    let err = fx
        .student_service
        .create(&admin, new_student(fx.course, "fresh@uni.edu", "100"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(err.message.contains("student number"));
}

#[tokio::test]
async fn test_course_of_another_organization_is_not_found() {
    let fx = fixture();
    let foreign = fx.courses.add(Uuid::new_v4(), "Medicine", None);
    let admin = ctx(fx.org, UserRole::Admin);

    let err = fx.course_service.get(&admin, foreign).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = fx
        .student_service
        .create(&admin, new_student(foreign, "m@uni.edu", "7"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_course_coordinator_must_belong_to_the_organization() {
    let fx = fixture();
    let admin = ctx(fx.org, UserRole::Admin);
    let outsider = fx.users.add(Uuid::new_v4(), UserRole::CourseCoordenator);

    let err = fx
        .course_service
        .create(&admin, "History", Some(outsider))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let course = fx
        .course_service
        .create(&admin, "  History ", Some(fx.coordinator))
        .await
        .unwrap();
    assert_eq!(course.name, "History");

    let register = ctx(fx.org, UserRole::AcademicRegister);
    let err = fx
        .course_service
        .create(&register, "Art", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_tcc_author_must_be_enrolled_in_the_course() {
    let fx = fixture();
    let admin = ctx(fx.org, UserRole::Admin);
    let (_, file_id) = fx.tcc_with_file(fx.course, b"pdf");
    let outsider = fx.students.add(fx.org, fx.other_course, "o@uni.edu", "55");

    let mut input = NewTcc {
        title: "Redes neurais".into(),
        year: 2024,
        keywords: None,
        tcc_type: TccType::Monografia,
        author_id: outsider,
        supervisor_id: None,
        course_id: fx.course,
        file_id,
        defense_record_file_id: None,
    };
    let err = fx
        .tcc_service
        .create(&admin, input.clone())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    input.author_id = fx.students.add(fx.org, fx.course, "in@uni.edu", "56");
    let tcc = fx.tcc_service.create(&admin, input).await.unwrap();
    assert_eq!(tcc.file_id, Some(file_id));
    assert_eq!(tcc.defense_record_file_id, None);
}

#[tokio::test]
async fn test_tcc_download_streams_and_records_access() {
    let mut fx = fixture();
    let (tcc, file_id) = fx.tcc_with_file(fx.course, b"%PDF-1.7 thesis");
    let coordinator = as_user(fx.org, fx.coordinator, UserRole::CourseCoordenator);

    let download = fx
        .tcc_service
        .download(&coordinator, tcc, TccFileKind::Main)
        .await
        .unwrap();
    assert_eq!(download.file.id, file_id);
    let chunks: Vec<bytes::Bytes> = download.body.try_collect().await.unwrap();
    assert_eq!(chunks.concat(), b"%PDF-1.7 thesis");

    drop(fx.recorder.take());
    drop(fx.tcc_service);
    (&mut fx.worker).await.unwrap();
    let entries = fx.sink.entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, AuditAction::DownloadFile);
    assert_eq!(entries[0].target, AuditTarget::File(file_id));
    assert_eq!(entries[0].accessed_by, fx.coordinator);
}

#[tokio::test]
async fn test_missing_defense_record_is_not_found() {
    let fx = fixture();
    let (tcc, _) = fx.tcc_with_file(fx.course, b"pdf");
    let admin = ctx(fx.org, UserRole::Admin);

    let err = fx
        .tcc_service
        .download(&admin, tcc, TccFileKind::Defense)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(err.message, "No defense record attached");
}
