//! Background access history recording.

mod helpers;

use std::sync::Arc;

use uuid::Uuid;

use acervo_entity::audit::{AuditAction, AuditTarget};
use acervo_service::AuditRecorder;

use helpers::TestSink;

#[tokio::test]
async fn test_entries_reach_the_sink_in_order() {
    let sink = Arc::new(TestSink::default());
    let (recorder, worker) = AuditRecorder::spawn(sink.clone(), 16);
    let actor = Uuid::new_v4();
    let (folder, file) = (Uuid::new_v4(), Uuid::new_v4());

    recorder.record(actor, AuditTarget::Folder(folder), AuditAction::CreateFolder);
    recorder.record(actor, AuditTarget::File(file), AuditAction::UploadFile);
    recorder.record(actor, AuditTarget::File(file), AuditAction::DownloadFile);
    drop(recorder);
    worker.await.unwrap();

    let entries = sink.entries.lock().unwrap();
    let actions: Vec<AuditAction> = entries.iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![
            AuditAction::CreateFolder,
            AuditAction::UploadFile,
            AuditAction::DownloadFile
        ]
    );
    assert!(entries.iter().all(|e| e.accessed_by == actor));
}

#[tokio::test]
async fn test_full_queue_drops_without_blocking() {
    let sink = Arc::new(TestSink::default());
    let (recorder, worker) = AuditRecorder::spawn(sink.clone(), 1);
    let file = Uuid::new_v4();

    // The worker has not been polled yet, so only the first entry fits.
    for _ in 0..5 {
        recorder.record(Uuid::new_v4(), AuditTarget::File(file), AuditAction::ViewFile);
    }
    assert_eq!(recorder.dropped(), 4);

    drop(recorder);
    worker.await.unwrap();
    assert_eq!(sink.len(), 1);
}

#[tokio::test]
async fn test_sink_failure_does_not_stop_the_worker() {
    let sink = Arc::new(TestSink {
        fail: true,
        ..TestSink::default()
    });
    let (recorder, worker) = AuditRecorder::spawn(sink.clone(), 8);

    recorder.record(Uuid::new_v4(), AuditTarget::File(Uuid::new_v4()), AuditAction::MoveFile);
    recorder.record(Uuid::new_v4(), AuditTarget::Folder(Uuid::new_v4()), AuditAction::MoveFolder);
    drop(recorder);

    assert!(worker.await.is_ok());
    assert_eq!(sink.len(), 0);
}

#[tokio::test]
async fn test_mismatched_target_is_dropped() {
    let sink = Arc::new(TestSink::default());
    let (recorder, worker) = AuditRecorder::spawn(sink.clone(), 8);

    recorder.record(Uuid::new_v4(), AuditTarget::Folder(Uuid::new_v4()), AuditAction::DownloadFile);
    assert_eq!(recorder.dropped(), 1);

    drop(recorder);
    worker.await.unwrap();
    assert_eq!(sink.len(), 0);
}
