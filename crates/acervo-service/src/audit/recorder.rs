//! Best-effort access history recording.
//!
//! Entries go through a bounded queue drained by one background worker.
//! Recording never blocks and never fails the caller: a full or closed
//! queue drops the entry, logs a warning and bumps [`AuditRecorder::dropped`].
//! Sink failures are logged by the worker and otherwise ignored.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use acervo_database::AccessHistorySink;
use acervo_entity::audit::{AuditAction, AuditTarget, CreateAccessHistoryEntry};

/// Handle used by services to record actions.
#[derive(Debug, Clone)]
pub struct AuditRecorder {
    tx: mpsc::Sender<CreateAccessHistoryEntry>,
    dropped: Arc<AtomicU64>,
}

impl AuditRecorder {
    /// Starts the background worker writing into `sink`.
    ///
    /// The worker exits once every clone of the returned recorder is dropped
    /// and the queue is drained, yielding the final drop count.
    pub fn spawn(sink: Arc<dyn AccessHistorySink>, capacity: usize) -> (Self, JoinHandle<u64>) {
        let (recorder, mut rx) = Self::channel(capacity);
        let dropped = Arc::clone(&recorder.dropped);

        let handle = tokio::spawn(async move {
            while let Some(entry) = rx.recv().await {
                if let Err(e) = sink.append(&entry).await {
                    warn!(
                        action = %entry.action,
                        accessed_by = %entry.accessed_by,
                        error = %e,
                        "Failed to write access history entry"
                    );
                }
            }
            let dropped = dropped.load(Ordering::Relaxed);
            debug!(dropped, "Audit worker stopped");
            dropped
        });

        (recorder, handle)
    }

    fn channel(capacity: usize) -> (Self, mpsc::Receiver<CreateAccessHistoryEntry>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            Self {
                tx,
                dropped: Arc::new(AtomicU64::new(0)),
            },
            rx,
        )
    }

    /// Queues one entry. Returns immediately.
    pub fn record(&self, actor_id: Uuid, target: AuditTarget, action: AuditAction) {
        if action.is_folder_action() != target.folder_id().is_some() {
            warn!(%action, ?target, "Audit action does not match its target; entry dropped");
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let entry = CreateAccessHistoryEntry {
            accessed_by: actor_id,
            target,
            action,
            accessed_at: Utc::now(),
        };

        match self.tx.try_send(entry) {
            Ok(()) => {}
            Err(TrySendError::Full(entry)) => {
                let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                warn!(action = %entry.action, dropped_total = total, "Audit queue full; entry dropped");
            }
            Err(TrySendError::Closed(entry)) => {
                let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                warn!(action = %entry.action, dropped_total = total, "Audit queue closed; entry dropped");
            }
        }
    }

    /// Number of entries dropped since startup.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
