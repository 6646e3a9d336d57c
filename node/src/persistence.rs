// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Write-behind snapshot writer.
//!
//! Mutations hand a full `TimelineDocument` to the writer and move on. A
//! background task drains the channel, keeps only the newest document per
//! identity from each batch, and saves them on the blocking pool. Failures are
//! logged and counted; the in-memory timeline stays authoritative.

use std::sync::Arc;
use std::time::Instant;

use geotrail_persistence::{SnapshotStore, TimelineDocument};
use rustc_hash::FxHashMap;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

enum WriteRequest {
    Save(TimelineDocument),
    Flush(oneshot::Sender<()>),
}

/// Outcome of the persistence step that follows a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistStatus {
    /// Handed to the background writer.
    Queued,
    /// Saved before the call returned.
    Saved,
    /// Nothing changed, nothing written.
    Unchanged,
    /// Save failed or the writer is gone. The mutation still stands.
    Failed(String),
}

impl PersistStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, PersistStatus::Failed(_))
    }
}

#[derive(Clone)]
pub struct SnapshotWriter {
    tx: mpsc::UnboundedSender<WriteRequest>,
}

impl SnapshotWriter {
    pub fn submit(&self, doc: TimelineDocument) -> PersistStatus {
        match self.tx.send(WriteRequest::Save(doc)) {
            Ok(()) => PersistStatus::Queued,
            Err(_) => {
                metrics::increment_counter!("geotrail_persist_failures_total");
                tracing::error!("Snapshot writer stopped; dropping snapshot");
                PersistStatus::Failed("snapshot writer stopped".to_string())
            }
        }
    }

    /// Waits until everything submitted before this call has been written.
    pub async fn flush(&self) -> bool {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(WriteRequest::Flush(done_tx)).is_err() {
            return false;
        }
        done_rx.await.is_ok()
    }
}

/// Starts the writer task. It exits once every `SnapshotWriter` clone is dropped
/// and the queue is drained.
pub fn spawn_writer(store: Arc<dyn SnapshotStore>) -> (SnapshotWriter, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(async move {
        while let Some(first) = rx.recv().await {
            let mut batch: FxHashMap<String, TimelineDocument> = FxHashMap::default();
            let mut waiters = Vec::new();

            let mut absorb = |req: WriteRequest| match req {
                WriteRequest::Save(doc) => {
                    batch.insert(doc.identity.clone(), doc);
                }
                WriteRequest::Flush(done) => waiters.push(done),
            };
            absorb(first);
            while let Ok(req) = rx.try_recv() {
                absorb(req);
            }

            for (identity, doc) in batch {
                save_one(store.clone(), identity, doc).await;
            }
            for done in waiters {
                let _ = done.send(());
            }
        }
        tracing::debug!("Snapshot writer drained and stopped");
    });
    (SnapshotWriter { tx }, handle)
}

async fn save_one(store: Arc<dyn SnapshotStore>, identity: String, doc: TimelineDocument) {
    let started = Instant::now();
    let id = identity.clone();
    let result = tokio::task::spawn_blocking(move || store.save(&id, &doc)).await;
    metrics::histogram!("geotrail_persist_duration_seconds", started.elapsed().as_secs_f64());

    match result {
        Ok(Ok(())) => tracing::debug!("Snapshot saved for {}", identity),
        Ok(Err(e)) => {
            metrics::increment_counter!("geotrail_persist_failures_total");
            tracing::error!("Snapshot save failed for {}: {}", identity, e);
        }
        Err(e) => {
            metrics::increment_counter!("geotrail_persist_failures_total");
            tracing::error!("Snapshot save task for {} aborted: {}", identity, e);
        }
    }
}

/// Saves synchronously and maps the outcome to a status.
pub fn save_now(store: &dyn SnapshotStore, doc: &TimelineDocument) -> PersistStatus {
    let started = Instant::now();
    let result = store.save(&doc.identity, doc);
    metrics::histogram!("geotrail_persist_duration_seconds", started.elapsed().as_secs_f64());
    match result {
        Ok(()) => PersistStatus::Saved,
        Err(e) => {
            metrics::increment_counter!("geotrail_persist_failures_total");
            tracing::error!("Snapshot save failed for {}: {}", doc.identity, e);
            PersistStatus::Failed(e.to_string())
        }
    }
}
