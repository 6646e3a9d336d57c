// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Identity registry.
//!
//! Holds one `TimelineStore` per identity behind its own lock. Stores are
//! created lazily on first access, either replayed from the snapshot store or
//! bootstrapped with a placeholder sample. Every mutation pushes the updated
//! timeline and pending queue to persistence while the identity lock is still
//! held, so snapshots for one identity are produced in mutation order.
//!
//! A discarded slot is retired under its write lock once every snapshot it
//! produced is on disk. Writers that still hold the retired slot retry against
//! a freshly loaded one.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use geotrail_kernel::{Connectivity, Sample, TimelineStore};
use geotrail_persistence::{SnapshotStore, TimelineDocument};
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::NodeError;
use crate::persistence::{save_now, PersistStatus, SnapshotWriter};

const MAX_IDENTITY_LEN: usize = 64;

/// Where mutations send their snapshots.
pub enum Persistence {
    WriteThrough,
    WriteBehind(SnapshotWriter),
}

/// A mutation result plus what happened to its snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Persisted<T> {
    pub value: T,
    pub persistence: PersistStatus,
}

struct IdentitySlot {
    store: RwLock<TimelineStore>,
    online: AtomicBool,
    /// Bumped under the write lock for every snapshot handed to persistence.
    version: AtomicU64,
    retired: AtomicBool,
}

impl IdentitySlot {
    fn new(store: TimelineStore) -> Self {
        Self {
            store: RwLock::new(store),
            online: AtomicBool::new(true),
            version: AtomicU64::new(0),
            retired: AtomicBool::new(false),
        }
    }
}

pub struct Registry {
    known: RwLock<FxHashSet<String>>,
    slots: RwLock<FxHashMap<String, Arc<IdentitySlot>>>,
    snapshots: Arc<dyn SnapshotStore>,
    persistence: Persistence,
}

impl Registry {
    /// Identities that already have a snapshot are known from the start.
    pub fn new(snapshots: Arc<dyn SnapshotStore>, persistence: Persistence) -> Result<Self, NodeError> {
        let known: FxHashSet<String> = snapshots.identities()?.into_iter().collect();
        tracing::info!("Registry opened with {} persisted identities", known.len());
        Ok(Self {
            known: RwLock::new(known),
            slots: RwLock::new(FxHashMap::default()),
            snapshots,
            persistence,
        })
    }

    /// Marks an identity as known. Returns false if it already was.
    pub fn register(&self, identity: &str) -> Result<bool, NodeError> {
        validate_identity(identity)?;
        let added = self.known.write().insert(identity.to_string());
        if added {
            tracing::info!("Registered identity {}", identity);
        }
        Ok(added)
    }

    pub fn is_known(&self, identity: &str) -> bool {
        self.known.read().contains(identity)
    }

    /// Known identities, sorted.
    pub fn identities(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.known.read().iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of timelines currently held in memory.
    pub fn loaded(&self) -> usize {
        self.slots.read().len()
    }

    pub fn insert(
        &self,
        identity: &str,
        sample: Sample,
        link: Connectivity,
    ) -> Result<Persisted<Sample>, NodeError> {
        let stored = self.mutate(identity, |store| Ok((store.insert(sample, link)?, true)))?;

        metrics::increment_counter!("geotrail_samples_inserted_total", "origin" => stored.value.origin().as_str());
        tracing::trace!("{} recorded {} sample at {}", identity, stored.value.origin(), stored.value.timestamp());
        Ok(stored)
    }

    /// Merges the pending queue. An empty queue writes nothing.
    pub fn sync(&self, identity: &str) -> Result<Persisted<Vec<Sample>>, NodeError> {
        let merged = self.mutate(identity, |store| {
            let merged = store.sync();
            let changed = !merged.is_empty();
            Ok((merged, changed))
        })?;

        if !merged.value.is_empty() {
            metrics::counter!("geotrail_samples_synced_total", merged.value.len() as u64);
            tracing::info!("{} synced {} offline samples", identity, merged.value.len());
        }
        Ok(merged)
    }

    pub fn timeline(&self, identity: &str) -> Result<Vec<Sample>, NodeError> {
        Ok(self.slot(identity)?.store.read().timeline())
    }

    pub fn latest(&self, identity: &str, count: usize) -> Result<Vec<Sample>, NodeError> {
        Ok(self.slot(identity)?.store.read().latest(count))
    }

    pub fn search_range(&self, identity: &str, start: f64, end: f64) -> Result<Vec<Sample>, NodeError> {
        Ok(self.slot(identity)?.store.read().search_range(start, end)?)
    }

    pub fn search_nearest(&self, identity: &str, target: f64) -> Result<Vec<Sample>, NodeError> {
        Ok(self.slot(identity)?.store.read().search_nearest(target)?)
    }

    pub fn pending_len(&self, identity: &str) -> Result<usize, NodeError> {
        Ok(self.slot(identity)?.store.read().pending_len())
    }

    pub fn pending(&self, identity: &str) -> Result<Vec<Sample>, NodeError> {
        Ok(self.slot(identity)?.store.read().pending())
    }

    pub fn set_online(&self, identity: &str, online: bool) -> Result<(), NodeError> {
        self.slot(identity)?.online.store(online, Ordering::Release);
        tracing::info!("{} is now {}", identity, if online { "online" } else { "offline" });
        Ok(())
    }

    pub fn is_online(&self, identity: &str) -> Result<bool, NodeError> {
        Ok(self.slot(identity)?.online.load(Ordering::Acquire))
    }

    /// Runs the kernel structure checks for one identity.
    pub fn verify(&self, identity: &str) -> Result<(), NodeError> {
        Ok(self.slot(identity)?.store.read().check_invariants()?)
    }

    /// Drops the in-memory timeline. The identity stays known and is reloaded
    /// from its snapshot on next access, so the call first waits until every
    /// snapshot the timeline produced has been written. Returns false if
    /// nothing was loaded or the writer is gone.
    pub async fn discard(&self, identity: &str) -> bool {
        loop {
            let Some(slot) = self.slots.read().get(identity).cloned() else {
                return false;
            };
            let seen = slot.version.load(Ordering::Acquire);
            if !self.flush().await {
                tracing::warn!("Keeping {} in memory: snapshot writer stopped", identity);
                return false;
            }

            if let Some(done) = self.retire(identity, &slot, seen) {
                return done;
            }
        }
    }

    /// Removes `slot` if nothing was persisted since `seen`. `None` means a
    /// newer snapshot is pending and the caller should flush again.
    fn retire(&self, identity: &str, slot: &Arc<IdentitySlot>, seen: u64) -> Option<bool> {
        let mut slots = self.slots.write();
        let _store = slot.store.write();
        if slot.version.load(Ordering::Acquire) != seen {
            return None;
        }
        if !slots.get(identity).is_some_and(|s| Arc::ptr_eq(s, slot)) {
            return Some(false);
        }
        slot.retired.store(true, Ordering::Release);
        slots.remove(identity);
        metrics::gauge!("geotrail_identities_loaded", slots.len() as f64);
        tracing::debug!("Discarded in-memory timeline for {}", identity);
        Some(true)
    }

    /// Waits for the background writer to catch up. No-op for write-through.
    pub async fn flush(&self) -> bool {
        match &self.persistence {
            Persistence::WriteThrough => true,
            Persistence::WriteBehind(writer) => writer.flush().await,
        }
    }

    fn slot(&self, identity: &str) -> Result<Arc<IdentitySlot>, NodeError> {
        if let Some(slot) = self.slots.read().get(identity) {
            return Ok(slot.clone());
        }
        if !self.is_known(identity) {
            return Err(NodeError::UnknownIdentity(identity.to_string()));
        }

        // Built outside the map lock; a racing loader may win, in which case
        // this copy is dropped. A bootstrapped store is published already
        // write-locked so nothing sees it before its first snapshot is queued.
        let (store, fresh) = self.load_store(identity)?;
        let slot = Arc::new(IdentitySlot::new(store));
        let bootstrap = fresh.then(|| slot.store.write());
        {
            let mut slots = self.slots.write();
            if let Some(existing) = slots.get(identity) {
                return Ok(existing.clone());
            }
            slots.insert(identity.to_string(), slot.clone());
        }

        if let Some(store) = bootstrap {
            slot.version.fetch_add(1, Ordering::AcqRel);
            let status = self.persist(identity, &store);
            tracing::debug!("Bootstrapped timeline for {} ({:?})", identity, status);
        }
        metrics::gauge!("geotrail_identities_loaded", self.loaded() as f64);
        Ok(slot.clone())
    }

    /// Applies `apply` under the identity's write lock and persists the result
    /// when it reports a change. A slot retired by `discard` is never written.
    fn mutate<T>(
        &self,
        identity: &str,
        mut apply: impl FnMut(&mut TimelineStore) -> Result<(T, bool), NodeError>,
    ) -> Result<Persisted<T>, NodeError> {
        loop {
            let slot = self.slot(identity)?;
            let mut store = slot.store.write();
            if slot.retired.load(Ordering::Acquire) {
                continue;
            }
            let (value, changed) = apply(&mut *store)?;
            if !changed {
                return Ok(Persisted {
                    value,
                    persistence: PersistStatus::Unchanged,
                });
            }
            slot.version.fetch_add(1, Ordering::AcqRel);
            let persistence = self.persist(identity, &store);
            return Ok(Persisted { value, persistence });
        }
    }

    /// Returns the store and whether it was bootstrapped rather than replayed.
    fn load_store(&self, identity: &str) -> Result<(TimelineStore, bool), NodeError> {
        match self.snapshots.load(identity)? {
            Some(doc) if !doc.timeline.is_empty() => {
                let samples = doc.timeline.len();
                let store = TimelineStore::restore(doc.timeline, doc.pending)?;
                tracing::info!(
                    "Restored {} with {} samples and {} pending",
                    identity,
                    samples,
                    store.pending_len()
                );
                Ok((store, false))
            }
            Some(doc) => {
                let mut store = TimelineStore::bootstrap(unix_now())?;
                for sample in doc.pending {
                    store.insert(sample, Connectivity::Offline)?;
                }
                Ok((store, true))
            }
            None => Ok((TimelineStore::bootstrap(unix_now())?, true)),
        }
    }

    fn persist(&self, identity: &str, store: &TimelineStore) -> PersistStatus {
        let doc = TimelineDocument::new(identity, store.timeline(), store.pending());
        match &self.persistence {
            Persistence::WriteThrough => save_now(self.snapshots.as_ref(), &doc),
            Persistence::WriteBehind(writer) => writer.submit(doc),
        }
    }
}

/// Identity keys double as snapshot file names: 1-64 chars of `[A-Za-z0-9_-]`.
pub fn validate_identity(identity: &str) -> Result<(), NodeError> {
    let ok = !identity.is_empty()
        && identity.len() <= MAX_IDENTITY_LEN
        && identity
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if ok {
        Ok(())
    } else {
        Err(NodeError::InvalidIdentity(identity.to_string()))
    }
}

/// Current wall-clock time in Unix seconds.
pub fn unix_now() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}
