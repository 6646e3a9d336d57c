// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Per-identity timeline store.
//!
//! Composes the `Ledger`, the `AvlIndex` over it and the `PendingQueue`.
//! The store is I/O-free; callers decide when to persist `timeline()` and
//! `pending()` after a mutation.

use alloc::vec::Vec;

use crate::config::{BOOTSTRAP_LAT, BOOTSTRAP_LON};
use crate::error::{KernelError, Result};
use crate::index::AvlIndex;
use crate::ledger::Ledger;
use crate::pending::PendingQueue;
use crate::types::enums::{Connectivity, Origin};
use crate::types::id::NodeId;
use crate::types::sample::{check_timestamp, Sample};

#[derive(Clone, Debug, Default)]
pub struct TimelineStore {
    ledger: Ledger,
    index: AvlIndex,
    pending: PendingQueue,
}

impl TimelineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh store holding a single placeholder sample at `now`.
    pub fn bootstrap(now: f64) -> Result<Self> {
        let mut store = Self::new();
        let placeholder = Sample::new(now, BOOTSTRAP_LAT, BOOTSTRAP_LON)?;
        store.insert(placeholder, Connectivity::Online)?;
        Ok(store)
    }

    /// Rebuilds a store from persisted state.
    ///
    /// The timeline is replayed in ascending timestamp order (stable, so equal
    /// timestamps keep their stored order) with the origin it was saved with.
    /// Pending entries are re-enqueued in stored order as `offline`. Every
    /// sample is validated before anything is built.
    pub fn restore(timeline: Vec<Sample>, pending: Vec<Sample>) -> Result<Self> {
        for sample in timeline.iter().chain(pending.iter()) {
            sample.validate()?;
        }

        let mut timeline = timeline;
        timeline.sort_by(|a, b| a.timestamp().total_cmp(&b.timestamp()));

        let mut store = Self::new();
        for sample in timeline {
            let id = store.ledger.append(sample);
            store.index.insert(sample.timestamp(), id);
        }
        for sample in pending {
            store.pending.enqueue(sample.with_origin(Origin::Offline));
        }
        Ok(store)
    }

    /// Records a sample.
    ///
    /// Online samples go to the ledger and index tagged `online`. Offline
    /// samples are tagged `offline` and wait in the pending queue, invisible to
    /// reads until [`TimelineStore::sync`]. Returns the stored copy.
    pub fn insert(&mut self, sample: Sample, link: Connectivity) -> Result<Sample> {
        sample.validate()?;
        match link {
            Connectivity::Online => {
                let stored = sample.with_origin(Origin::Online);
                let id = self.ledger.append(stored);
                self.index.insert(stored.timestamp(), id);
                Ok(stored)
            }
            Connectivity::Offline => {
                let queued = sample.with_origin(Origin::Offline);
                self.pending.enqueue(queued);
                Ok(queued)
            }
        }
    }

    /// Merges every pending sample into the ledger and index.
    ///
    /// Entries are sorted by timestamp with a stable sort, so ties keep their
    /// arrival order, and are stored tagged `synced`. Returns the merged
    /// samples in merge order. An empty queue leaves the store untouched.
    pub fn sync(&mut self) -> Vec<Sample> {
        let mut drained = self.pending.drain_all();
        if drained.is_empty() {
            return drained;
        }
        drained.sort_by(|a, b| a.timestamp().total_cmp(&b.timestamp()));

        for slot in drained.iter_mut() {
            let merged = slot.with_origin(Origin::Synced);
            let id = self.ledger.insert_sorted(merged);
            self.index.insert(merged.timestamp(), id);
            *slot = merged;
        }
        drained
    }

    pub fn timeline(&self) -> Vec<Sample> {
        self.ledger.snapshot()
    }

    /// The last `count` samples of the timeline, oldest first.
    pub fn latest(&self, count: usize) -> Vec<Sample> {
        let mut out: Vec<Sample> = self.ledger.iter_rev().take(count).copied().collect();
        out.reverse();
        out
    }

    /// Samples with `start <= timestamp <= end`, ascending.
    pub fn search_range(&self, start: f64, end: f64) -> Result<Vec<Sample>> {
        let start = check_timestamp(start)?;
        let end = check_timestamp(end)?;
        if start > end {
            return Ok(Vec::new());
        }
        self.materialize(&self.index.search_range(start, end))
    }

    /// Samples at the closest timestamp found along the index search path.
    pub fn search_nearest(&self, target: f64) -> Result<Vec<Sample>> {
        let target = check_timestamp(target)?;
        self.materialize(&self.index.find_nearest(target))
    }

    pub fn pending(&self) -> Vec<Sample> {
        self.pending.to_vec()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn len(&self) -> usize {
        self.ledger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn index(&self) -> &AvlIndex {
        &self.index
    }

    /// Checks each structure and that the index covers the ledger exactly.
    pub fn check_invariants(&self) -> Result<()> {
        self.ledger.check_invariants()?;
        self.index.check_invariants()?;
        if self.index.entries() != self.ledger.len() {
            return Err(KernelError::InvariantViolation("store: index and ledger sizes differ"));
        }
        if self.pending.iter().any(|s| s.origin() != Origin::Offline) {
            return Err(KernelError::InvariantViolation("store: pending entry not offline"));
        }
        Ok(())
    }

    fn materialize(&self, ids: &[NodeId]) -> Result<Vec<Sample>> {
        ids.iter()
            .map(|&id| {
                self.ledger
                    .get(id)
                    .copied()
                    .ok_or(KernelError::InvariantViolation("store: index handle not in ledger"))
            })
            .collect()
    }
}
