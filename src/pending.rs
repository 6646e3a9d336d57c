// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! FIFO buffer for samples recorded while offline.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::types::sample::Sample;

#[derive(Clone, Debug, Default)]
pub struct PendingQueue {
    entries: VecDeque<Sample>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, sample: Sample) {
        self.entries.push_back(sample);
    }

    /// Removes every entry in arrival order. The queue is empty afterwards.
    pub fn drain_all(&mut self) -> Vec<Sample> {
        core::mem::take(&mut self.entries).into()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<Sample> {
        self.entries.iter().copied().collect()
    }
}
