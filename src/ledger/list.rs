// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Doubly linked ledger over an arena.
//!
//! Nodes live in a `Vec` owned by the ledger and link to each other through
//! `NodeId` handles. Nodes are never removed one by one, so a handle stays
//! valid until `clear`.

use alloc::vec::Vec;

use crate::error::{KernelError, Result};
use crate::ledger::node::LedgerNode;
use crate::types::id::NodeId;
use crate::types::sample::Sample;

#[derive(Clone, Debug, Default)]
pub struct Ledger {
    nodes: Vec<LedgerNode>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    pub fn tail(&self) -> Option<NodeId> {
        self.tail
    }

    pub fn get(&self, id: NodeId) -> Option<&Sample> {
        self.nodes.get(id.idx()).map(|n| &n.sample)
    }

    pub fn node(&self, id: NodeId) -> Option<&LedgerNode> {
        self.nodes.get(id.idx())
    }

    /// Appends at the tail when the sample is not older than the tail.
    /// Older samples fall back to [`Ledger::insert_sorted`].
    pub fn append(&mut self, sample: Sample) -> NodeId {
        match self.tail {
            Some(tail) if sample.timestamp() < self.ts(tail) => self.insert_sorted(sample),
            _ => {
                let id = self.alloc(sample);
                self.link_after_tail(id);
                id
            }
        }
    }

    /// Inserts at the position that keeps the ledger non-decreasing.
    ///
    /// A tie with the tail appends, a tie with the head (when the tail is
    /// newer) goes in front of it, and an interior tie lands after the last
    /// equal node. Anything between head and tail is found by walking back
    /// from the tail, which is cheap for the near-chronological inserts this
    /// sees in practice and linear otherwise.
    pub fn insert_sorted(&mut self, sample: Sample) -> NodeId {
        let ts = sample.timestamp();
        let (head, tail) = match (self.head, self.tail) {
            (Some(h), Some(t)) => (h, t),
            _ => {
                let id = self.alloc(sample);
                self.head = Some(id);
                self.tail = Some(id);
                return id;
            }
        };

        if ts >= self.ts(tail) {
            let id = self.alloc(sample);
            self.link_after_tail(id);
            return id;
        }

        if ts <= self.ts(head) {
            let id = self.alloc(sample);
            self.nodes[id.idx()].next = Some(head);
            self.nodes[head.idx()].prev = Some(id);
            self.head = Some(id);
            return id;
        }

        // head.ts < ts < tail.ts, so the walk stops before reaching head.
        let mut cursor = tail;
        while self.ts(cursor) > ts {
            match self.nodes[cursor.idx()].prev {
                Some(prev) => cursor = prev,
                None => break,
            }
        }

        let id = self.alloc(sample);
        let next = self.nodes[cursor.idx()].next;
        self.nodes[id.idx()].prev = Some(cursor);
        self.nodes[id.idx()].next = next;
        self.nodes[cursor.idx()].next = Some(id);
        match next {
            Some(n) => self.nodes[n.idx()].prev = Some(id),
            None => self.tail = Some(id),
        }
        id
    }

    /// Ascending copy of every sample.
    pub fn snapshot(&self) -> Vec<Sample> {
        let mut out = Vec::with_capacity(self.nodes.len());
        out.extend(self.iter().copied());
        out
    }

    pub fn iter(&self) -> LedgerIter<'_> {
        LedgerIter {
            ledger: self,
            current: self.head,
        }
    }

    /// Walks backward from the tail.
    pub fn iter_rev(&self) -> impl Iterator<Item = &Sample> + '_ {
        let mut current = self.tail;
        core::iter::from_fn(move || {
            let id = current?;
            let node = &self.nodes[id.idx()];
            current = node.prev;
            Some(&node.sample)
        })
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    /// Checks link symmetry, reachability and chronological order.
    pub fn check_invariants(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return match (self.head, self.tail) {
                (None, None) => Ok(()),
                _ => Err(KernelError::InvariantViolation("ledger: dangling head or tail")),
            };
        }

        let head = self
            .head
            .ok_or(KernelError::InvariantViolation("ledger: missing head"))?;
        if self.nodes[head.idx()].prev.is_some() {
            return Err(KernelError::InvariantViolation("ledger: head has predecessor"));
        }

        let mut visited = 0usize;
        let mut prev: Option<NodeId> = None;
        let mut current = Some(head);
        while let Some(id) = current {
            let node = self
                .nodes
                .get(id.idx())
                .ok_or(KernelError::InvariantViolation("ledger: link out of bounds"))?;
            if node.prev != prev {
                return Err(KernelError::InvariantViolation("ledger: asymmetric links"));
            }
            if let Some(p) = prev {
                if self.ts(p) > node.sample.timestamp() {
                    return Err(KernelError::InvariantViolation("ledger: out of order"));
                }
            }
            visited += 1;
            if visited > self.nodes.len() {
                return Err(KernelError::InvariantViolation("ledger: cycle"));
            }
            prev = Some(id);
            current = node.next;
        }

        if prev != self.tail {
            return Err(KernelError::InvariantViolation("ledger: tail mismatch"));
        }
        if visited != self.nodes.len() {
            return Err(KernelError::InvariantViolation("ledger: unreachable nodes"));
        }
        Ok(())
    }

    fn alloc(&mut self, sample: Sample) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(LedgerNode::new(sample));
        id
    }

    fn link_after_tail(&mut self, id: NodeId) {
        match self.tail {
            Some(tail) => {
                self.nodes[tail.idx()].next = Some(id);
                self.nodes[id.idx()].prev = Some(tail);
            }
            None => self.head = Some(id),
        }
        self.tail = Some(id);
    }

    fn ts(&self, id: NodeId) -> f64 {
        self.nodes[id.idx()].sample.timestamp()
    }
}

/// Iterator over samples in chronological order.
pub struct LedgerIter<'a> {
    ledger: &'a Ledger,
    current: Option<NodeId>,
}

impl<'a> Iterator for LedgerIter<'a> {
    type Item = &'a Sample;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.ledger.nodes.get(id.idx())?;
        self.current = node.next;
        Some(&node.sample)
    }
}
