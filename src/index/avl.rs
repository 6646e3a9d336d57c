// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! AVL tree keyed by timestamp.
//!
//! Each tree node carries a bucket of ledger handles sharing one exact
//! timestamp, in insertion order. The tree never owns samples; it only maps
//! keys to `NodeId`s handed out by the `Ledger` it sits next to.

use alloc::vec::Vec;

use crate::error::{KernelError, Result};
use crate::types::id::{NodeId, TreeSlot};

#[derive(Clone, Debug)]
struct TreeNode {
    key: f64,
    refs: Vec<NodeId>,
    left: Option<TreeSlot>,
    right: Option<TreeSlot>,
    height: i32,
}

#[derive(Clone, Debug, Default)]
pub struct AvlIndex {
    nodes: Vec<TreeNode>,
    root: Option<TreeSlot>,
    entries: usize,
}

impl AvlIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of ledger handles across all buckets.
    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn height(&self) -> i32 {
        self.h(self.root)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.entries = 0;
    }

    pub fn insert(&mut self, key: f64, node: NodeId) {
        let root = self.root;
        let root = self.insert_at(root, key, node);
        self.root = Some(root);
        self.entries += 1;
    }

    /// Handles with `start <= key <= end`, ascending by key.
    pub fn search_range(&self, start: f64, end: f64) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_range(self.root, start, end, &mut out);
        out
    }

    /// Single-path descent towards `target`.
    ///
    /// Only nodes on the search path are candidates, so the result is the
    /// closest key seen on the way down, not necessarily the closest key in
    /// the tree. An exact match returns immediately.
    pub fn find_nearest(&self, target: f64) -> Vec<NodeId> {
        let mut best = match self.root {
            Some(root) => root,
            None => return Vec::new(),
        };
        let mut current = self.root;
        while let Some(slot) = current {
            let node = &self.nodes[slot.idx()];
            if distance(node.key, target) < distance(self.nodes[best.idx()].key, target) {
                best = slot;
            }
            if target < node.key {
                current = node.left;
            } else if target > node.key {
                current = node.right;
            } else {
                return node.refs.clone();
            }
        }
        self.nodes[best.idx()].refs.clone()
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.nodes.len());
        self.collect_keys(self.root, &mut out);
        out
    }

    /// Checks heights, AVL balance and strict key order across the tree.
    pub fn check_invariants(&self) -> Result<()> {
        let (_, refs, count) = self.check_subtree(self.root, None, None)?;
        if count != self.nodes.len() {
            return Err(KernelError::InvariantViolation("index: unreachable tree nodes"));
        }
        if refs != self.entries {
            return Err(KernelError::InvariantViolation("index: entry count drift"));
        }
        Ok(())
    }

    fn insert_at(&mut self, slot: Option<TreeSlot>, key: f64, node: NodeId) -> TreeSlot {
        let slot = match slot {
            Some(s) => s,
            None => return self.alloc(key, node),
        };

        let here = self.nodes[slot.idx()].key;
        if key < here {
            let left = self.nodes[slot.idx()].left;
            let left = self.insert_at(left, key, node);
            self.nodes[slot.idx()].left = Some(left);
        } else if key > here {
            let right = self.nodes[slot.idx()].right;
            let right = self.insert_at(right, key, node);
            self.nodes[slot.idx()].right = Some(right);
        } else {
            self.nodes[slot.idx()].refs.push(node);
            return slot;
        }

        self.update_height(slot);
        let balance = self.balance_factor(slot);

        if balance > 1 {
            if let Some(left) = self.nodes[slot.idx()].left {
                let left_key = self.nodes[left.idx()].key;
                // LL
                if key < left_key {
                    return self.rotate_right(slot);
                }
                // LR
                if key > left_key {
                    let new_left = self.rotate_left(left);
                    self.nodes[slot.idx()].left = Some(new_left);
                    return self.rotate_right(slot);
                }
            }
        }

        if balance < -1 {
            if let Some(right) = self.nodes[slot.idx()].right {
                let right_key = self.nodes[right.idx()].key;
                // RR
                if key > right_key {
                    return self.rotate_left(slot);
                }
                // RL
                if key < right_key {
                    let new_right = self.rotate_right(right);
                    self.nodes[slot.idx()].right = Some(new_right);
                    return self.rotate_left(slot);
                }
            }
        }

        slot
    }

    fn rotate_right(&mut self, y: TreeSlot) -> TreeSlot {
        let x = match self.nodes[y.idx()].left {
            Some(x) => x,
            None => return y,
        };
        let t2 = self.nodes[x.idx()].right;
        self.nodes[x.idx()].right = Some(y);
        self.nodes[y.idx()].left = t2;
        self.update_height(y);
        self.update_height(x);
        x
    }

    fn rotate_left(&mut self, x: TreeSlot) -> TreeSlot {
        let y = match self.nodes[x.idx()].right {
            Some(y) => y,
            None => return x,
        };
        let t2 = self.nodes[y.idx()].left;
        self.nodes[y.idx()].left = Some(x);
        self.nodes[x.idx()].right = t2;
        self.update_height(x);
        self.update_height(y);
        y
    }

    fn collect_range(&self, slot: Option<TreeSlot>, start: f64, end: f64, out: &mut Vec<NodeId>) {
        let node = match slot {
            Some(s) => &self.nodes[s.idx()],
            None => return,
        };
        if node.key > start {
            self.collect_range(node.left, start, end, out);
        }
        if start <= node.key && node.key <= end {
            out.extend_from_slice(&node.refs);
        }
        if node.key < end {
            self.collect_range(node.right, start, end, out);
        }
    }

    fn collect_keys(&self, slot: Option<TreeSlot>, out: &mut Vec<f64>) {
        if let Some(s) = slot {
            let node = &self.nodes[s.idx()];
            self.collect_keys(node.left, out);
            out.push(node.key);
            self.collect_keys(node.right, out);
        }
    }

    /// Returns (height, handle count, node count) of the subtree.
    fn check_subtree(
        &self,
        slot: Option<TreeSlot>,
        lower: Option<f64>,
        upper: Option<f64>,
    ) -> Result<(i32, usize, usize)> {
        let s = match slot {
            Some(s) => s,
            None => return Ok((0, 0, 0)),
        };
        let node = self
            .nodes
            .get(s.idx())
            .ok_or(KernelError::InvariantViolation("index: slot out of bounds"))?;

        if lower.map_or(false, |lo| node.key <= lo) || upper.map_or(false, |hi| node.key >= hi) {
            return Err(KernelError::InvariantViolation("index: key order"));
        }
        if node.refs.is_empty() {
            return Err(KernelError::InvariantViolation("index: empty bucket"));
        }

        let (lh, lr, lc) = self.check_subtree(node.left, lower, Some(node.key))?;
        let (rh, rr, rc) = self.check_subtree(node.right, Some(node.key), upper)?;

        let height = 1 + lh.max(rh);
        if height != node.height {
            return Err(KernelError::InvariantViolation("index: stale height"));
        }
        if !(-1..=1).contains(&(lh - rh)) {
            return Err(KernelError::InvariantViolation("index: unbalanced"));
        }
        Ok((height, lr + rr + node.refs.len(), lc + rc + 1))
    }

    fn alloc(&mut self, key: f64, node: NodeId) -> TreeSlot {
        let slot = TreeSlot(self.nodes.len() as u32);
        let mut refs = Vec::with_capacity(1);
        refs.push(node);
        self.nodes.push(TreeNode {
            key,
            refs,
            left: None,
            right: None,
            height: 1,
        });
        slot
    }

    fn h(&self, slot: Option<TreeSlot>) -> i32 {
        slot.map_or(0, |s| self.nodes[s.idx()].height)
    }

    fn balance_factor(&self, slot: TreeSlot) -> i32 {
        let node = &self.nodes[slot.idx()];
        self.h(node.left) - self.h(node.right)
    }

    fn update_height(&mut self, slot: TreeSlot) {
        let node = &self.nodes[slot.idx()];
        let height = 1 + self.h(node.left).max(self.h(node.right));
        self.nodes[slot.idx()].height = height;
    }
}

fn distance(a: f64, b: f64) -> f64 {
    if a > b {
        a - b
    } else {
        b - a
    }
}
