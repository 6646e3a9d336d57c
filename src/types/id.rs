// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Handle types.

/// Handle to a node owned by a `Ledger`. Index into the ledger arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct NodeId(pub u32);

/// Handle to a node inside the `AvlIndex` arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct TreeSlot(pub u32);

impl NodeId {
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

impl TreeSlot {
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}
