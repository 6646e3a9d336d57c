// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Ledger node definition.

use crate::types::id::NodeId;
use crate::types::sample::Sample;

#[derive(Clone, Debug, PartialEq)]
pub struct LedgerNode {
    pub sample: Sample,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
}

impl LedgerNode {
    pub fn new(sample: Sample) -> Self {
        Self {
            sample,
            prev: None,
            next: None,
        }
    }
}
