// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Chronological sample ledger.

pub mod node;
pub mod list;

pub use list::{Ledger, LedgerIter};
pub use node::LedgerNode;
