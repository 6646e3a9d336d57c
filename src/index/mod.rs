// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Timestamp index over ledger handles.

pub mod avl;

pub use avl::AvlIndex;
