// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
#![no_std]

//! geotrail-kernel: per-identity timeline of geospatial samples.
//!
//! A chronological `Ledger`, an `AvlIndex` over its timestamps and a
//! `PendingQueue` for offline samples, composed by `TimelineStore`.

extern crate alloc;

#[cfg(any(test, feature = "std"))]
#[macro_use]
extern crate std;

pub mod config;
pub mod error;
pub mod types;
pub mod ledger;
pub mod index;
pub mod pending;
pub mod timeline;

pub use error::{KernelError, KernelResult};
pub use timeline::TimelineStore;
pub use types::{parse_timestamp, Connectivity, Origin, Sample};

#[cfg(test)]
pub mod tests;
