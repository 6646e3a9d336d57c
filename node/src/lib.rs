// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod config;
pub mod errors;
pub mod persistence;
pub mod producer;
pub mod registry;
pub mod telemetry;

pub use errors::NodeError;
pub use persistence::PersistStatus;
pub use registry::{Persisted, Persistence, Registry};
