// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use geotrail_kernel::KernelError;
use geotrail_persistence::PersistenceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NodeError {
    #[error("Kernel error: {0}")]
    Kernel(#[from] KernelError),
    #[error("Unknown identity: {0}")]
    UnknownIdentity(String),
    #[error("Invalid identity key: {0:?}")]
    InvalidIdentity(String),
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
