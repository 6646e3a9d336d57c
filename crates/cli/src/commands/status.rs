// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::path::Path;

use crate::render::{format_ts, kv_table};
use crate::session::Session;

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub samples: usize,
    pub pending: usize,
    pub online: bool,
    pub latest: Option<f64>,
}

pub fn run(dir: &Path, identity: &str) -> anyhow::Result<Status> {
    let session = Session::open(dir)?;
    session.require(identity)?;
    let registry = &session.registry;

    let status = Status {
        samples: registry.timeline(identity)?.len(),
        pending: registry.pending_len(identity)?,
        online: registry.is_online(identity)?,
        latest: registry.latest(identity, 1)?.first().map(|s| s.timestamp()),
    };
    registry.verify(identity)?;

    let table = kv_table(&[
        ("Identity", identity.to_string()),
        ("Samples", status.samples.to_string()),
        ("Pending", status.pending.to_string()),
        ("Online", status.online.to_string()),
        ("Latest", status.latest.map(format_ts).unwrap_or_else(|| "-".to_string())),
        ("Snapshot", session.snapshot_path(identity).display().to_string()),
    ]);
    println!("\nGeoTrail Status\n---------------");
    println!("{table}\n");
    Ok(status)
}
