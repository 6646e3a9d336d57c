// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::path::Path;

use crate::session::Session;

/// Registers the identity and writes its first snapshot. Returns false when it
/// was already known.
pub fn run(dir: &Path, identity: &str) -> anyhow::Result<bool> {
    let session = Session::open(dir)?;
    let added = session.registry.register(identity)?;
    // First access bootstraps and saves the timeline.
    let len = session.registry.timeline(identity)?.len();

    if added {
        println!("Registered {} ({} sample)", identity, len);
    } else {
        println!("{} is already registered ({} samples)", identity, len);
    }
    Ok(added)
}
