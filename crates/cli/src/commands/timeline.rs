// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::path::Path;

use geotrail_kernel::Sample;

use crate::render::samples_table;
use crate::session::Session;

/// Full timeline, or only the newest `latest` samples. Always in time order.
pub fn run(dir: &Path, identity: &str, latest: Option<usize>) -> anyhow::Result<Vec<Sample>> {
    let session = Session::open(dir)?;
    session.require(identity)?;

    let samples = match latest {
        Some(n) => session.registry.latest(identity, n)?,
        None => session.registry.timeline(identity)?,
    };

    println!("\nTimeline for {} ({} samples)\n", identity, samples.len());
    println!("{}\n", samples_table(&samples));
    Ok(samples)
}
