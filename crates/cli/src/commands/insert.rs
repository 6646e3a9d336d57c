// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::path::Path;

use geotrail_kernel::{Connectivity, Sample};

use crate::render::samples_table;
use crate::session::{parse_ts, Session};

pub fn run(
    dir: &Path,
    identity: &str,
    ts: Option<&str>,
    lat: f64,
    lon: f64,
    offline: bool,
) -> anyhow::Result<Sample> {
    let session = Session::open(dir)?;
    session.require(identity)?;

    let sample = Sample::new(parse_ts(ts)?, lat, lon)?;
    let stored = session
        .registry
        .insert(identity, sample, Connectivity::from_online(!offline))?;
    if let Some(reason) = failure(&stored.persistence) {
        anyhow::bail!("Sample accepted but not saved: {}", reason);
    }

    println!("{}", samples_table(&[stored.value]));
    if offline {
        println!(
            "Queued offline. {} sample(s) waiting for sync.",
            session.registry.pending_len(identity)?
        );
    }
    Ok(stored.value)
}

pub(crate) fn failure(status: &geotrail_node::PersistStatus) -> Option<&str> {
    match status {
        geotrail_node::PersistStatus::Failed(reason) => Some(reason.as_str()),
        _ => None,
    }
}
