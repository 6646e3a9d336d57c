// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::path::Path;

use geotrail_kernel::Sample;

use crate::render::samples_table;
use crate::session::{parse_ts, Session};

pub fn range(dir: &Path, identity: &str, start: &str, end: &str) -> anyhow::Result<Vec<Sample>> {
    let session = Session::open(dir)?;
    session.require(identity)?;

    let (start, end) = (parse_ts(Some(start))?, parse_ts(Some(end))?);
    let hits = session.registry.search_range(identity, start, end)?;

    println!("\n{} samples between {} and {}\n", hits.len(), start, end);
    println!("{}\n", samples_table(&hits));
    Ok(hits)
}

pub fn nearest(dir: &Path, identity: &str, target: &str) -> anyhow::Result<Vec<Sample>> {
    let session = Session::open(dir)?;
    session.require(identity)?;

    let target = parse_ts(Some(target))?;
    let hits = session.registry.search_nearest(identity, target)?;

    println!("\nNearest to {}\n", target);
    println!("{}\n", samples_table(&hits));
    Ok(hits)
}
