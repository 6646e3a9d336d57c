// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::path::Path;

use geotrail_kernel::Sample;

use crate::commands::insert::failure;
use crate::render::samples_table;
use crate::session::Session;

pub fn run(dir: &Path, identity: &str) -> anyhow::Result<Vec<Sample>> {
    let session = Session::open(dir)?;
    session.require(identity)?;

    let merged = session.registry.sync(identity)?;
    if let Some(reason) = failure(&merged.persistence) {
        anyhow::bail!("Merged {} samples but not saved: {}", merged.value.len(), reason);
    }

    if merged.value.is_empty() {
        println!("Nothing to sync for {}", identity);
    } else {
        println!("\nMerged {} offline samples into {}\n", merged.value.len(), identity);
        println!("{}\n", samples_table(&merged.value));
    }
    Ok(merged.value)
}
