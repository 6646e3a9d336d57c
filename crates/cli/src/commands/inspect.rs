// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::path::Path;

use geotrail_persistence::{snapshot, SnapshotHeader};

use crate::render::{format_ts, kv_table};

/// Prints the header and verifies the body. Fails if the body does not check out.
pub fn run(path: &Path) -> anyhow::Result<SnapshotHeader> {
    let header = snapshot::read_header(path)?;

    let mut rows = vec![
        ("Magic", String::from_utf8_lossy(&header.magic).into_owned()),
        ("Version", header.version.to_string()),
        ("Saved At", format_ts(header.saved_at as f64)),
        ("Timeline", header.timeline_len.to_string()),
        ("Pending", header.pending_len.to_string()),
        ("Body Bytes", header.body_len.to_string()),
        ("Checksum", format!("{:016x}", header.checksum)),
    ];

    let verdict = snapshot::read_snapshot(path);
    match &verdict {
        Ok((_, doc)) => {
            rows.push(("Identity", doc.identity.clone()));
            rows.push(("Status", "VERIFIED".to_string()));
        }
        Err(e) => rows.push(("Status", format!("CORRUPT: {}", e))),
    }

    println!("\nSnapshot {}\n", path.display());
    println!("{}\n", kv_table(&rows));
    verdict?;
    Ok(header)
}
