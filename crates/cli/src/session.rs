// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use geotrail_kernel::parse_timestamp;
use geotrail_node::registry::unix_now;
use geotrail_node::{Persistence, Registry};
use geotrail_persistence::FileSnapshotStore;

/// A write-through registry over one data directory, opened per command.
pub struct Session {
    pub dir: PathBuf,
    pub registry: Registry,
    store: Arc<FileSnapshotStore>,
}

impl Session {
    pub fn open(dir: &Path) -> Result<Self> {
        let store = Arc::new(
            FileSnapshotStore::open(dir)
                .with_context(|| format!("Failed to open data directory {:?}", dir))?,
        );
        let registry = Registry::new(store.clone(), Persistence::WriteThrough)
            .context("Failed to open registry")?;
        Ok(Self {
            dir: dir.to_path_buf(),
            registry,
            store,
        })
    }

    pub fn snapshot_path(&self, identity: &str) -> PathBuf {
        self.store.path_for(identity)
    }

    /// Fails with a hint when the identity was never registered.
    pub fn require(&self, identity: &str) -> Result<()> {
        if self.registry.is_known(identity) {
            Ok(())
        } else {
            anyhow::bail!("Unknown identity {:?}. Run `geotrail register {}` first.", identity, identity)
        }
    }
}

/// Accepts Unix seconds or an RFC 3339 date. `None` means now.
pub fn parse_ts(raw: Option<&str>) -> Result<f64> {
    let Some(raw) = raw else {
        return Ok(unix_now());
    };
    if let Ok(ts) = parse_timestamp(raw) {
        return Ok(ts);
    }
    let dt = chrono::DateTime::parse_from_rfc3339(raw.trim())
        .with_context(|| format!("Invalid timestamp {:?}: expected seconds or RFC 3339", raw))?;
    Ok(dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) / 1e9)
}
