// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::sync::Arc;

use geotrail_node::config::{NodeConfig, PersistMode};
use geotrail_node::persistence::spawn_writer;
use geotrail_node::producer::{spawn_producer, RandomSource};
use geotrail_node::telemetry::{init_telemetry, render_metrics};
use geotrail_node::{NodeError, Persistence, Registry};
use geotrail_persistence::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    init_telemetry();

    if let Err(e) = run().await {
        tracing::error!("GeoTrail node failed: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), NodeError> {
    let cfg = NodeConfig::from_env()?;
    tracing::info!("Initializing GeoTrail node with config: {:?}", cfg);

    let snapshots: Arc<dyn SnapshotStore> = match &cfg.data_dir {
        Some(dir) => {
            tracing::info!("Snapshots stored under {:?}", dir);
            Arc::new(FileSnapshotStore::open(dir)?)
        }
        None => {
            tracing::warn!("No data directory configured. Timelines will not survive a restart.");
            Arc::new(MemorySnapshotStore::new())
        }
    };

    let (persistence, writer_task) = match cfg.persist_mode {
        PersistMode::WriteBehind => {
            let (writer, task) = spawn_writer(snapshots.clone());
            (Persistence::WriteBehind(writer), Some(task))
        }
        PersistMode::WriteThrough => (Persistence::WriteThrough, None),
    };

    let registry = Arc::new(Registry::new(snapshots, persistence)?);
    for id in &cfg.identities {
        registry.register(id)?;
    }
    tracing::info!("Tracking {} identities", registry.identities().len());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let producer = if cfg.producer.enabled {
        Some(spawn_producer(
            registry.clone(),
            Box::new(RandomSource::from_entropy()),
            cfg.producer.clone(),
            shutdown_rx,
        ))
    } else {
        tracing::info!("Producer disabled");
        None
    };

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down...");

    let _ = shutdown_tx.send(true);
    if let Some(task) = producer {
        if let Err(e) = task.await {
            tracing::error!("Producer task ended abnormally: {}", e);
        }
    }

    if !registry.flush().await {
        tracing::error!("Snapshot writer stopped before the final flush");
    }
    // Dropping the last registry handle closes the writer channel.
    drop(registry);
    if let Some(task) = writer_task {
        if let Err(e) = task.await {
            tracing::error!("Snapshot writer ended abnormally: {}", e);
        }
    }

    tracing::debug!("Final metrics:\n{}", render_metrics());
    Ok(())
}
