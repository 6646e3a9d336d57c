use std::sync::Arc;
use std::time::Duration;

use geotrail_kernel::{KernelError, Origin, Sample};
use geotrail_node::config::ProducerConfig;
use geotrail_node::producer::{run_round, spawn_producer, RandomSource, RoundStats, SampleSource};
use geotrail_node::{Persistence, Registry};
use geotrail_persistence::MemorySnapshotStore;
use tokio::sync::watch;

/// Emits strictly increasing timestamps at a fixed position.
struct StepSource {
    next: f64,
}

impl SampleSource for StepSource {
    fn next_sample(&mut self, _now: f64) -> Result<Sample, KernelError> {
        self.next += 1.0;
        Sample::new(self.next, 48.85, 2.35)
    }
}

struct BrokenSource;

impl SampleSource for BrokenSource {
    fn next_sample(&mut self, _now: f64) -> Result<Sample, KernelError> {
        Sample::new(f64::NAN, 0.0, 0.0)
    }
}

fn registry_with(ids: &[&str]) -> Registry {
    let registry = Registry::new(Arc::new(MemorySnapshotStore::new()), Persistence::WriteThrough).unwrap();
    for id in ids {
        registry.register(id).unwrap();
    }
    registry
}

#[tokio::test]
async fn test_round_respects_connectivity() {
    let registry = registry_with(&["alice", "bob"]);
    registry.set_online("bob", false).unwrap();

    let mut source = StepSource { next: 0.0 };
    let stats = run_round(&registry, &mut source, Duration::ZERO).await;
    assert_eq!(stats, RoundStats { online: 1, offline: 1, failed: 0 });

    assert_eq!(registry.timeline("alice").unwrap().len(), 2);
    assert_eq!(registry.timeline("bob").unwrap().len(), 1);
    let pending = registry.pending("bob").unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].origin(), Origin::Offline);

    registry.set_online("bob", true).unwrap();
    let merged = registry.sync("bob").unwrap();
    assert_eq!(merged.value.len(), 1);
    assert_eq!(registry.timeline("bob").unwrap().len(), 2);
}

#[tokio::test]
async fn test_round_counts_failures_and_continues() {
    let registry = registry_with(&["carol", "dave"]);
    let stats = run_round(&registry, &mut BrokenSource, Duration::ZERO).await;
    assert_eq!(stats.failed, 2);
    assert_eq!(stats.online + stats.offline, 0);
    assert_eq!(registry.timeline("carol").unwrap().len(), 1);
}

#[test]
fn test_random_source_stays_in_bounds() {
    let mut source = RandomSource::seeded(7);
    for i in 0..500 {
        let s = source.next_sample(f64::from(i)).unwrap();
        assert!((-85.0..=85.0).contains(&s.latitude()));
        assert!((-180.0..=180.0).contains(&s.longitude()));
        assert_eq!(s.timestamp(), f64::from(i));
    }
}

#[tokio::test]
async fn test_spawned_producer_stops_on_shutdown() {
    let registry = Arc::new(registry_with(&["erin"]));
    let (tx, rx) = watch::channel(false);
    let cfg = ProducerConfig {
        enabled: true,
        interval_secs: 3600,
        jitter_secs: 0,
        per_identity_pause_ms: 0,
    };
    let handle = spawn_producer(registry.clone(), Box::new(StepSource { next: 0.0 }), cfg, rx);

    // The first round runs immediately, then the task parks on its interval.
    let produced = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if registry.timeline("erin").unwrap().len() > 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(produced.is_ok());

    tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("producer did not stop")
        .unwrap();
}
