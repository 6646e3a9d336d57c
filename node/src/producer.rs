// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Background sample producer.
//!
//! Each round walks every known identity and records one sample for it,
//! online or offline depending on the identity's connectivity flag.

use std::sync::Arc;
use std::time::Duration;

use geotrail_kernel::{Connectivity, KernelError, Sample};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::ProducerConfig;
use crate::registry::{unix_now, Registry};

pub trait SampleSource: Send {
    fn next_sample(&mut self, now: f64) -> Result<Sample, KernelError>;
}

/// Uniform positions: latitude in [-85, 85], longitude in [-180, 180].
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl SampleSource for RandomSource {
    fn next_sample(&mut self, now: f64) -> Result<Sample, KernelError> {
        let lat = self.rng.gen_range(-85.0..=85.0);
        let lon = self.rng.gen_range(-180.0..=180.0);
        Sample::new(now, lat, lon)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RoundStats {
    pub online: usize,
    pub offline: usize,
    pub failed: usize,
}

/// One pass over all known identities. Errors are logged and counted; the
/// round always visits every identity.
pub async fn run_round(registry: &Registry, source: &mut dyn SampleSource, pause: Duration) -> RoundStats {
    let mut stats = RoundStats::default();
    for identity in registry.identities() {
        let outcome = registry.is_online(&identity).and_then(|online| {
            let sample = source.next_sample(unix_now())?;
            registry.insert(&identity, sample, Connectivity::from_online(online))
        });
        match outcome {
            Ok(stored) => {
                if stored.persistence.is_failed() {
                    tracing::warn!("Sample for {} kept in memory only", identity);
                }
                if stored.value.origin() == geotrail_kernel::Origin::Offline {
                    stats.offline += 1;
                } else {
                    stats.online += 1;
                }
            }
            Err(e) => {
                stats.failed += 1;
                tracing::error!("Producer failed for {}: {}", identity, e);
            }
        }
        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
    }
    stats
}

/// Runs rounds until `shutdown` flips to true or its sender is dropped.
pub fn spawn_producer(
    registry: Arc<Registry>,
    mut source: Box<dyn SampleSource>,
    cfg: ProducerConfig,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut jitter = StdRng::from_entropy();
        let pause = Duration::from_millis(cfg.per_identity_pause_ms);
        tracing::info!(
            "Producer started: every {}s + up to {}s",
            cfg.interval_secs,
            cfg.jitter_secs
        );

        loop {
            if *shutdown.borrow() {
                break;
            }
            let stats = run_round(&registry, source.as_mut(), pause).await;
            tracing::debug!(
                "Producer round: {} online, {} offline, {} failed",
                stats.online,
                stats.offline,
                stats.failed
            );

            let extra_ms = jitter.gen_range(0..=cfg.jitter_secs.saturating_mul(1000));
            let wait = Duration::from_secs(cfg.interval_secs) + Duration::from_millis(extra_ms);
            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::info!("Producer stopped");
    })
}
