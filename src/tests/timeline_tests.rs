// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::error::KernelError;
use crate::timeline::TimelineStore;
use crate::types::enums::{Connectivity, Origin};
use crate::types::sample::Sample;
use std::vec::Vec;

fn s(ts: f64) -> Sample {
    Sample::new(ts, 10.0, 20.0).unwrap()
}

fn ts_of(samples: &[Sample]) -> Vec<f64> {
    samples.iter().map(|x| x.timestamp()).collect()
}

fn store_with(timestamps: &[f64]) -> TimelineStore {
    let mut store = TimelineStore::new();
    for &t in timestamps {
        store.insert(s(t), Connectivity::Online).unwrap();
    }
    store
}

#[test]
fn test_online_insert_visible() {
    let mut store = TimelineStore::new();
    let stored = store.insert(s(5.0), Connectivity::Online).unwrap();
    assert_eq!(stored.origin(), Origin::Online);
    assert_eq!(ts_of(&store.timeline()), vec![5.0]);
    assert_eq!(store.search_range(0.0, 10.0).unwrap().len(), 1);
    store.check_invariants().unwrap();
}

#[test]
fn test_offline_insert_invisible_until_sync() {
    let mut store = store_with(&[1.0]);
    let queued = store.insert(s(0.5), Connectivity::Offline).unwrap();
    assert_eq!(queued.origin(), Origin::Offline);
    assert_eq!(store.pending_len(), 1);

    assert_eq!(ts_of(&store.timeline()), vec![1.0]);
    assert!(store.search_range(0.0, 0.9).unwrap().is_empty());
    assert_eq!(ts_of(&store.search_nearest(0.5).unwrap()), vec![1.0]);
}

#[test]
fn test_sync_merges_sorted_and_tagged() {
    let mut store = store_with(&[60.0, 200.0]);
    for t in [100.0, 50.0, 75.0] {
        store.insert(s(t), Connectivity::Offline).unwrap();
    }

    let merged = store.sync();
    assert_eq!(ts_of(&merged), vec![50.0, 75.0, 100.0]);
    assert!(merged.iter().all(|m| m.origin() == Origin::Synced));
    assert_eq!(store.pending_len(), 0);

    let timeline = store.timeline();
    assert_eq!(ts_of(&timeline), vec![50.0, 60.0, 75.0, 100.0, 200.0]);
    let synced = timeline.iter().filter(|m| m.origin() == Origin::Synced).count();
    assert_eq!(synced, 3);
    store.check_invariants().unwrap();
}

#[test]
fn test_sync_ties_keep_enqueue_order() {
    let mut store = TimelineStore::new();
    store.insert(Sample::new(7.0, 1.0, 0.0).unwrap(), Connectivity::Offline).unwrap();
    store.insert(Sample::new(3.0, 2.0, 0.0).unwrap(), Connectivity::Offline).unwrap();
    store.insert(Sample::new(7.0, 3.0, 0.0).unwrap(), Connectivity::Offline).unwrap();

    let merged = store.sync();
    let lats: Vec<f64> = merged.iter().map(|m| m.latitude()).collect();
    assert_eq!(lats, vec![2.0, 1.0, 3.0]);

    let lats: Vec<f64> = store.search_range(7.0, 7.0).unwrap().iter().map(|m| m.latitude()).collect();
    assert_eq!(lats, vec![1.0, 3.0]);
}

#[test]
fn test_sync_empty_is_noop() {
    let mut store = store_with(&[1.0, 2.0]);
    let before = store.timeline();
    assert!(store.sync().is_empty());
    assert_eq!(store.timeline(), before);
    assert_eq!(store.index().entries(), 2);
}

#[test]
fn test_search_range_bounds() {
    let store = store_with(&[1.0, 5.0, 10.0, 15.0, 20.0]);
    assert_eq!(ts_of(&store.search_range(5.0, 15.0).unwrap()), vec![5.0, 10.0, 15.0]);
    assert!(store.search_range(15.0, 5.0).unwrap().is_empty());
    assert_eq!(store.search_range(f64::NAN, 5.0), Err(KernelError::InvalidTimestamp));
    assert_eq!(store.search_range(0.0, f64::INFINITY), Err(KernelError::InvalidTimestamp));
}

#[test]
fn test_search_nearest_scenario() {
    let store = store_with(&[10.0, 5.0, 20.0, 1.0, 15.0]);
    let hit = store.search_nearest(12.0).unwrap();
    assert_eq!(hit.len(), 1);
    assert!((hit[0].timestamp() - 12.0).abs() <= 3.0);
    assert_eq!(store.search_nearest(f64::NAN), Err(KernelError::InvalidTimestamp));
    assert!(TimelineStore::new().search_nearest(1.0).unwrap().is_empty());
}

#[test]
fn test_latest() {
    let store = store_with(&[1.0, 2.0, 3.0, 4.0]);
    assert_eq!(ts_of(&store.latest(2)), vec![3.0, 4.0]);
    assert_eq!(ts_of(&store.latest(10)), vec![1.0, 2.0, 3.0, 4.0]);
    assert!(store.latest(0).is_empty());
}

#[test]
fn test_bootstrap_placeholder() {
    let store = TimelineStore::bootstrap(1_700_000_000.0).unwrap();
    let timeline = store.timeline();
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0].timestamp(), 1_700_000_000.0);
    assert_eq!(timeline[0].latitude(), 0.0);
    assert_eq!(timeline[0].longitude(), 0.0);
    assert_eq!(timeline[0].origin(), Origin::Online);
}

#[test]
fn test_restore_replays_in_order() {
    let timeline = vec![
        s(30.0),
        s(10.0).with_origin(Origin::Synced),
        s(20.0),
    ];
    let pending = vec![s(5.0), s(1.0)];
    let store = TimelineStore::restore(timeline, pending).unwrap();

    let restored = store.timeline();
    assert_eq!(ts_of(&restored), vec![10.0, 20.0, 30.0]);
    assert_eq!(restored[0].origin(), Origin::Synced);
    assert_eq!(ts_of(&store.pending()), vec![5.0, 1.0]);
    assert!(store.pending().iter().all(|p| p.origin() == Origin::Offline));
    store.check_invariants().unwrap();
}

#[test]
fn test_restore_rejects_invalid_sample() {
    let bad: Sample = serde_json::from_str(r#"{"timestamp":1.0,"lat":123.0,"lon":0.0}"#).unwrap();
    let res = TimelineStore::restore(vec![s(1.0), bad], Vec::new());
    assert!(matches!(res, Err(KernelError::InvalidCoordinate)));
}

#[test]
fn test_insert_rejects_before_touching_state() {
    let mut store = store_with(&[1.0]);
    let bad: Sample = serde_json::from_str(r#"{"timestamp":2.0,"lat":0.0,"lon":500.0}"#).unwrap();
    assert_eq!(store.insert(bad, Connectivity::Online), Err(KernelError::InvalidCoordinate));
    assert_eq!(store.insert(bad, Connectivity::Offline), Err(KernelError::InvalidCoordinate));
    assert_eq!(store.len(), 1);
    assert_eq!(store.pending_len(), 0);
}
