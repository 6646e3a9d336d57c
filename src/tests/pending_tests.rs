// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::pending::PendingQueue;
use crate::types::sample::Sample;
use std::vec::Vec;

#[test]
fn test_fifo_drain() {
    let mut q = PendingQueue::new();
    for ts in [100.0, 50.0, 75.0] {
        q.enqueue(Sample::new(ts, 0.0, 0.0).unwrap());
    }
    assert_eq!(q.len(), 3);
    assert_eq!(q.to_vec().len(), 3);

    let drained: Vec<f64> = q.drain_all().iter().map(|s| s.timestamp()).collect();
    assert_eq!(drained, vec![100.0, 50.0, 75.0]);
    assert!(q.is_empty());
}

#[test]
fn test_drain_empty_is_noop() {
    let mut q = PendingQueue::new();
    assert!(q.drain_all().is_empty());
    assert_eq!(q.len(), 0);
}
