// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::index::AvlIndex;
use crate::types::id::NodeId;
use std::vec::Vec;

fn build(keys: &[f64]) -> AvlIndex {
    let mut index = AvlIndex::new();
    for (i, &k) in keys.iter().enumerate() {
        index.insert(k, NodeId(i as u32));
        index.check_invariants().unwrap();
    }
    index
}

#[test]
fn test_rotation_cases_stay_balanced() {
    // RR, LL, LR and RL shapes each force one rotation at the root
    for keys in [
        [1.0, 2.0, 3.0],
        [3.0, 2.0, 1.0],
        [3.0, 1.0, 2.0],
        [1.0, 3.0, 2.0],
    ] {
        let index = build(&keys);
        assert_eq!(index.height(), 2);
        assert_eq!(index.keys(), vec![1.0, 2.0, 3.0]);
    }
}

#[test]
fn test_sequential_inserts_log_height() {
    let keys: Vec<f64> = (0..1024).map(|i| i as f64).collect();
    let index = build(&keys);
    assert_eq!(index.len(), 1024);
    // AVL height bound: 1.44 * log2(n + 2)
    assert!(index.height() <= 15, "height {}", index.height());
}

#[test]
fn test_duplicate_keys_share_bucket() {
    let mut index = AvlIndex::new();
    index.insert(5.0, NodeId(0));
    index.insert(5.0, NodeId(1));
    index.insert(7.0, NodeId(2));
    index.insert(5.0, NodeId(3));

    assert_eq!(index.len(), 2);
    assert_eq!(index.entries(), 4);
    assert_eq!(index.search_range(5.0, 5.0), vec![NodeId(0), NodeId(1), NodeId(3)]);
    index.check_invariants().unwrap();
}

#[test]
fn test_search_range_inclusive() {
    let index = build(&[10.0, 5.0, 20.0, 1.0, 15.0]);
    // NodeId = insertion position
    assert_eq!(index.search_range(5.0, 15.0), vec![NodeId(1), NodeId(0), NodeId(4)]);
    assert_eq!(index.search_range(0.0, 100.0).len(), 5);
    assert!(index.search_range(16.0, 19.0).is_empty());
    assert!(index.search_range(30.0, 40.0).is_empty());
    assert_eq!(index.search_range(20.0, 20.0), vec![NodeId(2)]);
}

#[test]
fn test_find_nearest_exact_and_close() {
    let index = build(&[10.0, 5.0, 20.0, 1.0, 15.0]);
    assert_eq!(index.find_nearest(15.0), vec![NodeId(4)]);

    let hit = index.find_nearest(12.0);
    assert_eq!(hit.len(), 1);
    // Either 10 (NodeId 0) or 15 (NodeId 4) is acceptable along the path
    assert!(hit[0] == NodeId(0) || hit[0] == NodeId(4));

    assert_eq!(index.find_nearest(-100.0), vec![NodeId(3)]);
    assert_eq!(index.find_nearest(1000.0), vec![NodeId(2)]);
}

#[test]
fn test_find_nearest_tie_keeps_first_on_path() {
    // Tree after inserts: root 20, left 10, right 30, 10.right = 19
    let index = build(&[20.0, 10.0, 30.0, 19.0]);
    // Target 25: path visits 20 then 30. Both are 5 away; first seen wins.
    assert_eq!(index.find_nearest(25.0), vec![NodeId(0)]);
    // Target 19.4: path 20 -> 10 -> 19; 19 replaces 20 (0.4 vs 0.6)
    assert_eq!(index.find_nearest(19.4), vec![NodeId(3)]);
}

#[test]
fn test_empty_index() {
    let index = AvlIndex::new();
    assert!(index.find_nearest(3.0).is_empty());
    assert!(index.search_range(0.0, 10.0).is_empty());
    assert_eq!(index.height(), 0);
    index.check_invariants().unwrap();
}

#[test]
fn test_clear() {
    let mut index = build(&[1.0, 2.0, 3.0]);
    index.clear();
    assert!(index.is_empty());
    assert_eq!(index.entries(), 0);
    index.check_invariants().unwrap();
}
