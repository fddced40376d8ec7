// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Instance allocation: uniqueness under real concurrency

use crate::prelude::bootstrap;
use std::collections::HashSet;
use std::thread;
use warren_core::{Coordinator, CoordinatorConfig, NoOpLogSink, SystemClock};

#[test]
fn sequential_instances_count_up_from_one() {
    let tmp = tempfile::tempdir().unwrap();

    let first = bootstrap("job", tmp.path());
    let second = bootstrap("job", tmp.path());

    assert_eq!(first.instance_number(), 1);
    assert_eq!(second.instance_number(), 2);
}

#[test]
fn concurrent_allocators_receive_distinct_numbers() {
    const RACERS: usize = 8;
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().to_path_buf();

    let handles: Vec<_> = (0..RACERS)
        .map(|_| {
            let root = root.clone();
            thread::spawn(move || {
                Coordinator::bootstrap(
                    CoordinatorConfig::new("job", &root),
                    SystemClock,
                    NoOpLogSink,
                )
                .expect("bootstrap")
                .instance_number()
            })
        })
        .collect();

    let numbers: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let distinct: HashSet<u64> = numbers.iter().copied().collect();
    assert_eq!(distinct.len(), RACERS);
    assert!(numbers.iter().all(|n| (1..=RACERS as u64).contains(n)));
}

#[test]
fn stale_markers_are_not_reclaimed() {
    let tmp = tempfile::tempdir().unwrap();

    // Instance 1 "crashes": its running marker stays on disk.
    let _crashed = bootstrap("job", tmp.path());

    let next = bootstrap("job", tmp.path());
    assert_eq!(next.instance_number(), 2);
    assert!(tmp.path().join("job/instances/job_1.running").exists());
}

#[test]
fn differently_named_kernels_share_a_root_without_contention() {
    let tmp = tempfile::tempdir().unwrap();

    let a = bootstrap("alpha", tmp.path());
    let b = bootstrap("beta", tmp.path());

    assert_eq!(a.instance_number(), 1);
    assert_eq!(b.instance_number(), 1);
    assert!(tmp.path().join("alpha/instances/alpha_1.running").exists());
    assert!(tmp.path().join("beta/instances/beta_1.running").exists());
}
