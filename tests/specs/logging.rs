// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bootstrap wired to the production logging sink

use warren_core::{Coordinator, CoordinatorConfig, ProcessStatus, SystemClock};
use warren_adapters::TracingLogSink;

#[test]
fn kernel_runs_against_the_tracing_sink() {
    let tmp = tempfile::tempdir().unwrap();

    let mut coord = Coordinator::bootstrap(
        CoordinatorConfig::new("job", tmp.path()),
        SystemClock,
        TracingLogSink::new(),
    )
    .unwrap();

    coord.track_process("map").unwrap();
    coord.create_process_file("map", "chunk").unwrap();
    coord
        .set_process_status("map", ProcessStatus::Finished)
        .unwrap();
    coord.cleanup();

    // The log file is registered and claimed like any other tracked file.
    assert!(tmp.path().join("job/logs/job_1.log").exists());
}

#[test]
fn two_kernels_each_get_their_own_log_file() {
    let tmp = tempfile::tempdir().unwrap();

    let mut one = Coordinator::bootstrap(
        CoordinatorConfig::new("job", tmp.path()),
        SystemClock,
        TracingLogSink::new(),
    )
    .unwrap();
    let two = Coordinator::bootstrap(
        CoordinatorConfig::new("job", tmp.path()),
        SystemClock,
        TracingLogSink::new(),
    )
    .unwrap();

    assert!(tmp.path().join("job/logs/job_1.log").exists());
    assert!(tmp.path().join("job/logs/job_2.log").exists());

    one.cleanup();
    assert_eq!(two.instance_number(), 2);
}
