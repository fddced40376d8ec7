// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end process lifecycle and cleanup isolation

use crate::prelude::bootstrap;
use warren_core::ProcessStatus;

#[test]
fn full_lifecycle_leaves_only_terminal_files() {
    let tmp = tempfile::tempdir().unwrap();
    let mut coord = bootstrap("job", tmp.path());

    coord.track_process("segmentation").unwrap();
    assert!(coord.create_process_file("segmentation", "tile_01").unwrap());
    assert!(coord.create_process_file("segmentation", "tile_02").unwrap());

    coord
        .update_process_file("segmentation", "tile_01", ProcessStatus::Finished)
        .unwrap();
    coord
        .set_process_status("segmentation", ProcessStatus::Finished)
        .unwrap();
    coord.mark_finished().unwrap();
    coord.cleanup();

    let dir = tmp.path().join("job/p0_segmentation");
    assert!(dir.join("tile_01.fin").exists());
    // tile_02 followed the process-level transition before cleanup ran.
    assert!(dir.join("tile_02.fin").exists());
    assert!(!dir.join("tile_01.tmp").exists());
    assert!(!dir.join("tile_02.tmp").exists());
    assert!(tmp
        .path()
        .join("job/instances/job_1.finished")
        .exists());
}

#[test]
fn cleanup_does_not_touch_other_instances() {
    let tmp = tempfile::tempdir().unwrap();

    let mut one = bootstrap("job", tmp.path());
    let mut two = bootstrap("job", tmp.path());

    one.track_process("reduce").unwrap();
    one.create_process_file("reduce", "own_chunk").unwrap();

    two.track_process("reduce").unwrap();
    two.create_process_file("reduce", "other_chunk").unwrap();

    one.cleanup();

    let root = tmp.path().join("job");
    // Instance 1's transient artifacts are gone.
    assert!(!root.join("p0_reduce/own_chunk.tmp").exists());
    assert!(!root.join("instances/job_1.running").exists());
    // Instance 2's are untouched.
    assert!(root.join("p0_reduce/other_chunk.tmp").exists());
    assert!(root.join("instances/job_2.running").exists());
}

#[test]
fn losing_a_file_race_is_visible_to_the_loser() {
    let tmp = tempfile::tempdir().unwrap();

    let mut one = bootstrap("job", tmp.path());
    let mut two = bootstrap("job", tmp.path());

    // Both instances work the same logical chunk inside the same shared
    // process directory; only one may create its marker file.
    one.track_process("reduce").unwrap();
    two.track_process("reduce").unwrap();

    assert!(one.create_process_file("reduce", "chunk_9").unwrap());
    assert!(!two.create_process_file("reduce", "chunk_9").unwrap());
}

#[test]
fn advanced_lifecycle_blocks_recreation_across_instances() {
    let tmp = tempfile::tempdir().unwrap();

    let mut one = bootstrap("job", tmp.path());
    one.track_process("reduce").unwrap();
    one.create_process_file("reduce", "chunk_9").unwrap();
    one.update_process_file("reduce", "chunk_9", ProcessStatus::Finished)
        .unwrap();

    // A later instance cannot resurrect the finished chunk.
    let mut two = bootstrap("job", tmp.path());
    two.track_process("reduce").unwrap();
    assert!(!two.create_process_file("reduce", "chunk_9").unwrap());
}

#[test]
fn status_report_reflects_the_run() {
    let tmp = tempfile::tempdir().unwrap();
    let mut coord = bootstrap("job", tmp.path());
    coord.track_process("map").unwrap();
    coord.track_process("reduce").unwrap();
    coord
        .set_process_status("map", ProcessStatus::Failed)
        .unwrap();

    let report = coord.status();
    assert_eq!(report.instance, 1);
    assert_eq!(report.processes.get("map"), Some(&ProcessStatus::Failed));
    assert_eq!(
        report.processes.get("reduce"),
        Some(&ProcessStatus::Running)
    );

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["name"], "job");
    assert_eq!(json["processes"]["map"], "failed");
}
