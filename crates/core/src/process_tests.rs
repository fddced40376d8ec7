// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn track_starts_running_with_ordinal_dir() {
    let mut tracker = ProcessTracker::new();

    let p = tracker.track("segmentation").unwrap();
    assert_eq!(p.dir, "p0_segmentation");
    assert_eq!(p.status, ProcessStatus::Running);
}

#[test]
fn ordinals_advance_with_each_process() {
    let mut tracker = ProcessTracker::new();
    tracker.track("alpha").unwrap();
    tracker.track("beta").unwrap();
    let p = tracker.track("gamma").unwrap();
    assert_eq!(p.dir, "p2_gamma");
}

#[test]
fn duplicate_track_fails() {
    let mut tracker = ProcessTracker::new();
    tracker.track("alpha").unwrap();

    let err = tracker.track("alpha").unwrap_err();
    assert!(matches!(err, TrackError::DuplicateProcess(name) if name == "alpha"));
}

#[test]
fn set_status_to_terminal() {
    let mut tracker = ProcessTracker::new();
    tracker.track("alpha").unwrap();

    let changed = tracker.set_status("alpha", ProcessStatus::Finished).unwrap();
    assert!(changed);
    assert_eq!(tracker.get("alpha").unwrap().status, ProcessStatus::Finished);
}

#[test]
fn resetting_current_status_is_noop() {
    let mut tracker = ProcessTracker::new();
    tracker.track("alpha").unwrap();
    tracker.set_status("alpha", ProcessStatus::Finished).unwrap();

    let changed = tracker.set_status("alpha", ProcessStatus::Finished).unwrap();
    assert!(!changed);
}

#[test]
fn leaving_terminal_status_fails() {
    let mut tracker = ProcessTracker::new();
    tracker.track("alpha").unwrap();
    tracker.set_status("alpha", ProcessStatus::Failed).unwrap();

    let err = tracker
        .set_status("alpha", ProcessStatus::Finished)
        .unwrap_err();
    assert!(matches!(err, TrackError::TerminalStatus { .. }));
}

#[test]
fn set_status_on_untracked_fails() {
    let mut tracker = ProcessTracker::new();
    let err = tracker
        .set_status("ghost", ProcessStatus::Failed)
        .unwrap_err();
    assert!(matches!(err, TrackError::UnknownProcess(name) if name == "ghost"));
}

#[test]
fn invalid_status_string_converts_into_track_error() {
    let err: TrackError = "bogus".parse::<ProcessStatus>().unwrap_err().into();
    assert!(matches!(err, TrackError::InvalidStatus(_)));
}

#[test]
fn iter_and_len_cover_all_tracked() {
    let mut tracker = ProcessTracker::new();
    assert!(tracker.is_empty());

    tracker.track("alpha").unwrap();
    tracker.track("beta").unwrap();
    assert_eq!(tracker.len(), 2);
    assert!(tracker.contains("alpha"));
    assert!(!tracker.contains("gamma"));

    let mut names: Vec<_> = tracker.iter().map(|p| p.name.clone()).collect();
    names.sort();
    assert_eq!(names, vec!["alpha", "beta"]);
}
