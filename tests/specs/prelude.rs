// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for the warren specs

use std::path::Path;
use warren_core::{Coordinator, CoordinatorConfig, NoOpLogSink, SystemClock};

pub fn bootstrap(name: &str, root: &Path) -> Coordinator<SystemClock, NoOpLogSink> {
    Coordinator::bootstrap(CoordinatorConfig::new(name, root), SystemClock, NoOpLogSink)
        .expect("bootstrap")
}
