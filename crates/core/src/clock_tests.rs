// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;

#[test]
fn fake_clock_advances_on_demand() {
    let clock = FakeClock::new();
    let start = clock.now();
    clock.advance(Duration::from_secs(5));
    assert_eq!(clock.now().duration_since(start), Duration::from_secs(5));
}

#[test]
fn system_clock_moves_forward() {
    let clock = SystemClock;
    let a = clock.now();
    let b = clock.now();
    assert!(b >= a);
}
