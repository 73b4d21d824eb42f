// @file: market_adapter/src/utils/clock.rs
// @description: Wall clock and a manually advanced clock for deterministic tests.
// @author: LAS.

use crate::core::interfaces::Clock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub const NANOS_PER_MILLI: u64 = 1_000_000;

pub fn millis_to_nanos(millis: u64) -> u64 {
    millis.saturating_mul(NANOS_PER_MILLI)
}

//
// LIVE CLOCK
//

#[derive(Debug, Default, Clone, Copy)]
pub struct LiveClock;

impl Clock for LiveClock {
    fn timestamp_ms(&self) -> u64 {
        self.timestamp_ns() / NANOS_PER_MILLI
    }

    fn timestamp_ns(&self) -> u64 {
        // A clock set before 1970 reads as the epoch
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }
}

//
// TEST CLOCK
//

#[derive(Debug, Default)]
pub struct TestClock {
    now_ns: AtomicU64,
}

impl TestClock {
    pub fn new(now_ns: u64) -> Self {
        Self { now_ns: AtomicU64::new(now_ns) }
    }

    pub fn advance_ms(&self, millis: u64) {
        self.now_ns.fetch_add(millis_to_nanos(millis), Ordering::SeqCst);
    }
}

impl Clock for TestClock {
    fn timestamp_ms(&self) -> u64 {
        self.timestamp_ns() / NANOS_PER_MILLI
    }

    fn timestamp_ns(&self) -> u64 {
        self.now_ns.load(Ordering::SeqCst)
    }
}
