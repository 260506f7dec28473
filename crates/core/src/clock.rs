// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time

/// Milliseconds in one day, used for daily recurrence.
pub const DAY_MS: u64 = 24 * 60 * 60 * 1000;

/// Source of wall-clock time, injectable for tests.
pub trait Clock: Clone + Send + Sync + 'static {
    /// Current time as milliseconds since the Unix epoch.
    fn epoch_ms(&self) -> u64;
}

/// Production clock backed by the system time.
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn epoch_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Manually advanced clock for tests.
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone, Default)]
pub struct FakeClock {
    ms: std::sync::Arc<std::sync::atomic::AtomicU64>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(epoch_ms: u64) -> Self {
        let clock = Self::default();
        clock.set(epoch_ms);
        clock
    }

    pub fn set(&self, epoch_ms: u64) {
        self.ms
            .store(epoch_ms, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn advance_ms(&self, delta: u64) {
        self.ms
            .fetch_add(delta, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Clock for FakeClock {
    fn epoch_ms(&self) -> u64 {
        self.ms.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
