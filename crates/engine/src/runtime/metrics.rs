//! Lock-free loop counters.
//!
//! Both loops update these with relaxed atomics: no locks, no allocations,
//! nothing that could stretch the shared-state critical section. Readers
//! take a [`MetricsSnapshot`] at their own pace.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering::Relaxed};
use std::time::{Duration, Instant};

/// Atomic loop counters.
pub struct LoopMetrics {
    // Monotonic counters
    ticks_executed: AtomicU64,
    frames_presented: AtomicU64,
    tick_ns_sum: AtomicU64,
    /// Time the presentation thread spent waiting for the scene guard.
    guard_wait_ns_sum: AtomicU64,
    guard_wait_ns_max: AtomicU64,

    // Frame time histogram
    hist_under_4ms: AtomicU64,
    hist_4_8ms: AtomicU64,
    hist_8_17ms: AtomicU64,
    hist_17_33ms: AtomicU64,
    hist_over_33ms: AtomicU64,

    started_at: Instant,
}

impl LoopMetrics {
    pub fn new() -> Self {
        Self {
            ticks_executed: AtomicU64::new(0),
            frames_presented: AtomicU64::new(0),
            tick_ns_sum: AtomicU64::new(0),
            guard_wait_ns_sum: AtomicU64::new(0),
            guard_wait_ns_max: AtomicU64::new(0),
            hist_under_4ms: AtomicU64::new(0),
            hist_4_8ms: AtomicU64::new(0),
            hist_8_17ms: AtomicU64::new(0),
            hist_17_33ms: AtomicU64::new(0),
            hist_over_33ms: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    /// Called by the simulation thread after each tick.
    pub fn record_tick(&self, duration: Duration) {
        self.ticks_executed.fetch_add(1, Relaxed);
        self.tick_ns_sum.fetch_add(duration.as_nanos() as u64, Relaxed);
    }

    /// Called by the presentation thread once it has the guard.
    pub fn record_guard_wait(&self, wait: Duration) {
        let ns = wait.as_nanos() as u64;
        self.guard_wait_ns_sum.fetch_add(ns, Relaxed);
        self.guard_wait_ns_max.fetch_max(ns, Relaxed);
    }

    /// Called by the presentation thread after each presented frame.
    pub fn record_frame(&self, frame_time: Duration) {
        self.frames_presented.fetch_add(1, Relaxed);

        let ms = frame_time.as_millis() as u64;
        match ms {
            0..=3 => {
                self.hist_under_4ms.fetch_add(1, Relaxed);
            }
            4..=7 => {
                self.hist_4_8ms.fetch_add(1, Relaxed);
            }
            8..=16 => {
                self.hist_8_17ms.fetch_add(1, Relaxed);
            }
            17..=32 => {
                self.hist_17_33ms.fetch_add(1, Relaxed);
            }
            _ => {
                self.hist_over_33ms.fetch_add(1, Relaxed);
            }
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks_executed.load(Relaxed)
    }

    pub fn frames(&self) -> u64 {
        self.frames_presented.load(Relaxed)
    }

    /// Read all counters into a serializable snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime_secs: self.started_at.elapsed().as_secs_f64(),
            ticks_total: self.ticks_executed.load(Relaxed),
            frames_total: self.frames_presented.load(Relaxed),
            tick_ns_sum: self.tick_ns_sum.load(Relaxed),
            guard_wait_ns_sum: self.guard_wait_ns_sum.load(Relaxed),
            guard_wait_ns_max: self.guard_wait_ns_max.load(Relaxed),
            frame_hist: [
                self.hist_under_4ms.load(Relaxed),
                self.hist_4_8ms.load(Relaxed),
                self.hist_8_17ms.load(Relaxed),
                self.hist_17_33ms.load(Relaxed),
                self.hist_over_33ms.load(Relaxed),
            ],
        }
    }
}

impl Default for LoopMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable snapshot of all counters at a point in time.
#[derive(Clone, Debug, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: f64,
    pub ticks_total: u64,
    pub frames_total: u64,
    pub tick_ns_sum: u64,
    pub guard_wait_ns_sum: u64,
    pub guard_wait_ns_max: u64,
    /// `[<4ms, 4-8ms, 8-17ms, 17-33ms, >33ms]`
    pub frame_hist: [u64; 5],
}

impl MetricsSnapshot {
    /// Average ticks per second over the uptime.
    pub fn tick_rate(&self) -> f64 {
        if self.uptime_secs > 0.0 {
            self.ticks_total as f64 / self.uptime_secs
        } else {
            0.0
        }
    }

    /// Average presented frames per second over the uptime.
    pub fn frame_rate(&self) -> f64 {
        if self.uptime_secs > 0.0 {
            self.frames_total as f64 / self.uptime_secs
        } else {
            0.0
        }
    }
}
