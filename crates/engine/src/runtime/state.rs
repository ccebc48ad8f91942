use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of a [`Coordinator`](super::Coordinator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Both loops iterate. Entered on construction.
    Running,
    /// Someone asked to stop; the loops exit at their next check.
    StopRequested,
    /// Both loops exited and the simulation thread was joined.
    Stopped,
}

impl RunState {
    const fn to_u8(self) -> u8 {
        match self {
            RunState::Running => 0,
            RunState::StopRequested => 1,
            RunState::Stopped => 2,
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => RunState::Running,
            1 => RunState::StopRequested,
            _ => RunState::Stopped,
        }
    }
}

/// The shared running flag. Written by whichever thread detects a stop
/// condition, polled by both loops.
#[derive(Debug)]
pub(crate) struct RunFlag(AtomicU8);

impl RunFlag {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(RunState::Running.to_u8()))
    }

    pub(crate) fn state(&self) -> RunState {
        RunState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    /// `Running -> StopRequested`. Returns false if a stop was already
    /// requested or completed.
    pub(crate) fn request_stop(&self) -> bool {
        self.0
            .compare_exchange(
                RunState::Running.to_u8(),
                RunState::StopRequested.to_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    pub(crate) fn mark_stopped(&self) {
        self.0.store(RunState::Stopped.to_u8(), Ordering::Release);
    }
}

/// Cloneable, `Send` handle for stopping a running coordinator from any
/// thread. Stopping is cooperative: the loops notice within one frame or one
/// idle sleep.
#[derive(Debug, Clone)]
pub struct StopHandle {
    flag: Arc<RunFlag>,
}

impl StopHandle {
    pub(crate) fn new(flag: Arc<RunFlag>) -> Self {
        Self { flag }
    }

    pub fn request_stop(&self) {
        if self.flag.request_stop() {
            tracing::info!("Stop requested");
        }
    }

    pub fn state(&self) -> RunState {
        self.flag.state()
    }
}
