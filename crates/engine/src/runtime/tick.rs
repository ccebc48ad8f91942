use std::time::Duration;

/// Fixed-timestep accumulator.
///
/// Elapsed wall time is added in whatever slices the host scheduler delivers;
/// every whole period accumulated yields one tick and the remainder carries
/// over. The number of ticks per unit of wall time is therefore independent
/// of how often [`TickAccumulator::advance`] is called.
#[derive(Debug, Clone)]
pub struct TickAccumulator {
    period: Duration,
    accumulated: Duration,
    ticks: u64,
}

impl TickAccumulator {
    /// # Panics
    ///
    /// If `period` is zero.
    pub fn new(period: Duration) -> Self {
        assert!(!period.is_zero(), "tick period must be non-zero");
        Self {
            period,
            accumulated: Duration::ZERO,
            ticks: 0,
        }
    }

    /// Accumulator for `rate` ticks per second.
    ///
    /// # Panics
    ///
    /// If `rate` is zero.
    pub fn from_rate(rate: u32) -> Self {
        assert!(rate > 0, "tick rate must be non-zero");
        Self::new(Duration::from_secs(1) / rate)
    }

    /// Add `elapsed` and return how many ticks are now due. The due ticks are
    /// consumed from the accumulator.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulated += elapsed;
        let mut due = 0;
        while self.accumulated >= self.period {
            self.accumulated -= self.period;
            due += 1;
        }
        self.ticks += u64::from(due);
        due
    }

    /// Time accumulated toward the next tick.
    pub fn remainder(&self) -> Duration {
        self.accumulated
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Total ticks handed out so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
