//! Fixed-timestep tick clock using an accumulator pattern.
//!
//! The host calls `update` once per animation frame with a variable delta.
//! `GameTime` turns that into a whole number of fixed ticks, so the
//! economy advances identically no matter how frames are spaced.

/// Largest frame delta honoured; a backgrounded tab resumes without a burst.
pub const MAX_FRAME_DELTA_MS: f64 = 500.0;

#[derive(Clone, Debug)]
pub struct GameTime {
    /// Milliseconds per tick (50ms at 20 Hz).
    ms_per_tick: f64,
    /// Accumulated milliseconds not yet consumed as ticks
    accumulator: f64,
    /// Total elapsed ticks since creation
    pub total_ticks: u64,
    /// Timestamp of the last update (ms), None before the first frame
    last_timestamp: Option<f64>,
}

impl GameTime {
    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_sec.max(1) as f64,
            accumulator: 0.0,
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    /// Feed a wall-clock timestamp and get the number of ticks to run.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_FRAME_DELTA_MS),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick) as u32;
        self.accumulator -= ticks as f64 * self.ms_per_tick;
        self.total_ticks += ticks as u64;
        ticks
    }

    /// Forget the last timestamp, e.g. after the host was suspended.
    pub fn reset(&mut self) {
        self.last_timestamp = None;
        self.accumulator = 0.0;
    }
}
