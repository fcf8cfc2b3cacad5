//! Time management utilities
//!
//! Scene time is driven by an external tick rather than the wall clock, so a
//! run replays identically for a given tick length.

/// Tick-driven clock accumulating elapsed scene time
///
/// While paused, ticks are still counted but no scene time elapses.
#[derive(Debug, Clone)]
pub struct FrameClock {
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
    paused: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a new running clock at zero
    pub fn new() -> Self {
        Self {
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
            paused: false,
        }
    }

    /// Advance the clock by one tick of `raw_delta` seconds
    ///
    /// Returns the scaled delta that elapsed in scene time.
    pub fn tick(&mut self, raw_delta: f32) -> f32 {
        self.delta_time = if self.paused { 0.0 } else { raw_delta.max(0.0) };
        self.total_time += self.delta_time;
        self.frame_count += 1;
        self.delta_time
    }

    /// Scaled time of the last tick in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Scene time elapsed since the clock was created
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of ticks seen, paused ones included
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Whether scene time is frozen
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Freeze or resume scene time
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
}
