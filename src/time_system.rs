//! Simulation time.
//!
//! Time only moves when the host advances a frame: every timer in the core
//! (cooldowns, stun, attack pose, death animation) is compared against
//! `GameClock::time`, never against the wall clock.

use crate::constants::MAX_FRAME_DT;

/// Global game time clock (in seconds)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameClock {
    /// Current game time in seconds (simulation time, not real time)
    pub time: f32,
}

impl GameClock {
    pub fn new() -> Self {
        Self { time: 0.0 }
    }

    /// Advance time to the given timestamp
    pub fn advance_to(&mut self, time: f32) {
        debug_assert!(
            time >= self.time,
            "Cannot go backwards in time: {} -> {}",
            self.time,
            time
        );
        self.time = time;
    }

    /// Advance by a frame delta. Returns the delta actually applied.
    pub fn tick(&mut self, dt: f32) -> f32 {
        let dt = clamp_dt(dt);
        self.advance_to(self.time + dt);
        dt
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Clamp a host-supplied frame delta to `[0, MAX_FRAME_DT]`; garbage becomes 0.
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    }
}
