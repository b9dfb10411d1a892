//! Fixed-interval frame gate
//!
//! The host calls `tick` once per presented frame. An update is due only
//! when strictly more than `frame_time` has passed since the last one.
//! Skipped frames are not made up for.

use crate::error::{Result, SimError};

/// Default target update frequency (Hz)
pub const DEFAULT_FPS: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    /// Timestamp (ms) of the last update
    then: f64,
    /// Minimum ms between updates
    frame_time: f64,
}

impl FrameClock {
    pub fn new(fps: f64, now: f64) -> Result<Self> {
        if !(fps.is_finite() && fps > 0.0) {
            return Err(SimError::InvalidFrameRate(fps));
        }
        Ok(Self {
            then: now,
            frame_time: 1000.0 / fps,
        })
    }

    pub fn then(&self) -> f64 {
        self.then
    }

    pub fn frame_time(&self) -> f64 {
        self.frame_time
    }

    /// Returns true and moves `then` to `now` if an update is due
    pub fn tick(&mut self, now: f64) -> bool {
        if now - self.then > self.frame_time {
            self.then = now;
            true
        } else {
            false
        }
    }
}
