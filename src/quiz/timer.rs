//! Play-time counter driven by an external 100 ms tick source

use crate::consts::TICK_SECONDS;

/// Accumulates play time in fixed quanta while running.
///
/// Time is counted in whole ticks so it never drifts from the tick count,
/// even if the ticks themselves arrive late.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayTimer {
    running: bool,
    ticks: u32,
}

impl PlayTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset and start counting
    pub fn start(&mut self) {
        if self.running {
            log::warn!("Play timer already running, ignoring start");
            return;
        }
        self.ticks = 0;
        self.running = true;
    }

    /// Stop counting; accumulated time is kept
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advance one tick. Returns false if the timer was not running.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.ticks += 1;
        true
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Accumulated play time in seconds
    pub fn elapsed_seconds(&self) -> f64 {
        self.ticks as f64 * TICK_SECONDS
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
