//! Fixed-step tick driver
//!
//! Converts real elapsed time into 100 ms controller ticks, the way a game loop
//! runs a fixed simulation step from variable frame times.

use crate::consts::TICK_INTERVAL_MS;
use crate::persistence::KeyValueStore;
use crate::quiz::RoundController;

/// Tick period in seconds
pub const TICK_DT: f64 = TICK_INTERVAL_MS as f64 / 1000.0;

/// Maximum ticks run per update, so a long stall cannot flood the controller
pub const MAX_TICKS_PER_UPDATE: u32 = 20;

/// Accumulates frame time and emits whole ticks
#[derive(Debug, Clone, Default)]
pub struct TickDriver {
    accumulator: f64,
}

impl TickDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed `dt` seconds of real time; returns how many ticks are due
    pub fn advance(&mut self, dt: f64) -> u32 {
        if !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        self.accumulator += dt;

        let mut ticks = 0;
        while self.accumulator + 1e-9 >= TICK_DT && ticks < MAX_TICKS_PER_UPDATE {
            self.accumulator -= TICK_DT;
            ticks += 1;
        }
        // Drop time we refused to simulate
        if ticks == MAX_TICKS_PER_UPDATE {
            self.accumulator = self.accumulator.min(TICK_DT);
        }
        ticks
    }

    /// Advance the controller by however many ticks `dt` covers, then write
    /// any storage changes queued by earlier inputs
    pub fn update<S: KeyValueStore>(&mut self, controller: &mut RoundController<S>, dt: f64) -> u32 {
        let ticks = self.advance(dt);
        for _ in 0..ticks {
            controller.tick();
        }
        controller.flush();
        ticks
    }

    /// Time carried over towards the next tick
    pub fn pending(&self) -> f64 {
        self.accumulator
    }
}
