use std::time::Duration;

use crate::constants::{
    DEFAULT_INSTRUCTION_FREQUENCY, DEFAULT_TICK_PERIOD, DEFAULT_TRACE_CAPACITY,
};

/// Knobs for a `Chip8` instance
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Instruction cycles run per tick
    pub instruction_frequency: u32,
    /// Real time between ticks
    pub tick_period: Duration,
    /// Entries kept in the trace ring
    pub trace_capacity: usize,
    /// Fixed seed for the random number generator; seeded from OS entropy on every reset if unset
    pub seed: Option<u64>,
    pub start_paused: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            instruction_frequency: DEFAULT_INSTRUCTION_FREQUENCY,
            tick_period: DEFAULT_TICK_PERIOD,
            trace_capacity: DEFAULT_TRACE_CAPACITY,
            seed: None,
            start_paused: false,
        }
    }
}
