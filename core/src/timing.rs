use std::time::Duration;

use crate::constants::STEPPED_CYCLES_PER_TIMER_TICK;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
}

/// # Timing
/// Decides when instruction cycles run and when the timers tick.
///
/// While running, real time is accumulated until a full `period` has passed; at that
/// point a batch of `frequency` cycles is due, followed by a single timer decrement.
/// While paused nothing is due on its own, and manually stepped cycles tick the
/// timers once every `STEPPED_CYCLES_PER_TIMER_TICK` steps.
#[derive(Clone, Debug)]
pub struct Timing {
    run_state: RunState,
    frequency: u32,
    period: Duration,
    accumulated: Duration,
    stepped: u64,
}

impl Timing {
    pub fn new(frequency: u32, period: Duration, run_state: RunState) -> Self {
        Timing {
            run_state,
            frequency,
            period,
            accumulated: Duration::from_secs(0),
            stepped: 0,
        }
    }

    /// Feeds `elapsed` real time to the controller.
    /// Returns the number of cycles to run when a tick is due.
    pub fn advance(&mut self, elapsed: Duration) -> Option<u32> {
        if self.is_paused() {
            return None;
        }
        self.accumulated += elapsed;
        if self.accumulated < self.period {
            return None;
        }
        self.accumulated = Duration::from_secs(0);
        Some(self.frequency)
    }

    /// Counts one manually stepped cycle; true when the timers are due beforehand.
    pub fn step_ticks_timers(&mut self) -> bool {
        let due = self.stepped % STEPPED_CYCLES_PER_TIMER_TICK == 0;
        self.stepped = self.stepped.wrapping_add(1);
        due
    }

    pub fn toggle_pause(&mut self) -> RunState {
        self.run_state = match self.run_state {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
        };
        self.run_state
    }

    pub fn is_paused(&self) -> bool {
        self.run_state == RunState::Paused
    }

    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    pub fn set_frequency(&mut self, frequency: u32) {
        self.frequency = frequency;
    }
}
