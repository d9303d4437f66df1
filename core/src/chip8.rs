use std::io::Read;
use std::time::Duration;

use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::constants::{KEY_COUNT, MAX_PROGRAM_SIZE, PROGRAM_START};
use crate::error::LoadError;
use crate::host::{Command, Keypad};
use crate::instruction::execute;
use crate::state::{FrameBuffer, State};
use crate::timing::{RunState, Timing};
use crate::trace::TraceLog;

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - the random number generator backing `RND`
///  - a bounded `trace` of recently executed instructions
///  - `timing` for deciding when cycles run and timers tick
///
/// Supplies interfaces for:
/// - resetting and loading programs
/// - running cycles in real time or stepping through them while paused
/// - applying host `Command`s
/// - inspecting its frame buffer, sound status and state for rendering by some host
pub struct Chip8 {
    state: State,
    rng: StdRng,
    trace: TraceLog,
    timing: Timing,
    config: Config,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let run_state = if config.start_paused {
            RunState::Paused
        } else {
            RunState::Running
        };
        Chip8 {
            state: State::new(),
            rng: seed(config.seed),
            trace: TraceLog::new(config.trace_capacity),
            timing: Timing::new(config.instruction_frequency, config.tick_period, run_state),
            config,
        }
    }

    /// Reinitializes memory, registers, stack, timers and the frame buffer and reseeds the
    /// random number generator. Run state and instruction frequency are left alone.
    pub fn reset(&mut self) {
        self.state = State::new();
        self.rng = seed(self.config.seed);
        self.trace.clear();
        debug!("reset");
    }

    /// Reset, then copy `program` into memory at `PROGRAM_START`
    ///
    /// A program that doesn't fit leaves the interpreter at a clean reset.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), LoadError> {
        self.reset();
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(LoadError::TooLarge {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.state.memory[start..start + program.len()].copy_from_slice(program);
        info!("loaded {} byte program", program.len());
        Ok(())
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `reader` a file reader that contains a ROM
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<(), LoadError> {
        let mut program = Vec::new();
        if let Err(err) = reader.read_to_end(&mut program) {
            self.reset();
            return Err(err.into());
        }
        self.load_program(&program)
    }

    /// Snapshot the keypad for this cycle, remembering the lowest pressed key
    pub fn sample_input<K: Keypad + ?Sized>(&mut self, keypad: &K) {
        let mut keys = [false; KEY_COUNT];
        for (key, pressed) in keys.iter_mut().enumerate() {
            *pressed = keypad.is_pressed(key as u8);
        }
        self.state.keys = keys;
        self.state.last_key = keys.iter().position(|pressed| *pressed).map(|key| key as u8);
    }

    /// Runs a single fetch/decode/execute cycle
    pub fn cycle<K: Keypad + ?Sized>(&mut self, keypad: &K) {
        self.sample_input(keypad);
        let pc = self.state.pc;
        let op = self.fetch();
        self.state.opcode = op;

        let (state, entry) = execute(op, &self.state, &mut self.rng);
        self.state = state;

        trace!("{:#05X}: {}", pc, entry);
        if let Some(fault) = entry.fault {
            warn!("{} at {:#05X}", fault, pc);
        }
        self.trace.push(entry);
    }

    /// Opcodes are 16 bits but memory is stored as bytes, so two subsequent bytes are
    /// combined. Bytes past the end of memory read as 0.
    fn fetch(&self) -> u16 {
        let pc = self.state.pc as usize;
        let left = u16::from(self.state.read(pc));
        let right = u16::from(self.state.read(pc + 1));
        left << 8 | right
    }

    /// Feeds real time to the timing controller and runs a batch of cycles followed by a
    /// timer tick when one is due. Returns whether a batch ran.
    pub fn update<K: Keypad + ?Sized>(&mut self, elapsed: Duration, keypad: &K) -> bool {
        match self.timing.advance(elapsed) {
            Some(cycles) => {
                for _ in 0..cycles {
                    self.cycle(keypad);
                }
                self.decrement_timers();
                true
            }
            None => false,
        }
    }

    /// Runs `count` cycles while paused, ticking the timers every 60th stepped cycle.
    /// Does nothing while running. Returns the number of cycles run.
    pub fn step<K: Keypad + ?Sized>(&mut self, count: u32, keypad: &K) -> u32 {
        if !self.timing.is_paused() {
            debug!("ignoring step of {} while running", count);
            return 0;
        }
        for _ in 0..count {
            if self.timing.step_ticks_timers() {
                self.decrement_timers();
            }
            self.cycle(keypad);
        }
        count
    }

    fn decrement_timers(&mut self) {
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
    }

    pub fn toggle_pause(&mut self) {
        match self.timing.toggle_pause() {
            RunState::Paused => info!("paused"),
            RunState::Running => info!("resumed"),
        }
    }

    pub fn set_instruction_frequency(&mut self, frequency: u32) {
        self.timing.set_frequency(frequency);
        info!("instruction frequency set to {}", frequency);
    }

    /// Applies a host command. Returns false once the host asks to quit.
    pub fn apply<K: Keypad + ?Sized>(&mut self, command: Command, keypad: &K) -> bool {
        match command {
            Command::TogglePause => self.toggle_pause(),
            Command::Step(count) => {
                self.step(count, keypad);
            }
            Command::SetFrequency(frequency) => self.set_instruction_frequency(frequency),
            Command::Load(program) => {
                if let Err(err) = self.load_program(&program) {
                    warn!("{}", err);
                }
            }
            Command::Reset => self.reset(),
            Command::DumpTrace => {
                for entry in self.trace.iter() {
                    info!("{}", entry);
                }
                info!("call stack: {:03X?}", self.state.call_stack());
            }
            Command::Quit => return false,
        }
        true
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// A tone should be audible while the sound timer is running
    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn trace(&self) -> &TraceLog {
        &self.trace
    }

    pub fn is_paused(&self) -> bool {
        self.timing.is_paused()
    }

    pub fn instruction_frequency(&self) -> u32 {
        self.timing.frequency()
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

fn seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
