//! What the interpreter needs from whatever is hosting it.

use std::fmt::Debug;
use std::time::Duration;

use crate::constants::KEY_COUNT;
use crate::state::FrameBuffer;

/// Pressed status of the 16 hexadecimal keys
pub trait Keypad {
    fn is_pressed(&self, key: u8) -> bool;
}

impl Keypad for [bool; KEY_COUNT] {
    fn is_pressed(&self, key: u8) -> bool {
        self.get(key as usize).copied().unwrap_or(false)
    }
}

/// Control requests a host may issue between cycles
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    /// Run this many cycles; only honoured while paused
    Step(u32),
    SetFrequency(u32),
    /// Reset and load these program bytes
    Load(Vec<u8>),
    Reset,
    /// Write the trace ring to the log
    DumpTrace,
    Quit,
}

/// A display, audio sink, clock and input source rolled into one
pub trait Host: Keypad {
    type Error: Debug;

    /// Collects the commands issued since the last poll
    fn poll(&mut self) -> Result<Vec<Command>, Self::Error>;

    /// Real time passed since the previous call
    fn elapsed(&mut self) -> Duration;

    fn render(&mut self, frame: &FrameBuffer) -> Result<(), Self::Error>;

    /// Whether a tone should be playing; called every frame so it has to be idempotent
    fn set_tone(&mut self, on: bool);

    /// Called once per loop iteration after rendering
    fn idle(&mut self) {}
}
