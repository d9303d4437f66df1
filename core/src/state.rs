use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, KEY_COUNT, MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET,
    STACK_SIZE,
};

/// The FrameBuffer is a flat array of 0/1 pixels indexed as `y * DISPLAY_WIDTH + x`
pub type FrameBuffer = [u8; DISPLAY_WIDTH * DISPLAY_HEIGHT];

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) doubles as the carry/borrow/collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) the number of return addresses on the stack, 0..=16
///
/// Timers
/// - 2 8-bit timers (delay & sound) counting down towards 0
/// - a tone is audible for as long as the sound timer is above 0
///
/// ## Memory
/// - 16 slot stack of return addresses
/// - 4096 bytes of addressable memory, the first 80 of which hold the sprite sheet
/// - 64x32 frame buffer
///
/// ## Input
/// - the pressed status of keys 0..F, sampled once per cycle
/// - the lowest pressed key in that sample, if any
#[derive(Copy, Clone)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_SIZE],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub keys: [bool; KEY_COUNT],
    pub last_key: Option<u8>,
    /// The most recently fetched opcode
    pub opcode: u16,
}

impl State {
    pub fn new() -> Self {
        // 0x000 - 0x050 is reserved for the sprite sheet
        let mut memory = [0; MEMORY_SIZE];
        memory[0..SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            memory,
            frame_buffer: [0; DISPLAY_WIDTH * DISPLAY_HEIGHT],
            keys: [false; KEY_COUNT],
            last_key: None,
            opcode: 0,
        }
    }

    /// Reads the byte at `addr`; addresses outside of memory read as 0.
    pub fn read(&self, addr: usize) -> u8 {
        self.memory.get(addr).copied().unwrap_or(0)
    }

    /// The pixel at column `x` of row `y`.
    #[cfg(test)]
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.frame_buffer[y * DISPLAY_WIDTH + x]
    }

    /// The return addresses currently on the stack, oldest first.
    pub fn call_stack(&self) -> &[u16] {
        &self.stack[..self.sp as usize]
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
