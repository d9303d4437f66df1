use std::time::Duration;

/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 4096;

/// Address at which programs are loaded and execution starts
pub const PROGRAM_START: u16 = 0x200;

/// The largest program that fits between `PROGRAM_START` and the end of memory
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Return addresses the call stack can hold
pub const STACK_SIZE: usize = 16;

/// Keys on the hexadecimal keypad
pub const KEY_COUNT: usize = 16;

/// Bytes per font glyph
pub const GLYPH_SIZE: u16 = 5;

/// Instruction cycles executed per timer tick unless configured otherwise
pub const DEFAULT_INSTRUCTION_FREQUENCY: u32 = 16;

/// How often the timing controller ticks while running
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_nanos(1_000_000_000 / 120);

/// Entries kept by the diagnostic trace before the oldest are evicted
pub const DEFAULT_TRACE_CAPACITY: usize = 100;

/// While paused the timers are decremented once every this many stepped cycles
pub const STEPPED_CYCLES_PER_TIMER_TICK: u64 = 60;

/// # Sprite sheet
/// Glyphs for the hexadecimal digits 0..F, 5 bytes each, stored at 0x000..0x050.
///
/// Each byte is one row of a 4 pixel wide glyph; only the high nibble is drawn.
/// ```text
/// 0xF0  ####
/// 0x90  #  #
/// 0x90  #  #
/// 0x90  #  #
/// 0xF0  ####
/// ```
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
