use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use chip8_core::constants::{DEFAULT_INSTRUCTION_FREQUENCY, DEFAULT_TRACE_CAPACITY};
use chip8_core::Config;

mod keymap;
mod run;

/// A Chip-8 interpreter
///
/// Space pauses, N steps while paused, Up/Down change the instruction frequency,
/// Backspace resets, F5 reloads the ROM, L dumps the trace and Escape quits.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    /// Instruction cycles per timer tick
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_INSTRUCTION_FREQUENCY,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    frequency: u32,

    /// Size multiplier for each pixel
    #[arg(short, long, default_value_t = 10)]
    scale: u32,

    /// Cycles run by each step while paused
    #[arg(long, default_value_t = 1)]
    step_count: u32,

    /// Executed instructions kept for dumping
    #[arg(long, default_value_t = DEFAULT_TRACE_CAPACITY)]
    trace_capacity: usize,

    /// Fixed seed for the random number generator
    #[arg(long)]
    seed: Option<u64>,

    /// Start paused
    #[arg(short, long)]
    paused: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = Config {
        instruction_frequency: args.frequency,
        trace_capacity: args.trace_capacity,
        seed: args.seed,
        start_paused: args.paused,
        ..Config::default()
    };
    run::run(args.rom, config, args.scale, args.step_count)
}
