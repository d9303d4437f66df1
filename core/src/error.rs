use thiserror::Error;

/// Failure to load a program; the interpreter is left at a clean reset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to read program: {0}")]
    Io(#[from] std::io::Error),

    #[error("program is too large ({size} bytes), at most {max} bytes fit in memory")]
    TooLarge { size: usize, max: usize },
}

/// Anomalies raised while executing a single instruction.
///
/// None of these stop the interpreter; they are attached to the trace entry of the
/// offending instruction and logged.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum Fault {
    #[error("stack underflow, SP = {sp}")]
    StackUnderflow { sp: u8 },

    #[error("stack overflow, SP = {sp}")]
    StackOverflow { sp: u8 },

    #[error("unknown opcode {0:#06X}")]
    UnknownOpcode(u16),
}
