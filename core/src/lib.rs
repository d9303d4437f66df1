pub use chip8::Chip8;
pub use config::Config;
pub use error::{Fault, LoadError};
pub use host::{Command, Host, Keypad};
pub use runner::run;
pub use state::{FrameBuffer, State};
pub use timing::RunState;
pub use trace::{Trace, TraceLog};

mod chip8;
mod config;
pub mod constants;
mod error;
mod host;
mod instruction;
mod opcode;
mod operations;
mod runner;
pub mod state;
mod timing;
mod trace;
