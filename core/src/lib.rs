pub use chip8::Chip8;
pub use error::{Fault, LoadError};
pub use instruction::Instruction;

mod chip8;
pub mod constants;
mod error;
mod execute;
mod instruction;
pub mod state;
