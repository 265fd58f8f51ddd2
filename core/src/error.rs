use thiserror::Error;

/// Failure to place a program image into memory.
///
/// Recoverable: the machine is unchanged and the caller may report and retry
/// with a different image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The image would extend past the end of addressable memory.
    #[error("program is {len} bytes but only {capacity} fit above the reserved region")]
    ProgramTooLarge { len: usize, capacity: usize },
}

/// Fatal execution faults.
///
/// These indicate a malformed program (or an interpreter bug) and halt the
/// run loop; they are never silently wrapped away. Unknown opcodes are *not*
/// faults: they are logged and skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Fault {
    /// A call was made with the 16-entry stack already full.
    #[error("call stack overflow at {pc:#05X}")]
    StackOverflow { pc: u16 },

    /// A return was executed with an empty stack.
    #[error("return with empty call stack at {pc:#05X}")]
    StackUnderflow { pc: u16 },

    /// A fetch or indirect access reached past address 0xFFF.
    #[error("memory access out of bounds at {addr:#05X}")]
    OutOfBounds { addr: u16 },
}
