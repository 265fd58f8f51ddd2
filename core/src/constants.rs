//! Memory map, display geometry, and timing constants.

/// Total addressable memory in bytes.
pub const MEMORY_SIZE: usize = 4096;

/// Address at which loaded programs begin; everything below is reserved
/// for the interpreter and the font set.
pub const PROGRAM_START: usize = 0x200;

/// Largest program that fits between [`PROGRAM_START`] and the end of memory.
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START;

/// Address the font set is copied to on reset.
pub const FONT_START: usize = 0x50;

/// Bytes per font glyph; glyphs are 8x5 pixels, one byte per row.
pub const FONT_GLYPH_SIZE: usize = 5;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Maximum call depth before a push faults.
pub const STACK_DEPTH: usize = 16;

/// Keys on the hexadecimal keypad.
pub const KEY_COUNT: usize = 16;

/// Rate at which the delay and sound timers count down.
pub const TIMER_HZ: u32 = 60;

/// CPU steps executed per timer tick. Timers run at a fixed 60Hz no matter
/// how this is tuned; 9 steps per tick approximates the ~540Hz clock most
/// CHIP-8 programs were written against.
pub const STEPS_PER_TICK: u32 = 9;

/// Sprite data for the hexadecimal digits 0-F, five bytes per glyph.
///
/// Copied to [`FONT_START`] on reset; `FX29` resolves glyph addresses
/// relative to that base.
pub const FONT_SET: [u8; 80] = [
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
