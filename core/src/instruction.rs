//! Instruction words and their decoded form.
//!
//! CHIP-8 instructions are 16 bits. The top nibble selects a category; for
//! the ambiguous categories (0x0, 0x5, 0x8, 0x9, 0xE, 0xF) the low byte or
//! low nibble selects the operation. The remaining nibbles carry operands:
//!
//! - `x` (bits 8-11) and `y` (bits 4-7) name registers Vx and Vy
//! - `n` (bits 0-3) is a 4-bit literal (sprite height)
//! - `nn` (bits 0-7) is an 8-bit literal
//! - `nnn` (bits 0-11) is an address

/// One decoded instruction. Every representable operation has a variant, so
/// execution can match exhaustively; words that decode to no variant are the
/// recoverable "unknown opcode" case.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1nnn
    Jump(u16),
    /// 2nnn
    Call(u16),
    /// 3xnn
    SkipEqImm { x: u8, nn: u8 },
    /// 4xnn
    SkipNeImm { x: u8, nn: u8 },
    /// 5xy0
    SkipEqReg { x: u8, y: u8 },
    /// 6xnn
    LoadImm { x: u8, nn: u8 },
    /// 7xnn
    AddImm { x: u8, nn: u8 },
    /// 8xy0
    Move { x: u8, y: u8 },
    /// 8xy1
    Or { x: u8, y: u8 },
    /// 8xy2
    And { x: u8, y: u8 },
    /// 8xy3
    Xor { x: u8, y: u8 },
    /// 8xy4
    Add { x: u8, y: u8 },
    /// 8xy5
    Sub { x: u8, y: u8 },
    /// 8xy6
    ShiftRight { x: u8 },
    /// 8xy7
    SubFrom { x: u8, y: u8 },
    /// 8xyE
    ShiftLeft { x: u8 },
    /// 9xy0
    SkipNeReg { x: u8, y: u8 },
    /// Annn
    SetIndex(u16),
    /// Bnnn
    JumpOffset(u16),
    /// Cxnn
    Random { x: u8, nn: u8 },
    /// Dxyn
    Draw { x: u8, y: u8, n: u8 },
    /// Ex9E
    SkipKeyPressed { x: u8 },
    /// ExA1
    SkipKeyNotPressed { x: u8 },
    /// Fx07
    ReadDelay { x: u8 },
    /// Fx0A
    WaitKey { x: u8 },
    /// Fx15
    SetDelay { x: u8 },
    /// Fx18
    SetSound { x: u8 },
    /// Fx1E
    AddIndex { x: u8 },
    /// Fx29
    FontGlyph { x: u8 },
    /// Fx33
    StoreBcd { x: u8 },
    /// Fx55
    StoreRegisters { x: u8 },
    /// Fx65
    LoadRegisters { x: u8 },
}

impl Instruction {
    /// Decodes an instruction word, or `None` for a nibble pattern that
    /// matches no known form.
    pub fn decode(word: u16) -> Option<Self> {
        use Instruction::*;

        let x = ((word >> 8) & 0xF) as u8;
        let y = ((word >> 4) & 0xF) as u8;
        let n = (word & 0xF) as u8;
        let nn = (word & 0xFF) as u8;
        let nnn = word & 0xFFF;

        let instruction = match word >> 12 {
            0x0 => match nn {
                0xE0 => ClearScreen,
                0xEE => Return,
                _ => return None,
            },
            0x1 => Jump(nnn),
            0x2 => Call(nnn),
            0x3 => SkipEqImm { x, nn },
            0x4 => SkipNeImm { x, nn },
            0x5 if n == 0x0 => SkipEqReg { x, y },
            0x6 => LoadImm { x, nn },
            0x7 => AddImm { x, nn },
            0x8 => match n {
                0x0 => Move { x, y },
                0x1 => Or { x, y },
                0x2 => And { x, y },
                0x3 => Xor { x, y },
                0x4 => Add { x, y },
                0x5 => Sub { x, y },
                0x6 => ShiftRight { x },
                0x7 => SubFrom { x, y },
                0xE => ShiftLeft { x },
                _ => return None,
            },
            0x9 if n == 0x0 => SkipNeReg { x, y },
            0xA => SetIndex(nnn),
            0xB => JumpOffset(nnn),
            0xC => Random { x, nn },
            0xD => Draw { x, y, n },
            0xE => match nn {
                0x9E => SkipKeyPressed { x },
                0xA1 => SkipKeyNotPressed { x },
                _ => return None,
            },
            0xF => match nn {
                0x07 => ReadDelay { x },
                0x0A => WaitKey { x },
                0x15 => SetDelay { x },
                0x18 => SetSound { x },
                0x1E => AddIndex { x },
                0x29 => FontGlyph { x },
                0x33 => StoreBcd { x },
                0x55 => StoreRegisters { x },
                0x65 => LoadRegisters { x },
                _ => return None,
            },
            _ => return None,
        };
        Some(instruction)
    }
}
