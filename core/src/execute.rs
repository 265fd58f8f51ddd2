//! State transitions for each decoded instruction.
//!
//! The program counter has already been advanced past the instruction when
//! an arm runs, so control-flow arms overwrite it and skip arms add another
//! two bytes. Arms that write VF do so last, after the operands they need
//! have been read, because the flag may target the same register as the
//! result.

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_GLYPH_SIZE, FONT_START, MEMORY_SIZE, STACK_DEPTH,
};
use crate::error::Fault;
use crate::instruction::Instruction;
use crate::state::State;

/// Applies one instruction to the state. Fatal faults (stack misuse, memory
/// reaching past 0xFFF) are returned; everything else mutates in place.
pub(crate) fn execute(state: &mut State, instruction: Instruction) -> Result<(), Fault> {
    use Instruction::*;

    match instruction {
        ClearScreen => {
            state.frame_buffer = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
            state.redraw = true;
        }
        Return => {
            if state.sp == 0 {
                return Err(Fault::StackUnderflow { pc: current_pc(state) });
            }
            state.sp -= 1;
            state.pc = state.stack[usize::from(state.sp)];
        }
        Jump(nnn) => state.pc = nnn,
        Call(nnn) => {
            if usize::from(state.sp) == STACK_DEPTH {
                return Err(Fault::StackOverflow { pc: current_pc(state) });
            }
            state.stack[usize::from(state.sp)] = state.pc;
            state.sp += 1;
            state.pc = nnn;
        }
        SkipEqImm { x, nn } => skip_if(state, state.v[usize::from(x)] == nn),
        SkipNeImm { x, nn } => skip_if(state, state.v[usize::from(x)] != nn),
        SkipEqReg { x, y } => {
            skip_if(state, state.v[usize::from(x)] == state.v[usize::from(y)])
        }
        LoadImm { x, nn } => state.v[usize::from(x)] = nn,
        AddImm { x, nn } => {
            let x = usize::from(x);
            state.v[x] = state.v[x].wrapping_add(nn);
        }
        Move { x, y } => state.v[usize::from(x)] = state.v[usize::from(y)],
        Or { x, y } => state.v[usize::from(x)] |= state.v[usize::from(y)],
        And { x, y } => state.v[usize::from(x)] &= state.v[usize::from(y)],
        Xor { x, y } => state.v[usize::from(x)] ^= state.v[usize::from(y)],
        Add { x, y } => {
            let (sum, carried) = state.v[usize::from(x)].overflowing_add(state.v[usize::from(y)]);
            state.v[usize::from(x)] = sum;
            state.v[0xF] = u8::from(carried);
        }
        Sub { x, y } => {
            let (vx, vy) = (state.v[usize::from(x)], state.v[usize::from(y)]);
            state.v[usize::from(x)] = vx.wrapping_sub(vy);
            state.v[0xF] = u8::from(vx > vy);
        }
        ShiftRight { x } => {
            let vx = state.v[usize::from(x)];
            state.v[usize::from(x)] = vx >> 1;
            state.v[0xF] = vx & 0x1;
        }
        SubFrom { x, y } => {
            let (vx, vy) = (state.v[usize::from(x)], state.v[usize::from(y)]);
            state.v[usize::from(x)] = vy.wrapping_sub(vx);
            state.v[0xF] = u8::from(vy > vx);
        }
        ShiftLeft { x } => {
            let vx = state.v[usize::from(x)];
            state.v[usize::from(x)] = vx << 1;
            state.v[0xF] = (vx & 0x80) >> 7;
        }
        SkipNeReg { x, y } => {
            skip_if(state, state.v[usize::from(x)] != state.v[usize::from(y)])
        }
        SetIndex(nnn) => state.i = nnn,
        JumpOffset(nnn) => state.pc = nnn.wrapping_add(u16::from(state.v[0x0])),
        Random { x, nn } => state.v[usize::from(x)] = rand::random::<u8>() & nn,
        Draw { x, y, n } => draw_sprite(state, x, y, n)?,
        SkipKeyPressed { x } => skip_if(state, state.keypad[key_index(state, x)]),
        SkipKeyNotPressed { x } => skip_if(state, !state.keypad[key_index(state, x)]),
        ReadDelay { x } => state.v[usize::from(x)] = state.delay_timer,
        WaitKey { x } => state.waiting_for_key = Some(x),
        SetDelay { x } => state.delay_timer = state.v[usize::from(x)],
        SetSound { x } => state.sound_timer = state.v[usize::from(x)],
        AddIndex { x } => state.i = state.i.wrapping_add(u16::from(state.v[usize::from(x)])),
        FontGlyph { x } => {
            let digit = u16::from(state.v[usize::from(x)] & 0xF);
            state.i = FONT_START as u16 + digit * FONT_GLYPH_SIZE as u16;
        }
        StoreBcd { x } => {
            let end = usize::from(state.i) + 3;
            if end > MEMORY_SIZE {
                return Err(Fault::OutOfBounds { addr: state.i });
            }
            let vx = state.v[usize::from(x)];
            state.memory[usize::from(state.i)] = vx / 100;
            state.memory[usize::from(state.i) + 1] = vx / 10 % 10;
            state.memory[usize::from(state.i) + 2] = vx % 10;
        }
        StoreRegisters { x } => {
            let (start, end) = register_window(state, x)?;
            state.memory[start..end].copy_from_slice(&state.v[..=usize::from(x)]);
        }
        LoadRegisters { x } => {
            let (start, end) = register_window(state, x)?;
            state.v[..=usize::from(x)].copy_from_slice(&state.memory[start..end]);
        }
    }
    Ok(())
}

/// XORs an `n`-row sprite read from `memory[I..I+n)` onto the framebuffer at
/// `(Vx, Vy)`, wrapping both coordinates. VF reports whether any lit pixel
/// was erased.
fn draw_sprite(state: &mut State, x: u8, y: u8, n: u8) -> Result<(), Fault> {
    let sprite_start = usize::from(state.i);
    if sprite_start + usize::from(n) > MEMORY_SIZE {
        return Err(Fault::OutOfBounds { addr: state.i });
    }
    let origin_x = usize::from(state.v[usize::from(x)]) % DISPLAY_WIDTH;
    let origin_y = usize::from(state.v[usize::from(y)]) % DISPLAY_HEIGHT;

    let mut erased = 0;
    for row in 0..usize::from(n) {
        let sprite_byte = state.memory[sprite_start + row];
        let py = (origin_y + row) % DISPLAY_HEIGHT;
        for bit in 0..8 {
            let px = (origin_x + bit) % DISPLAY_WIDTH;
            let pixel = (sprite_byte >> (7 - bit)) & 1;
            erased |= pixel & state.frame_buffer[py][px];
            state.frame_buffer[py][px] ^= pixel;
        }
    }
    state.v[0xF] = erased;
    state.redraw = true;
    Ok(())
}

fn skip_if(state: &mut State, condition: bool) {
    if condition {
        state.pc = state.pc.wrapping_add(2);
    }
}

/// Only the low nibble of Vx selects a key.
fn key_index(state: &State, x: u8) -> usize {
    usize::from(state.v[usize::from(x)] & 0xF)
}

/// Memory range touched by `FX55`/`FX65`, checked against the end of memory.
fn register_window(state: &State, x: u8) -> Result<(usize, usize), Fault> {
    let start = usize::from(state.i);
    let end = start + usize::from(x) + 1;
    if end > MEMORY_SIZE {
        return Err(Fault::OutOfBounds { addr: state.i });
    }
    Ok((start, end))
}

/// Address of the instruction currently being executed; the fetch has
/// already moved `pc` past it.
fn current_pc(state: &State) -> u16 {
    state.pc.wrapping_sub(2)
}
