use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_SET, FONT_START, KEY_COUNT, MEMORY_SIZE, PROGRAM_START,
    STACK_DEPTH,
};

/// The monochrome display contents, indexed as `[y][x]` with values 0 or 1.
pub type FrameBuffer = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// The complete machine state: one owned aggregate, no sharing.
///
/// - `v` holds the sixteen 8-bit registers V0..VF; VF doubles as the
///   carry/borrow/collision flag and is always written *after* the result
///   it describes.
/// - `i` is the 16-bit indirect address register, `pc` the program counter.
/// - `stack` holds return addresses; `sp` indexes the next free slot, so
///   entries at and above `sp` are stale and must not be read.
/// - `keypad` is written only from outside (the input collaborator); the
///   interpreter only reads it.
/// - `waiting_for_key` is the suspended form of `FX0A`: while it holds a
///   register index the CPU does not fetch, and the next key press completes
///   the wait by landing in that register.
/// - `redraw` is set by any instruction that touches the framebuffer and
///   cleared by the display sink once it has consumed a frame.
#[derive(Clone)]
pub struct State {
    pub memory: [u8; MEMORY_SIZE],
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub stack: [u16; STACK_DEPTH],
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub frame_buffer: FrameBuffer,
    pub redraw: bool,
    pub keypad: [bool; KEY_COUNT],
    pub waiting_for_key: Option<u8>,
}

impl State {
    pub fn new() -> Self {
        let mut state = State {
            memory: [0; MEMORY_SIZE],
            v: [0; 16],
            i: 0,
            pc: 0,
            stack: [0; STACK_DEPTH],
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            redraw: false,
            keypad: [false; KEY_COUNT],
            waiting_for_key: None,
        };
        state.reset();
        state
    }

    /// Re-arm the machine: everything zeroed, font set copied into its
    /// reserved region, `pc` at the program start. Nothing leaks across
    /// resets.
    pub fn reset(&mut self) {
        self.memory = [0; MEMORY_SIZE];
        self.memory[FONT_START..FONT_START + FONT_SET.len()].copy_from_slice(&FONT_SET);
        self.v = [0; 16];
        self.i = 0;
        self.pc = PROGRAM_START as u16;
        self.stack = [0; STACK_DEPTH];
        self.sp = 0;
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.frame_buffer = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        self.redraw = false;
        self.keypad = [false; KEY_COUNT];
        self.waiting_for_key = None;
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_has_font_at_reserved_region() {
        let state = State::new();
        assert_eq!(state.memory[FONT_START..FONT_START + 80], FONT_SET);
        // the 0 glyph starts the sheet
        assert_eq!(state.memory[FONT_START], 0xF0);
    }

    #[test]
    fn new_state_starts_at_program_base() {
        let state = State::new();
        assert_eq!(state.pc, 0x200);
        assert_eq!(state.i, 0);
        assert_eq!(state.sp, 0);
    }

    #[test]
    fn reset_discards_all_mutations() {
        let mut state = State::new();
        state.v[3] = 0xAB;
        state.memory[0x400] = 0xFF;
        state.frame_buffer[5][5] = 1;
        state.redraw = true;
        state.keypad[2] = true;
        state.waiting_for_key = Some(1);
        state.delay_timer = 9;

        state.reset();
        assert_eq!(state.v[3], 0);
        assert_eq!(state.memory[0x400], 0);
        assert_eq!(state.frame_buffer[5][5], 0);
        assert!(!state.redraw);
        assert!(!state.keypad[2]);
        assert_eq!(state.waiting_for_key, None);
        assert_eq!(state.delay_timer, 0);
        assert_eq!(state.memory[FONT_START], 0xF0);
    }
}
