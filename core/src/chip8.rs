use log::{trace, warn};

use crate::constants::{MAX_PROGRAM_SIZE, MEMORY_SIZE, PROGRAM_START};
use crate::error::{Fault, LoadError};
use crate::execute::execute;
use crate::instruction::Instruction;
use crate::state::{FrameBuffer, State};

/// # Chip-8
/// The interpreter core: a fetch-decode-execute step function over an owned
/// [`State`], plus the 60Hz timer tick.
///
/// The core is single-threaded and cooperative; the driving loop calls
/// [`step`](Chip8::step) as often as it wants per frame and
/// [`tick_timers`](Chip8::tick_timers) exactly once per 60Hz frame. The
/// collaborators touch only their designated surfaces:
///
/// - the program loader goes through [`load_program`](Chip8::load_program)
/// - the input collaborator writes keys through [`set_key`](Chip8::set_key)
/// - the display sink reads [`framebuffer`](Chip8::framebuffer) when
///   [`redraw_requested`](Chip8::redraw_requested) is set and then calls
///   [`clear_redraw_flag`](Chip8::clear_redraw_flag)
/// - the audio collaborator gets the one-shot beep edge from the return
///   value of `tick_timers`
pub struct Chip8 {
    state: State,
}

impl Chip8 {
    pub fn new() -> Self {
        Chip8 {
            state: State::new(),
        }
    }

    /// Re-arms the machine for a fresh program; see [`State::reset`].
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Copies a program image into memory at the program base.
    ///
    /// On failure memory is untouched, so a caller may report the error and
    /// load a different image without resetting.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), LoadError> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(LoadError::ProgramTooLarge {
                len: program.len(),
                capacity: MAX_PROGRAM_SIZE,
            });
        }
        self.state.memory[PROGRAM_START..PROGRAM_START + program.len()].copy_from_slice(program);
        Ok(())
    }

    /// Executes one fetch-decode-execute cycle.
    ///
    /// While a `FX0A` key wait is pending this is a no-op, so the driving
    /// loop stays responsive. Instruction words that decode to nothing are
    /// logged and skipped; fatal faults come back as `Err` and the caller
    /// must stop stepping.
    pub fn step(&mut self) -> Result<(), Fault> {
        if self.state.waiting_for_key.is_some() {
            return Ok(());
        }

        let pc = usize::from(self.state.pc);
        if pc + 1 >= MEMORY_SIZE {
            return Err(Fault::OutOfBounds { addr: self.state.pc });
        }
        let word = u16::from(self.state.memory[pc]) << 8 | u16::from(self.state.memory[pc + 1]);
        trace!(
            "{word:04X} at {pc:03X}: v{:02X?} i={:04X}",
            self.state.v,
            self.state.i
        );

        // Control-flow instructions overwrite the already-advanced pc.
        self.state.pc = self.state.pc.wrapping_add(2);

        match Instruction::decode(word) {
            Some(instruction) => execute(&mut self.state, instruction),
            None => {
                warn!("skipping unknown opcode {word:04X} at {pc:03X}");
                Ok(())
            }
        }
    }

    /// Decrements both timers, floored at zero. Returns `true` exactly when
    /// the sound timer ran out on this tick, which is the audio
    /// collaborator's cue to beep once.
    ///
    /// Runs at a fixed 60Hz regardless of how many `step` calls the driver
    /// makes per tick.
    pub fn tick_timers(&mut self) -> bool {
        if self.state.delay_timer > 0 {
            self.state.delay_timer -= 1;
        }
        if self.state.sound_timer > 0 {
            self.state.sound_timer -= 1;
            return self.state.sound_timer == 0;
        }
        false
    }

    /// Records a key state change from the input collaborator. Only the low
    /// nibble of `key` selects a key, matching how the skip instructions
    /// read Vx.
    ///
    /// A press also completes a pending `FX0A` wait by writing the key index
    /// into the waiting register; the wait only ever ends on a transition to
    /// pressed, so a key already held (or an OS auto-repeat of one) leaves
    /// it pending.
    pub fn set_key(&mut self, key: u8, pressed: bool) {
        let key = key & 0xF;
        let was_pressed = self.state.keypad[usize::from(key)];
        self.state.keypad[usize::from(key)] = pressed;
        if pressed && !was_pressed {
            if let Some(register) = self.state.waiting_for_key.take() {
                self.state.v[usize::from(register)] = key;
            }
        }
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Whether an instruction has touched the framebuffer since the display
    /// sink last consumed a frame.
    pub fn redraw_requested(&self) -> bool {
        self.state.redraw
    }

    /// Called by the display sink after it has consumed a frame.
    pub fn clear_redraw_flag(&mut self) {
        self.state.redraw = false;
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_combines_bytes_big_endian() {
        let mut chip8 = Chip8::new();
        // 0x6A42: V10 = 0x42
        chip8.load_program(&[0x6A, 0x42]).unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.state.v[0xA], 0x42);
        assert_eq!(chip8.state.pc, 0x202);
    }

    #[test]
    fn load_program_rejects_oversized_image() {
        let mut chip8 = Chip8::new();
        let too_big = vec![0; MAX_PROGRAM_SIZE + 1];
        assert_eq!(
            chip8.load_program(&too_big),
            Err(LoadError::ProgramTooLarge {
                len: MAX_PROGRAM_SIZE + 1,
                capacity: MAX_PROGRAM_SIZE,
            })
        );
        // memory untouched on failure
        assert_eq!(chip8.state.memory[PROGRAM_START], 0);
    }

    #[test]
    fn load_program_accepts_maximum_image() {
        let mut chip8 = Chip8::new();
        let image = vec![0xAB; MAX_PROGRAM_SIZE];
        chip8.load_program(&image).unwrap();
        assert_eq!(chip8.state.memory[MEMORY_SIZE - 1], 0xAB);
    }

    #[test]
    fn step_skips_unknown_opcode() {
        let mut chip8 = Chip8::new();
        chip8.load_program(&[0xF1, 0xFF, 0x61, 0x07]).unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.state.pc, 0x202);
        chip8.step().unwrap();
        assert_eq!(chip8.state.v[0x1], 0x07);
    }

    #[test]
    fn step_faults_when_pc_leaves_memory() {
        let mut chip8 = Chip8::new();
        chip8.state.pc = 0xFFF;
        assert_eq!(chip8.step(), Err(Fault::OutOfBounds { addr: 0xFFF }));
    }

    #[test]
    fn step_suspends_while_waiting_for_key() {
        let mut chip8 = Chip8::new();
        // FX0A then an instruction that must not run until the wait ends
        chip8.load_program(&[0xF5, 0x0A, 0x61, 0x07]).unwrap();
        chip8.step().unwrap();
        chip8.step().unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.state.pc, 0x202);
        assert_eq!(chip8.state.v[0x1], 0);
    }

    #[test]
    fn key_press_completes_wait_and_resumes() {
        let mut chip8 = Chip8::new();
        chip8.load_program(&[0xF5, 0x0A, 0x61, 0x07]).unwrap();
        chip8.step().unwrap();
        chip8.set_key(0xB, true);
        assert_eq!(chip8.state.v[0x5], 0xB);
        assert_eq!(chip8.state.waiting_for_key, None);
        chip8.step().unwrap();
        assert_eq!(chip8.state.v[0x1], 0x07);
    }

    #[test]
    fn held_key_does_not_complete_wait() {
        let mut chip8 = Chip8::new();
        chip8.set_key(0xB, true);
        chip8.load_program(&[0xF5, 0x0A]).unwrap();
        chip8.step().unwrap();
        // auto-repeat delivers another press for the already-held key
        chip8.set_key(0xB, true);
        assert_eq!(chip8.state.waiting_for_key, Some(0x5));
        // release then press is a real transition
        chip8.set_key(0xB, false);
        chip8.set_key(0xB, true);
        assert_eq!(chip8.state.waiting_for_key, None);
        assert_eq!(chip8.state.v[0x5], 0xB);
    }

    #[test]
    fn set_key_uses_low_nibble() {
        let mut chip8 = Chip8::new();
        chip8.set_key(0x1B, true);
        assert!(chip8.state.keypad[0xB]);
        chip8.set_key(0x1B, false);
        assert!(!chip8.state.keypad[0xB]);
    }

    #[test]
    fn key_release_does_not_complete_wait() {
        let mut chip8 = Chip8::new();
        chip8.load_program(&[0xF5, 0x0A]).unwrap();
        chip8.step().unwrap();
        chip8.set_key(0xB, false);
        assert_eq!(chip8.state.waiting_for_key, Some(0x5));
    }

    #[test]
    fn tick_timers_floors_at_zero() {
        let mut chip8 = Chip8::new();
        chip8.state.delay_timer = 1;
        chip8.tick_timers();
        assert_eq!(chip8.state.delay_timer, 0);
        chip8.tick_timers();
        assert_eq!(chip8.state.delay_timer, 0);
    }

    #[test]
    fn tick_timers_beeps_once_on_sound_expiry() {
        let mut chip8 = Chip8::new();
        chip8.state.sound_timer = 2;
        assert!(!chip8.tick_timers());
        // 1 -> 0 is the one-shot edge
        assert!(chip8.tick_timers());
        assert!(!chip8.tick_timers());
    }

    #[test]
    fn display_sink_clears_redraw_flag() {
        let mut chip8 = Chip8::new();
        chip8.load_program(&[0x00, 0xE0]).unwrap();
        chip8.step().unwrap();
        assert!(chip8.redraw_requested());
        chip8.clear_redraw_flag();
        assert!(!chip8.redraw_requested());
    }

    #[test]
    fn reset_rearms_after_fault() {
        let mut chip8 = Chip8::new();
        chip8.state.pc = 0xFFF;
        assert!(chip8.step().is_err());
        chip8.reset();
        assert_eq!(chip8.state.pc, 0x200);
        chip8.load_program(&[0x61, 0x07]).unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.state.v[0x1], 0x07);
    }
}
