use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use vm8_core::constants::{STEPS_PER_TICK, TIMER_HZ};
use vm8_core::Chip8;
use vm8_display::Display;

use crate::audio::Beeper;
use crate::keymap::keymap;

/// Loads a program image and drives the machine at 60 frames per second:
/// input events, then [`STEPS_PER_TICK`] CPU steps, then one timer tick,
/// then a render if the core asked for one.
pub fn run(rom: &Path) -> Result<(), String> {
    let mut chip8 = Chip8::new();

    let image = fs::read(rom).map_err(|e| format!("unable to read {}: {e}", rom.display()))?;
    chip8.load_program(&image).map_err(|e| e.to_string())?;
    log::info!("loaded {} byte program from {}", image.len(), rom.display());

    let sdl = sdl2::init()?;
    let mut display = Display::new(&sdl)?;
    let mut beeper = Beeper::new(&sdl)?;
    let mut events = sdl.event_pump()?;

    let frame_time = Duration::from_secs(1) / TIMER_HZ;

    'frame: loop {
        let frame_start = Instant::now();

        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'frame,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => {
                    if let Some(index) = keymap(key) {
                        chip8.set_key(index, true);
                    }
                }
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(index) = keymap(key) {
                        chip8.set_key(index, false);
                    }
                }
                _ => {}
            }
        }

        for _ in 0..STEPS_PER_TICK {
            if let Err(fault) = chip8.step() {
                return Err(format!("execution halted: {fault}"));
            }
        }

        if chip8.tick_timers() {
            beeper.beep();
        }
        beeper.poll();

        if chip8.redraw_requested() {
            display.render(chip8.framebuffer())?;
            chip8.clear_redraw_flag();
        }

        if let Some(remaining) = frame_time.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    Ok(())
}
