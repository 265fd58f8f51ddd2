use std::time::{Duration, Instant};

use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

/// Length of the one-shot beep played when the sound timer runs out.
const BEEP_LENGTH: Duration = Duration::from_millis(150);
const BEEP_FREQUENCY: f32 = 440.0;
const BEEP_VOLUME: f32 = 0.05;

struct SquareWave {
    phase_inc: f32,
    phase: f32,
    volume: f32,
}

impl AudioCallback for SquareWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = if self.phase <= 0.5 {
                self.volume
            } else {
                -self.volume
            };
            self.phase = (self.phase + self.phase_inc) % 1.0;
        }
    }
}

/// # Beeper
/// Square-wave playback for the machine's single sound: the driver calls
/// [`beep`](Beeper::beep) on the sound-timer edge and [`poll`](Beeper::poll)
/// once per frame so the tone stops after [`BEEP_LENGTH`].
pub struct Beeper {
    device: AudioDevice<SquareWave>,
    playing_until: Option<Instant>,
}

impl Beeper {
    pub fn new(sdl: &sdl2::Sdl) -> Result<Self, String> {
        let audio = sdl.audio()?;
        let spec = AudioSpecDesired {
            freq: Some(44_100),
            channels: Some(1),
            samples: None,
        };
        let device = audio.open_playback(None, &spec, |spec| SquareWave {
            phase_inc: BEEP_FREQUENCY / spec.freq as f32,
            phase: 0.0,
            volume: BEEP_VOLUME,
        })?;
        Ok(Beeper {
            device,
            playing_until: None,
        })
    }

    /// Starts the one-shot beep.
    pub fn beep(&mut self) {
        self.device.resume();
        self.playing_until = Some(Instant::now() + BEEP_LENGTH);
    }

    /// Pauses playback once the current beep has run its length.
    pub fn poll(&mut self) {
        if let Some(deadline) = self.playing_until {
            if Instant::now() >= deadline {
                self.device.pause();
                self.playing_until = None;
            }
        }
    }
}
