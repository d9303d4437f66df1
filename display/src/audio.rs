use log::debug;
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

const SAMPLE_RATE: i32 = 44_100;
const TONE_FREQUENCY: f32 = 220.0;
const VOLUME: f32 = 0.25;

/// A square wave oscillating between `volume` and `-volume`
struct SquareWave {
    phase_inc: f32,
    phase: f32,
    volume: f32,
}

impl AudioCallback for SquareWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = if self.phase < 0.5 {
                self.volume
            } else {
                -self.volume
            };
            self.phase = (self.phase + self.phase_inc) % 1.0;
        }
    }
}

/// # Beeper
/// A single 220Hz tone that is either playing or silent.
pub struct Beeper {
    device: AudioDevice<SquareWave>,
    playing: bool,
}

impl Beeper {
    pub fn new(sdl: &sdl2::Sdl) -> Result<Self, String> {
        let audio_subsystem = sdl.audio()?;
        let desired = AudioSpecDesired {
            freq: Some(SAMPLE_RATE),
            channels: Some(1),
            samples: None,
        };
        let device = audio_subsystem.open_playback(None, &desired, |spec| {
            debug!("opened audio device at {}Hz", spec.freq);
            SquareWave {
                phase_inc: TONE_FREQUENCY / spec.freq as f32,
                phase: 0.0,
                volume: VOLUME,
            }
        })?;

        Ok(Beeper {
            device,
            playing: false,
        })
    }

    /// Starts or stops the tone; repeated calls with the same value do nothing
    pub fn set_tone(&mut self, on: bool) {
        if on == self.playing {
            return;
        }
        if on {
            self.device.resume();
        } else {
            self.device.pause();
        }
        self.playing = on;
    }
}
