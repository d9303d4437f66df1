use std::error::Error;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use log::{error, info};
use sdl2::event::Event;
use sdl2::EventPump;

use chip8_core::{Chip8, Command, Config, FrameBuffer, Host, Keypad};
use chip8_display::{Beeper, Display};

use crate::keymap::{control, keymap, Control};

/// Back-off between loop iterations, on top of waiting for vsync
const IDLE: Duration = Duration::from_millis(1);

/// Hosts the interpreter in an SDL2 window with keyboard input and a beeper
struct SdlHost {
    display: Display,
    beeper: Beeper,
    events: EventPump,
    rom: PathBuf,
    step_count: u32,
    frequency: u32,
    paused: bool,
    last_elapsed: Instant,
}

impl SdlHost {
    fn title(&self) -> String {
        let name = self
            .rom
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let run_state = if self.paused { "paused" } else { "running" };
        format!("{} [{}] {} cycles/tick", name, run_state, self.frequency)
    }

    /// Translates a control key into a command, keeping track of what the title shows
    fn command(&mut self, control: Control) -> Option<Command> {
        match control {
            Control::TogglePause => {
                self.paused = !self.paused;
                Some(Command::TogglePause)
            }
            Control::Step => Some(Command::Step(self.step_count)),
            Control::Faster => {
                self.frequency = faster(self.frequency);
                Some(Command::SetFrequency(self.frequency))
            }
            Control::Slower => {
                self.frequency = slower(self.frequency);
                Some(Command::SetFrequency(self.frequency))
            }
            Control::Reset => Some(Command::Reset),
            Control::Reload => match fs::read(&self.rom) {
                Ok(program) => Some(Command::Load(program)),
                Err(err) => {
                    error!("unable to reload {}: {}", self.rom.display(), err);
                    None
                }
            },
            Control::DumpTrace => Some(Command::DumpTrace),
            Control::Quit => Some(Command::Quit),
        }
    }
}

fn faster(frequency: u32) -> u32 {
    frequency.saturating_add(1)
}

/// At least one cycle has to run per tick
fn slower(frequency: u32) -> u32 {
    frequency.saturating_sub(1).max(1)
}

impl Keypad for SdlHost {
    fn is_pressed(&self, key: u8) -> bool {
        keymap(key).map_or(false, |scancode| {
            self.events.keyboard_state().is_scancode_pressed(scancode)
        })
    }
}

impl Host for SdlHost {
    type Error = String;

    fn poll(&mut self) -> Result<Vec<Command>, String> {
        let events: Vec<Event> = self.events.poll_iter().collect();
        let title = self.title();

        let mut commands = Vec::new();
        for event in events {
            match event {
                Event::Quit { .. } => commands.push(Command::Quit),
                Event::KeyDown {
                    scancode: Some(scancode),
                    repeat: false,
                    ..
                } => {
                    if let Some(command) = control(scancode).and_then(|c| self.command(c)) {
                        commands.push(command);
                    }
                }
                _ => continue,
            };
        }

        if self.title() != title {
            self.display.set_title(&self.title())?;
        }
        Ok(commands)
    }

    fn elapsed(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now - self.last_elapsed;
        self.last_elapsed = now;
        elapsed
    }

    fn render(&mut self, frame: &FrameBuffer) -> Result<(), String> {
        self.display.render(frame)
    }

    fn set_tone(&mut self, on: bool) {
        self.beeper.set_tone(on);
    }

    fn idle(&mut self) {
        thread::sleep(IDLE);
    }
}

fn load(chip8: &mut Chip8, rom: &Path) -> Result<(), Box<dyn Error>> {
    let file = File::open(rom)?;
    let mut reader = BufReader::new(file);
    chip8.load_rom(&mut reader)?;
    info!("loaded {}", rom.display());
    Ok(())
}

/// Loads `rom` and runs it until the window is closed
pub fn run(
    rom: PathBuf,
    config: Config,
    scale: u32,
    step_count: u32,
) -> Result<(), Box<dyn Error>> {
    let mut chip8 = Chip8::with_config(config);
    load(&mut chip8, &rom)?;

    // Get SDL2 context
    let sdl: sdl2::Sdl = sdl2::init()?;
    let events = sdl.event_pump()?;
    let display = Display::new(&sdl, "Chip-8", scale)?;
    let beeper = Beeper::new(&sdl)?;

    let mut host = SdlHost {
        display,
        beeper,
        events,
        rom,
        step_count,
        frequency: chip8.instruction_frequency(),
        paused: chip8.is_paused(),
        last_elapsed: Instant::now(),
    };
    host.display.set_title(&host.title())?;

    chip8_core::run(&mut chip8, &mut host)?;
    Ok(())
}
