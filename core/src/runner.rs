use log::info;

use crate::chip8::Chip8;
use crate::host::Host;

/// Drives `chip8` from `host` until the host asks to quit
///
/// Every iteration applies the polled commands, lets the timing controller run whatever
/// cycles are due, then renders the frame and updates the tone.
pub fn run<H: Host>(chip8: &mut Chip8, host: &mut H) -> Result<(), H::Error> {
    loop {
        for command in host.poll()? {
            if !chip8.apply(command, &*host) {
                info!("quitting");
                return Ok(());
            }
        }

        let elapsed = host.elapsed();
        chip8.update(elapsed, &*host);

        host.render(chip8.frame())?;
        host.set_tone(chip8.sound_active());
        host.idle();
    }
}
