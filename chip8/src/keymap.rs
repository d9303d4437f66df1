use sdl2::keyboard::Scancode;

/// # Keymap
/// Chip-8 input is generated with a hexadecimal keypad.
///
/// This original layout is mapped to the left 4 alphanumeric columns.
/// Scancodes are used so the layout stays put on non-QWERTY keyboards.
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|  ->  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
pub fn keymap(key: u8) -> Option<Scancode> {
    match key {
        0x0 => Some(Scancode::X),
        0x1 => Some(Scancode::Num1),
        0x2 => Some(Scancode::Num2),
        0x3 => Some(Scancode::Num3),
        0x4 => Some(Scancode::Q),
        0x5 => Some(Scancode::W),
        0x6 => Some(Scancode::E),
        0x7 => Some(Scancode::A),
        0x8 => Some(Scancode::S),
        0x9 => Some(Scancode::D),
        0xA => Some(Scancode::Z),
        0xB => Some(Scancode::C),
        0xC => Some(Scancode::Num4),
        0xD => Some(Scancode::R),
        0xE => Some(Scancode::F),
        0xF => Some(Scancode::V),
        _ => None,
    }
}

/// Emulator controls that live outside of the keypad
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Control {
    TogglePause,
    Step,
    Faster,
    Slower,
    Reset,
    Reload,
    DumpTrace,
    Quit,
}

pub fn control(key: Scancode) -> Option<Control> {
    match key {
        Scancode::Space => Some(Control::TogglePause),
        Scancode::N => Some(Control::Step),
        Scancode::Up => Some(Control::Faster),
        Scancode::Down => Some(Control::Slower),
        Scancode::Backspace => Some(Control::Reset),
        Scancode::F5 => Some(Control::Reload),
        Scancode::L => Some(Control::DumpTrace),
        Scancode::Escape => Some(Control::Quit),
        _ => None,
    }
}
