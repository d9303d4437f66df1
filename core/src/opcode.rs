/// # Opcodes
///
/// Chip-8 opcodes are 16 bits each, fetched big-endian from two consecutive bytes.
/// The most significant nibble selects one of sixteen `Group`s. Groups 0, 8, E and F
/// are further cased on their low nibble or low byte.
///
/// Nibbles not used to determine the operation carry its operands.
/// - `(_, n, n, n)` a 12-bit address
/// - `(_, _, n, n)` a byte that is assigned to and/or compared with Vx
/// - `(_, n, _, _)` either the register Vx or a range of registers V0..Vx
/// - `(_, _, n, _)` the register Vy
/// - `(_, _, _, n)` a sprite height
pub trait Opcode {
    /// The Opcode's dispatch group, taken from its most significant nibble.
    /// `[g___]`
    fn group(&self) -> Group;

    /// The Opcode's second nibble.
    /// `[_x__]`
    fn x(&self) -> u8;

    /// The Opcode's third nibble.
    /// `[__y_]`
    fn y(&self) -> u8;

    /// The Opcode's fourth nibble.
    /// `[___n]`
    fn n(&self) -> u8;

    /// The Opcode's least significant byte.
    /// `[__kk]`
    fn kk(&self) -> u8;

    /// The Opcode without its most significant nibble.
    /// `[_adr]`
    fn addr(&self) -> u16;
}

/// The sixteen top level instruction groups, in nibble order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Group {
    /// `00E0` clear, `00EE` return
    System,
    /// `1nnn`
    Jump,
    /// `2nnn`
    Call,
    /// `3xkk`
    SkipEqualByte,
    /// `4xkk`
    SkipNotEqualByte,
    /// `5xy0`
    SkipEqualRegister,
    /// `6xkk`
    LoadByte,
    /// `7xkk`
    AddByte,
    /// `8xy_` register to register arithmetic and logic
    Alu,
    /// `9xy0`
    SkipNotEqualRegister,
    /// `Annn`
    LoadIndex,
    /// `Bnnn`
    JumpOffset,
    /// `Cxkk`
    Random,
    /// `Dxyn`
    Draw,
    /// `Ex__` keypad skips
    Key,
    /// `Fx__` timers, index, memory and key wait
    Misc,
}

const GROUPS: [Group; 16] = [
    Group::System,
    Group::Jump,
    Group::Call,
    Group::SkipEqualByte,
    Group::SkipNotEqualByte,
    Group::SkipEqualRegister,
    Group::LoadByte,
    Group::AddByte,
    Group::Alu,
    Group::SkipNotEqualRegister,
    Group::LoadIndex,
    Group::JumpOffset,
    Group::Random,
    Group::Draw,
    Group::Key,
    Group::Misc,
];

impl Opcode for u16 {
    fn group(&self) -> Group {
        GROUPS[(self >> 12) as usize]
    }

    fn x(&self) -> u8 {
        ((self & 0x0F00) >> 8) as u8
    }

    fn y(&self) -> u8 {
        ((self & 0x00F0) >> 4) as u8
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn kk(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn addr(&self) -> u16 {
        self & 0x0FFF
    }
}
