use crate::instruction::Instruction;

/// # Opcodes
///
/// Chip-8 opcodes are 16 bits each, stored big-endian. Their behavior is cased on some combination of:
/// - `(n, _, _, _)` the family; applies to all opcodes
/// - `(_, _, _, n)` specific behavior within the 0x8 family
/// - `(_, _, n, n)` specific behavior within the 0xE and 0xF families
/// - `(n, n, n, n)` fixed functions in the 0x0 family (e.g. 00E0; clear screen)
///
/// Nibbles not used to determine the operation usually carry operands.
/// - `(_, n, n, n)` a 12-bit address (NNN)
/// - `(_, _, n, n)` an immediate byte assigned to and/or compared with Vx (NN)
/// - `(_, n, _, _)` either the register Vx or the range of registers V0..=Vx
/// - `(_, _, n, _)` the register Vy
/// - `(_, _, _, n)` a sprite height (N)
pub trait Opcode {
    /// Builds an opcode out of the two bytes it's stored as
    fn from_bytes(high: u8, low: u8) -> Self;

    /// The Opcode's component nibbles.
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// The Opcode's first nibble, selecting its family.
    /// `[f___]`
    fn family(&self) -> u8;

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

    /// Decodes the Opcode into the Instruction it names.
    fn to_instruction(&self) -> Instruction;
}

impl Opcode for u16 {
    fn from_bytes(high: u8, low: u8) -> Self {
        u16::from(high) << 8 | u16::from(low)
    }

    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (self.family(), self.x(), self.y(), self.n())
    }

    fn family(&self) -> u8 {
        (self >> 12) as u8
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

    fn to_instruction(&self) -> Instruction {
        Instruction::decode(*self)
    }
}
