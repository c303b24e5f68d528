use std::fmt;

use rand::RngCore;

use crate::error::Result;
use crate::keypad::Keypad;
use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::State;

/// A decoded Chip-8 instruction and its operands.
///
/// `x` and `y` name registers, `kk` is an immediate byte, `addr` a 12-bit
/// address and `n` a sprite height.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 0NNN
    Sys { addr: u16 },
    /// 00E0
    Cls,
    /// 00EE
    Ret,
    /// 1NNN
    Jump { addr: u16 },
    /// 2NNN
    Call { addr: u16 },
    /// 3XKK
    SkipEqImm { x: u8, kk: u8 },
    /// 4XKK
    SkipNeImm { x: u8, kk: u8 },
    /// 5XY0
    SkipEqReg { x: u8, y: u8 },
    /// 6XKK
    LoadImm { x: u8, kk: u8 },
    /// 7XKK
    AddImm { x: u8, kk: u8 },
    /// 8XY0
    Move { x: u8, y: u8 },
    /// 8XY1
    Or { x: u8, y: u8 },
    /// 8XY2
    And { x: u8, y: u8 },
    /// 8XY3
    Xor { x: u8, y: u8 },
    /// 8XY4
    AddReg { x: u8, y: u8 },
    /// 8XY5
    Sub { x: u8, y: u8 },
    /// 8XY6
    ShiftRight { x: u8, y: u8 },
    /// 8XY7
    SubN { x: u8, y: u8 },
    /// 8XYE
    ShiftLeft { x: u8, y: u8 },
    /// 9XY0
    SkipNeReg { x: u8, y: u8 },
    /// ANNN
    LoadI { addr: u16 },
    /// BNNN
    JumpOffset { addr: u16 },
    /// CXKK
    Random { x: u8, kk: u8 },
    /// DXYN
    Draw { x: u8, y: u8, n: u8 },
    /// EX9E
    SkipKeyPressed { x: u8 },
    /// EXA1
    SkipKeyNotPressed { x: u8 },
    /// FX07
    LoadDelay { x: u8 },
    /// FX0A
    WaitKey { x: u8 },
    /// FX15
    SetDelay { x: u8 },
    /// FX18
    SetSound { x: u8 },
    /// FX1E
    AddI { x: u8 },
    /// FX29
    LoadFont { x: u8 },
    /// FX33
    Bcd { x: u8 },
    /// FX55
    Store { x: u8 },
    /// FX65
    Read { x: u8 },
    /// Anything else; executing it does nothing
    Unknown(u16),
}

impl Instruction {
    /// Selects the correct Instruction for a given Opcode
    pub fn decode(op: u16) -> Self {
        use Instruction::*;

        let (addr, kk) = (op.addr(), op.kk());
        match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Cls,
            (0x0, 0x0, 0xE, 0xE) => Ret,
            (0x0, ..) => Sys { addr },
            (0x1, ..) => Jump { addr },
            (0x2, ..) => Call { addr },
            (0x3, x, ..) => SkipEqImm { x, kk },
            (0x4, x, ..) => SkipNeImm { x, kk },
            (0x5, x, y, _) => SkipEqReg { x, y },
            (0x6, x, ..) => LoadImm { x, kk },
            (0x7, x, ..) => AddImm { x, kk },
            (0x8, x, y, 0x0) => Move { x, y },
            (0x8, x, y, 0x1) => Or { x, y },
            (0x8, x, y, 0x2) => And { x, y },
            (0x8, x, y, 0x3) => Xor { x, y },
            (0x8, x, y, 0x4) => AddReg { x, y },
            (0x8, x, y, 0x5) => Sub { x, y },
            (0x8, x, y, 0x6) => ShiftRight { x, y },
            (0x8, x, y, 0x7) => SubN { x, y },
            (0x8, x, y, 0xE) => ShiftLeft { x, y },
            (0x9, x, y, _) => SkipNeReg { x, y },
            (0xA, ..) => LoadI { addr },
            (0xB, ..) => JumpOffset { addr },
            (0xC, x, ..) => Random { x, kk },
            (0xD, x, y, n) => Draw { x, y, n },
            (0xE, x, 0x9, 0xE) => SkipKeyPressed { x },
            (0xE, x, 0xA, 0x1) => SkipKeyNotPressed { x },
            (0xF, x, 0x0, 0x7) => LoadDelay { x },
            (0xF, x, 0x0, 0xA) => WaitKey { x },
            (0xF, x, 0x1, 0x5) => SetDelay { x },
            (0xF, x, 0x1, 0x8) => SetSound { x },
            (0xF, x, 0x1, 0xE) => AddI { x },
            (0xF, x, 0x2, 0x9) => LoadFont { x },
            (0xF, x, 0x3, 0x3) => Bcd { x },
            (0xF, x, 0x5, 0x5) => Store { x },
            (0xF, x, 0x6, 0x5) => Read { x },
            _ => Unknown(op),
        }
    }

    /// Runs the instruction against `state`.
    ///
    /// The pc must already point past this instruction. On error nothing in
    /// `state` has been changed.
    ///
    /// # Arguments
    /// * `keypad` where GetKey-mode key presses come from
    /// * `rng` the source of CXKK's random bytes
    pub fn execute(
        self,
        state: &mut State,
        keypad: &mut dyn Keypad,
        rng: &mut dyn RngCore,
    ) -> Result<()> {
        use Instruction::*;

        match self {
            Sys { addr } => sys(state, addr),
            Cls => cls(state),
            Ret => return ret(state),
            Jump { addr } => jump(state, addr),
            Call { addr } => return call(state, addr),
            SkipEqImm { x, kk } => ske(state, x, kk),
            SkipNeImm { x, kk } => skne(state, x, kk),
            SkipEqReg { x, y } => skre(state, x, y),
            LoadImm { x, kk } => load(state, x, kk),
            AddImm { x, kk } => add(state, x, kk),
            Move { x, y } => mv(state, x, y),
            Or { x, y } => or(state, x, y),
            And { x, y } => and(state, x, y),
            Xor { x, y } => xor(state, x, y),
            AddReg { x, y } => addr(state, x, y),
            Sub { x, y } => sub(state, x, y),
            ShiftRight { x, y } => shr(state, x, y),
            SubN { x, y } => subn(state, x, y),
            ShiftLeft { x, y } => shl(state, x, y),
            SkipNeReg { x, y } => skrne(state, x, y),
            LoadI { addr } => loadi(state, addr),
            JumpOffset { addr } => jumpi(state, addr),
            Random { x, kk } => rand(state, x, kk, rng),
            Draw { x, y, n } => return draw(state, x, y, n),
            SkipKeyPressed { x } => skpr(state, x, keypad),
            SkipKeyNotPressed { x } => skup(state, x, keypad),
            LoadDelay { x } => moved(state, x),
            WaitKey { x } => return keyd(state, x, keypad),
            SetDelay { x } => loads(state, x),
            SetSound { x } => ld(state, x),
            AddI { x } => addi(state, x),
            LoadFont { x } => ldspr(state, x),
            Bcd { x } => return bcd(state, x),
            Store { x } => return stor(state, x),
            Read { x } => return read(state, x),
            Unknown(_) => {}
        }
        Ok(())
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Instruction::Unknown(_))
    }
}

/// Disassembly in the usual Chip-8 assembler syntax
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            Sys { addr } => write!(f, "SYS {:#05X}", addr),
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jump { addr } => write!(f, "JP {:#05X}", addr),
            Call { addr } => write!(f, "CALL {:#05X}", addr),
            SkipEqImm { x, kk } => write!(f, "SE V{:X}, {:#04X}", x, kk),
            SkipNeImm { x, kk } => write!(f, "SNE V{:X}, {:#04X}", x, kk),
            SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadImm { x, kk } => write!(f, "LD V{:X}, {:#04X}", x, kk),
            AddImm { x, kk } => write!(f, "ADD V{:X}, {:#04X}", x, kk),
            Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            SubN { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            SkipNeReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadI { addr } => write!(f, "LD I, {:#05X}", addr),
            JumpOffset { addr } => write!(f, "JP V0, {:#05X}", addr),
            Random { x, kk } => write!(f, "RND V{:X}, {:#04X}", x, kk),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipKeyPressed { x } => write!(f, "SKP V{:X}", x),
            SkipKeyNotPressed { x } => write!(f, "SKNP V{:X}", x),
            LoadDelay { x } => write!(f, "LD V{:X}, DT", x),
            WaitKey { x } => write!(f, "LD V{:X}, K", x),
            SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            SetSound { x } => write!(f, "LD ST, V{:X}", x),
            AddI { x } => write!(f, "ADD I, V{:X}", x),
            LoadFont { x } => write!(f, "LD F, V{:X}", x),
            Bcd { x } => write!(f, "LD B, V{:X}", x),
            Store { x } => write!(f, "LD [I], V{:X}", x),
            Read { x } => write!(f, "LD V{:X}, [I]", x),
            Unknown(op) => write!(f, "DW {:#06X}", op),
        }
    }
}
