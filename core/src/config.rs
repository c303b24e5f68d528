use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::constants::{
    CPU_CYCLES_PER_TIMER_CYCLE, DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT, FONT_ADDRESS, MAX_MEMORY_SIZE,
    MEMORY_SIZE, PROGRAM_ADDRESS, STACK_SIZE, SUPERCHIP_DISPLAY_HEIGHT, SUPERCHIP_DISPLAY_WIDTH,
};
use crate::error::{Error, Result};

/// # Quirks
/// Historical Chip-8 interpreters disagree on a handful of instructions.
/// Each bit selects the alternative behavior for one of them.
///
/// | flag | set | unset |
/// |---|---|---|
/// | `SHIFT_INPLACE` | 8XY6/8XYE shift Vx | Vy is copied to Vx first |
/// | `JUMP_VX_OFFSET` | BNNN jumps to NNN + Vx (x = high nibble of NNN) | NNN + V0 |
/// | `FX1E_OVERFLOW` | FX1E sets VF when I leaves the 12-bit range | VF untouched |
/// | `FX55_FX65_INC_I` | FX55/FX65 leave I one past the last address | I unchanged |
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Quirks(u8);

impl Quirks {
    pub const SHIFT_INPLACE: Quirks = Quirks(0x1);
    pub const JUMP_VX_OFFSET: Quirks = Quirks(0x2);
    pub const FX1E_OVERFLOW: Quirks = Quirks(0x4);
    pub const FX55_FX65_INC_I: Quirks = Quirks(0x8);

    const ALL_BITS: u8 = 0xF;

    pub const fn empty() -> Self {
        Quirks(0)
    }

    pub const fn all() -> Self {
        Quirks(Self::ALL_BITS)
    }

    pub const fn contains(&self, other: Quirks) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Quirks) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Quirks) {
        self.0 &= !other.0;
    }

    pub fn set(&mut self, other: Quirks, value: bool) {
        if value {
            self.insert(other)
        } else {
            self.remove(other)
        }
    }
}

impl BitOr for Quirks {
    type Output = Quirks;

    fn bitor(self, rhs: Quirks) -> Quirks {
        Quirks(self.0 | rhs.0)
    }
}

impl BitOrAssign for Quirks {
    fn bitor_assign(&mut self, rhs: Quirks) {
        self.insert(rhs)
    }
}

impl fmt::Debug for Quirks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Quirks::SHIFT_INPLACE, "SHIFT_INPLACE"),
            (Quirks::JUMP_VX_OFFSET, "JUMP_VX_OFFSET"),
            (Quirks::FX1E_OVERFLOW, "FX1E_OVERFLOW"),
            (Quirks::FX55_FX65_INC_I, "FX55_FX65_INC_I"),
        ];
        let set: Vec<&str> = names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "Quirks({})", set.join(" | "))
    }
}

/// Where the key-press instructions (EX9E, EXA1, FX0A) get their key from
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyMode {
    /// The last key the host pushed with `key_press`
    UseGivenKey,
    /// Ask the machine's `Keypad`
    GetKey,
}

/// # Config
/// Sizing, memory layout and instruction behavior for a single machine.
///
/// A machine clones its config when it's created; changing the original
/// afterwards has no effect on a running machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub memory_size: usize,
    pub stack_size: usize,
    pub display_width: usize,
    pub display_height: usize,
    pub font_address: u16,
    pub program_address: u16,
    pub key_mode: KeyMode,
    pub quirks: Quirks,
    /// CPU cycles per timer decrement; 0 means the timers never tick.
    /// Only read by hosts, `step` never touches the timers.
    pub timer_clock: u16,
}

impl Config {
    /// The standard machine with the 128x64 SUPER-CHIP display
    pub fn superchip() -> Self {
        Config {
            display_width: SUPERCHIP_DISPLAY_WIDTH,
            display_height: SUPERCHIP_DISPLAY_HEIGHT,
            ..Config::default()
        }
    }

    /// Checks that every size is non-zero and every address lands in memory
    pub fn validate(&self) -> Result<()> {
        if self.memory_size == 0 || self.memory_size > MAX_MEMORY_SIZE {
            return Err(Error::InvalidConfig(format!(
                "memory size must be between 1 and {:#X} bytes, got {}",
                MAX_MEMORY_SIZE, self.memory_size
            )));
        }
        if self.stack_size == 0 {
            return Err(Error::InvalidConfig("stack size must be non-zero".into()));
        }
        if self.display_width == 0 || self.display_height == 0 {
            return Err(Error::InvalidConfig(format!(
                "display must be non-empty, got {}x{}",
                self.display_width, self.display_height
            )));
        }
        // an instruction is two bytes; the program needs room for at least one
        if usize::from(self.program_address) + 1 >= self.memory_size {
            return Err(Error::InvalidConfig(format!(
                "program address {:#06X} is outside of {} bytes of memory",
                self.program_address, self.memory_size
            )));
        }
        if usize::from(self.font_address) + FONT.len() > self.memory_size {
            return Err(Error::InvalidConfig(format!(
                "font at {:#06X} doesn't fit in {} bytes of memory",
                self.font_address, self.memory_size
            )));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            memory_size: MEMORY_SIZE,
            stack_size: STACK_SIZE,
            display_width: DISPLAY_WIDTH,
            display_height: DISPLAY_HEIGHT,
            font_address: FONT_ADDRESS,
            program_address: PROGRAM_ADDRESS,
            key_mode: KeyMode::UseGivenKey,
            quirks: Quirks::FX1E_OVERFLOW,
            timer_clock: CPU_CYCLES_PER_TIMER_CYCLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
        assert!(Config::superchip().validate().is_ok());
    }

    #[test]
    fn test_default_quirks() {
        let config = Config::default();
        assert!(config.quirks.contains(Quirks::FX1E_OVERFLOW));
        assert!(!config.quirks.contains(Quirks::SHIFT_INPLACE));
        assert_eq!(config.quirks, Quirks::FX1E_OVERFLOW);
    }

    #[test]
    fn test_quirks_compose() {
        let mut quirks = Quirks::SHIFT_INPLACE | Quirks::JUMP_VX_OFFSET;
        assert!(quirks.contains(Quirks::SHIFT_INPLACE) && quirks.contains(Quirks::JUMP_VX_OFFSET));
        quirks.remove(Quirks::SHIFT_INPLACE);
        assert_eq!(quirks, Quirks::JUMP_VX_OFFSET);
        quirks.set(Quirks::FX55_FX65_INC_I, true);
        assert!(quirks.contains(Quirks::FX55_FX65_INC_I));
    }

    #[test]
    fn test_quirks_debug() {
        let quirks = Quirks::SHIFT_INPLACE | Quirks::FX1E_OVERFLOW;
        assert_eq!(format!("{:?}", quirks), "Quirks(SHIFT_INPLACE | FX1E_OVERFLOW)");
    }

    #[test]
    fn test_rejects_empty_memory() {
        let config = Config {
            memory_size: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_oversized_memory() {
        let config = Config {
            memory_size: MAX_MEMORY_SIZE + 1,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_empty_stack() {
        let config = Config {
            stack_size: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_empty_display() {
        let config = Config {
            display_height: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_program_outside_memory() {
        let config = Config {
            memory_size: 0x200,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_font_outside_memory() {
        let config = Config {
            font_address: 0xFF0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }
}
