use crate::config::Config;
use crate::error::{Error, Result};

/// A snapshot of the Chip-8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) the number of return addresses on the stack
///
/// Timers
/// - 2 8-bit timers (delay & sound)
/// - only the host decrements them
///
/// ## Memory
/// Every buffer is sized by the `Config` the state was built from.
/// - stack of return addresses
/// - addressable memory holding the font, the program and scratch data
/// - width x height byte frame buffer, row-major, one byte (0 or 1) per pixel
///
/// ## Input
/// - the last key the host pushed, if any
#[derive(Clone, Debug)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: usize,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: Vec<u16>,
    pub memory: Vec<u8>,
    pub frame_buffer: Vec<u8>,
    pub draw_flag: bool,
    pub key: Option<u8>,
    config: Config,
}

impl State {
    /// Builds a zeroed state laid out according to `config`.
    ///
    /// # Arguments
    /// * `config` sizes and addresses for the machine; it's copied into the state
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let display_size = config
            .display_width
            .checked_mul(config.display_height)
            .ok_or(Error::AllocationFailure {
                buffer: "display",
                size: usize::MAX,
            })?;

        Ok(State {
            v: [0; 16],
            i: 0,
            pc: config.program_address,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: zeroed("stack", config.stack_size)?,
            memory: zeroed("memory", config.memory_size)?,
            frame_buffer: zeroed("display", display_size)?,
            draw_flag: false,
            key: None,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn width(&self) -> usize {
        self.config.display_width
    }

    pub fn height(&self) -> usize {
        self.config.display_height
    }

    /// The pixel at column x, row y
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.frame_buffer[y * self.width() + x]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, value: u8) {
        let width = self.width();
        self.frame_buffer[y * width + x] = value;
    }

    /// Checks that `len` bytes starting at `address` are all in memory
    pub fn check_range(&self, address: usize, len: usize) -> Result<()> {
        match address.checked_add(len) {
            Some(end) if end <= self.memory.len() => Ok(()),
            _ => Err(Error::OutOfBounds {
                address: address.max(self.memory.len()),
            }),
        }
    }

    /// Bounds-checked view of `len` bytes of memory starting at `address`
    pub fn memory_range(&self, address: usize, len: usize) -> Result<&[u8]> {
        self.check_range(address, len)?;
        Ok(&self.memory[address..address + len])
    }

    /// Bounds-checked mutable view of `len` bytes of memory starting at `address`
    pub fn memory_range_mut(&mut self, address: usize, len: usize) -> Result<&mut [u8]> {
        self.check_range(address, len)?;
        Ok(&mut self.memory[address..address + len])
    }
}

/// Allocates a zeroed buffer, reporting failure instead of aborting
fn zeroed<T: Clone + Default>(buffer: &'static str, size: usize) -> Result<Vec<T>> {
    let mut vec = Vec::new();
    vec.try_reserve_exact(size)
        .map_err(|_| Error::AllocationFailure { buffer, size })?;
    vec.resize(size, T::default());
    Ok(vec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Quirks;

    #[test]
    fn test_state_is_zeroed() {
        let state = State::new(&Config::default()).unwrap();
        assert_eq!(state.pc, 0x200);
        assert_eq!(state.i, 0);
        assert_eq!(state.sp, 0);
        assert_eq!(state.v, [0; 16]);
        assert_eq!(state.key, None);
        assert_eq!(state.memory.len(), 4096);
        assert!(state.memory.iter().all(|&b| b == 0));
        assert_eq!(state.stack.len(), 64);
        assert_eq!(state.frame_buffer.len(), 64 * 32);
        assert!(state.frame_buffer.iter().all(|&p| p == 0));
    }

    #[test]
    fn test_state_copies_config() {
        let mut config = Config::default();
        let state = State::new(&config).unwrap();
        config.quirks = Quirks::all();
        config.program_address = 0x300;
        assert_eq!(state.config().quirks, Quirks::FX1E_OVERFLOW);
        assert_eq!(state.config().program_address, 0x200);
    }

    #[test]
    fn test_state_rejects_invalid_config() {
        let config = Config {
            display_width: 0,
            ..Config::default()
        };
        assert!(matches!(State::new(&config), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_state_reports_allocation_failure() {
        let config = Config {
            display_width: usize::MAX,
            display_height: 2,
            ..Config::default()
        };
        assert!(matches!(
            State::new(&config),
            Err(Error::AllocationFailure {
                buffer: "display",
                ..
            })
        ));
    }

    #[test]
    fn test_pixels_are_row_major() {
        let mut state = State::new(&Config::default()).unwrap();
        state.set_pixel(3, 2, 1);
        assert_eq!(state.frame_buffer[2 * 64 + 3], 1);
        assert_eq!(state.pixel(3, 2), 1);
    }

    #[test]
    fn test_memory_range_bounds() {
        let state = State::new(&Config::default()).unwrap();
        assert_eq!(state.memory_range(0xFFD, 3).unwrap().len(), 3);
        assert!(matches!(
            state.memory_range(0xFFE, 3),
            Err(Error::OutOfBounds { address: 0x1000 })
        ));
        assert!(matches!(
            state.memory_range(0x2000, 1),
            Err(Error::OutOfBounds { address: 0x2000 })
        ));
    }
}
