use std::collections::VecDeque;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::constants::MAX_SAVED_STATES;
use crate::error::{Error, Result};
use crate::instruction::Instruction;
use crate::keypad::{Keypad, NullKeypad};
use crate::opcode::Opcode;
use crate::state::State;

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `previous_states` for rewinding
///  - the `keypad` consulted in `KeyMode::GetKey`
///  - the random number generator behind CXKK
///
/// Supplies interfaces for:
/// - loading roms and fonts
/// - pressing and releasing keys
/// - advancing and reversing the CPU
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
///
/// Timers are never touched by `advance_cpu`; the host calls `advance_timers`
/// at whatever rate it likes (usually every `Config::timer_clock` cycles).
pub struct Chip8 {
    state: State,
    previous_states: VecDeque<State>,
    keypad: Box<dyn Keypad>,
    rng: StdRng,
}

impl Chip8 {
    /// Builds a machine with no keypad and an entropy-seeded random source
    pub fn new(config: &Config) -> Result<Self> {
        Chip8::with_keypad(config, Box::new(NullKeypad))
    }

    /// Builds a machine whose GetKey-mode instructions query `keypad`
    pub fn with_keypad(config: &Config, keypad: Box<dyn Keypad>) -> Result<Self> {
        Ok(Chip8 {
            state: State::new(config)?,
            previous_states: VecDeque::with_capacity(MAX_SAVED_STATES),
            keypad,
            rng: StdRng::from_entropy(),
        })
    }

    /// Makes CXKK deterministic
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    pub fn config(&self) -> &Config {
        self.state.config()
    }

    /// Load a rom from a source file at the configured program address
    ///
    /// # Arguments
    /// * `reader` a reader that contains a ROM
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<()> {
        let mut rom = Vec::new();
        reader.read_to_end(&mut rom)?;

        let start = usize::from(self.config().program_address);
        let max = self.state.memory.len() - start;
        if rom.len() > max {
            return Err(Error::ProgramTooLarge {
                size: rom.len(),
                max,
            });
        }
        self.state.memory[start..start + rom.len()].copy_from_slice(&rom);
        debug!("loaded {} byte rom at {:#05X}", rom.len(), start);
        Ok(())
    }

    /// Load a rom from the file at `path`
    pub fn load_rom_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|source| Error::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_rom(&mut file)
    }

    /// Copy a font table into memory at the configured font address
    pub fn load_font(&mut self, font: &[u8]) -> Result<()> {
        let start = usize::from(self.config().font_address);
        let max = self.state.memory.len() - start;
        if font.len() > max {
            return Err(Error::FontTooLarge {
                size: font.len(),
                max,
            });
        }
        self.state.memory[start..start + font.len()].copy_from_slice(font);
        debug!("loaded {} byte font at {:#05X}", font.len(), start);
        Ok(())
    }

    /// Returns the FrameBuffer if the display should be redrawn
    pub fn get_frame(&mut self) -> Option<&[u8]> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    /// Set the currently pressed key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was pressed
    pub fn key_press(&mut self, key: u8) {
        self.state.key = Some(key);
    }

    /// Clear the pressed key if it's the one that was released
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) {
        if self.state.key == Some(key) {
            self.state.key = None;
        }
    }

    /// Advances the CPU by a single cycle
    /// - gets the next opcode and moves the pc past it
    /// - decodes and executes it
    ///
    /// A fault leaves the machine exactly as it was before the call.
    pub fn advance_cpu(&mut self) -> Result<Instruction> {
        let pc = self.state.pc;
        let op: u16 = self.get_op()?;
        let instruction = op.to_instruction();
        trace!(
            "{:04X} {:04X} {:<16} v{:02X?} i{:04X}",
            pc,
            op,
            instruction.to_string(),
            self.state.v,
            self.state.i
        );
        if instruction.is_unknown() {
            warn!("skipping unrecognised instruction {:04X} at {:04X}", op, pc);
        }

        let previous = self.state.clone();
        self.state.pc = pc.wrapping_add(0x2);
        match instruction.execute(&mut self.state, self.keypad.as_mut(), &mut self.rng) {
            Ok(()) => {
                self.save_state(previous);
                Ok(instruction)
            }
            Err(e) => {
                self.state.pc = pc;
                Err(e)
            }
        }
    }

    /// Reverses the CPU by a single cycle if possible
    /// - if there are previous_states, pops the last one and restores it
    pub fn reverse_cpu(&mut self) -> bool {
        match self.previous_states.pop_front() {
            Some(state) => {
                // the held key belongs to the host, not to the saved cycle
                let key = self.state.key;
                self.state = state;
                self.state.key = key;
                // whatever is on screen now is stale
                self.state.draw_flag = true;
                debug!("rewound to {:04X}", self.state.pc);
                true
            }
            None => false,
        }
    }

    /// Puts a state in previous_states
    /// - if there are already MAX_SAVED_STATES saved then the oldest is dropped
    fn save_state(&mut self, state: State) {
        if self.previous_states.len() == MAX_SAVED_STATES {
            self.previous_states.pop_back();
        }
        self.previous_states.push_front(state);
    }

    /// Decrements both timers by one, stopping at 0
    pub fn advance_timers(&mut self) {
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
    }

    /// Whether a beep should be playing
    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    fn get_op(&self) -> Result<u16> {
        let bytes = self.state.memory_range(usize::from(self.state.pc), 2)?;
        Ok(u16::from_bytes(bytes[0], bytes[1]))
    }
}
