//! # emu8_core
//! A Chip-8 virtual machine: configurable memory layout and quirks, a
//! fetch-decode-execute engine over the 35 standard instructions, and the
//! hooks a host needs to feed it programs, fonts and key presses.
//!
//! ```no_run
//! use emu8_core::{constants::FONT, Chip8, Config};
//!
//! let mut chip8 = Chip8::new(&Config::default())?;
//! chip8.load_font(&FONT)?;
//! chip8.load_rom_file("roms/pong.ch8")?;
//! loop {
//!     chip8.advance_cpu()?;
//! }
//! # Ok::<(), emu8_core::Error>(())
//! ```
pub use chip8::Chip8;
pub use config::{Config, KeyMode, Quirks};
pub use constants::CLOCK_SPEED;
pub use error::{Error, Result};
pub use instruction::Instruction;
pub use keypad::{Keypad, NullKeypad, ScriptedKeypad};
pub use opcode::Opcode;
pub use state::State;

mod chip8;
pub mod config;
pub mod constants;
mod error;
mod instruction;
mod keypad;
mod opcode;
mod operations;
pub mod state;
