use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use emu8_core::{Config, KeyMode, Quirks, CLOCK_SPEED};

mod input;
mod keymap;
mod run;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum KeyModeArg {
    /// Key instructions see the last key pressed in the window
    Given,
    /// Key instructions query the keyboard themselves, FX0A blocks
    Get,
}

impl From<KeyModeArg> for KeyMode {
    fn from(arg: KeyModeArg) -> Self {
        match arg {
            KeyModeArg::Given => KeyMode::UseGivenKey,
            KeyModeArg::Get => KeyMode::GetKey,
        }
    }
}

/// Runs a Chip-8 ROM.
///
/// Keypad is the left 4 columns of the keyboard (1234/QWER/ASDF/ZXCV).
/// Hold Space to fast forward and Escape to rewind.
#[derive(Parser, Debug)]
#[command(name = "chip8", version, about)]
struct Args {
    /// Path to the ROM to run
    rom: PathBuf,

    /// Size multiplier for each pixel
    #[arg(long, default_value_t = 10)]
    scale: usize,

    /// Nanoseconds per CPU cycle
    #[arg(long, default_value_t = CLOCK_SPEED)]
    clock_speed: u64,

    /// CPU cycles per timer decrement, 0 to freeze the timers
    #[arg(long)]
    timer_clock: Option<u16>,

    /// Where key instructions get their key from
    #[arg(long, value_enum, default_value_t = KeyModeArg::Given)]
    key_mode: KeyModeArg,

    /// 8XY6/8XYE shift VX in place instead of copying VY first
    #[arg(long)]
    shift_inplace: bool,

    /// BNNN jumps to NNN + VX rather than NNN + V0
    #[arg(long)]
    jump_vx_offset: bool,

    /// FX1E leaves VF alone
    #[arg(long)]
    no_fx1e_overflow: bool,

    /// FX55/FX65 move I past the registers they copy
    #[arg(long)]
    fx55_fx65_inc_i: bool,

    /// Use a 128x64 display
    #[arg(long)]
    superchip: bool,
}

impl Args {
    fn config(&self) -> Config {
        let mut config = if self.superchip {
            Config::superchip()
        } else {
            Config::default()
        };
        config.key_mode = self.key_mode.into();
        config.quirks.set(Quirks::SHIFT_INPLACE, self.shift_inplace);
        config.quirks.set(Quirks::JUMP_VX_OFFSET, self.jump_vx_offset);
        config.quirks.set(Quirks::FX1E_OVERFLOW, !self.no_fx1e_overflow);
        config
            .quirks
            .set(Quirks::FX55_FX65_INC_I, self.fx55_fx65_inc_i);
        if let Some(timer_clock) = self.timer_clock {
            config.timer_clock = timer_clock;
        }
        config
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let options = run::Options {
        clock_speed: args.clock_speed,
        scale: args.scale,
    };
    run::run(&args.rom, &args.config(), &options)
}
