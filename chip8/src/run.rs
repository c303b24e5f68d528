use std::cell::RefCell;
use std::error::Error;
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::{error, info};

use emu8_core::constants::FONT;
use emu8_core::{Chip8, Config};
use emu8_display::Display;

use crate::input::{Input, KeyChange, SharedInput};

/// Everything the run loop needs besides the machine's own config
pub struct Options {
    /// Nanoseconds per CPU cycle
    pub clock_speed: u64,
    /// Size multiplier for each pixel
    pub scale: usize,
}

pub fn run(rom: &Path, config: &Config, options: &Options) -> Result<(), Box<dyn Error>> {
    // Get SDL2 context
    let sdl: sdl2::Sdl = sdl2::init()?;
    let mut display = Display::new(
        &sdl,
        config.display_width,
        config.display_height,
        options.scale,
    )?;
    let input = Rc::new(RefCell::new(Input::new(sdl.event_pump()?)));

    let keypad = SharedInput(Rc::clone(&input));
    let mut chip8 = Chip8::with_keypad(config, Box::new(keypad))?;
    chip8.load_font(&FONT)?;
    chip8.load_rom_file(rom)?;
    info!("loaded {} with {:?}", rom.display(), config.quirks);

    // Set initial timing
    let cycle_time = Duration::from_nanos(options.clock_speed);
    let mut last_cycle: Instant = Instant::now();
    let mut cycles: u64 = 0;

    loop {
        // If the draw flag is set, unset it and render the current frame
        if let Some(frame) = chip8.get_frame() {
            display.render(frame)?;
        }

        // Handle input
        let changes = input.borrow_mut().poll_events();
        for change in changes {
            match change {
                KeyChange::Pressed(key) => chip8.key_press(key),
                KeyChange::Released(key) => chip8.key_release(key),
            }
        }
        let (quit, rewind, fast_forward) = {
            let input = input.borrow();
            (input.quit, input.rewind, input.fast_forward)
        };
        if quit {
            break;
        }

        // Update state
        if rewind {
            chip8.reverse_cpu();
        } else {
            if let Err(e) = chip8.advance_cpu() {
                if input.borrow().quit {
                    break;
                }
                error!("halting at {:04X}: {}", chip8.state().pc, e);
                return Err(e.into());
            }
            cycles += 1;
            if config.timer_clock > 0 && cycles % u64::from(config.timer_clock) == 0 {
                chip8.advance_timers();
            }
        }

        // Handle timing
        let current_time = Instant::now();
        let elapsed_cycle_time = current_time - last_cycle;
        if !fast_forward && cycle_time > elapsed_cycle_time {
            std::thread::sleep(cycle_time - elapsed_cycle_time);
        }
        last_cycle = Instant::now();
    }

    info!("quit after {} cycles", cycles);
    Ok(())
}
