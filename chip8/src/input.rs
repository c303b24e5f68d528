use std::cell::RefCell;
use std::rc::Rc;

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::EventPump;

use emu8_core::Keypad;

use crate::keymap::keymap;

/// A keypad key going down or coming up
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyChange {
    Pressed(u8),
    Released(u8),
}

/// # Input
/// Owns the SDL event pump and tracks:
/// - which keypad keys are held
/// - the emulator controls (quit, fast forward, rewind)
pub struct Input {
    events: EventPump,
    held: [bool; 16],
    pub quit: bool,
    /// Whether or not the default clock speed should be respected
    pub fast_forward: bool,
    /// Whether the game's state should be cycled forwards or backwards
    pub rewind: bool,
}

impl Input {
    pub fn new(events: EventPump) -> Self {
        Input {
            events,
            held: [false; 16],
            quit: false,
            fast_forward: false,
            rewind: false,
        }
    }

    /// Drains pending events, returning the keypad changes among them
    pub fn poll_events(&mut self) -> Vec<KeyChange> {
        let events: Vec<Event> = self.events.poll_iter().collect();
        events
            .into_iter()
            .filter_map(|event| self.handle(event))
            .collect()
    }

    /// The lowest keypad key currently held down
    pub fn held_key(&self) -> Option<u8> {
        self.held.iter().position(|&held| held).map(|key| key as u8)
    }

    /// Blocks until a keypad key is pressed; gives up if the window closes
    fn wait_key(&mut self) -> Option<u8> {
        while !self.quit {
            let event = self.events.wait_event();
            if let Some(KeyChange::Pressed(key)) = self.handle(event) {
                return Some(key);
            }
        }
        None
    }

    fn handle(&mut self, event: Event) -> Option<KeyChange> {
        match event {
            Event::Quit { .. } => {
                self.quit = true;
                None
            }
            Event::KeyDown {
                keycode: Some(key), ..
            } => match (key, keymap(key)) {
                (_, Some(kc)) => {
                    self.held[kc as usize] = true;
                    Some(KeyChange::Pressed(kc))
                }
                (Keycode::Space, _) => {
                    self.fast_forward = true;
                    None
                }
                (Keycode::Escape, _) => {
                    self.rewind = true;
                    None
                }
                _ => None,
            },
            Event::KeyUp {
                keycode: Some(key), ..
            } => match (key, keymap(key)) {
                (_, Some(kc)) => {
                    self.held[kc as usize] = false;
                    Some(KeyChange::Released(kc))
                }
                (Keycode::Space, _) => {
                    self.fast_forward = false;
                    None
                }
                (Keycode::Escape, _) => {
                    self.rewind = false;
                    None
                }
                _ => None,
            },
            _ => None,
        }
    }
}

/// Hands the window's keyboard to the machine for `KeyMode::GetKey`
pub struct SharedInput(pub Rc<RefCell<Input>>);

impl Keypad for SharedInput {
    fn poll(&mut self) -> Option<u8> {
        let mut input = self.0.borrow_mut();
        input.poll_events();
        input.held_key()
    }

    fn wait(&mut self) -> Option<u8> {
        self.0.borrow_mut().wait_key()
    }
}
