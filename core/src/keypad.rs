use std::collections::VecDeque;

/// # Keypad
/// The host's key input, consulted by EX9E, EXA1 and FX0A when the machine
/// runs with `KeyMode::GetKey`.
///
/// Keys are the 16 hexadecimal keypad values 0x0..=0xF.
pub trait Keypad {
    /// The key currently held down, if any. Must not block.
    fn poll(&mut self) -> Option<u8>;

    /// Blocks until a key is pressed and returns it.
    /// `None` means the host gave up waiting (e.g. the window was closed).
    fn wait(&mut self) -> Option<u8>;
}

/// A keypad nobody is touching
#[derive(Copy, Clone, Debug, Default)]
pub struct NullKeypad;

impl Keypad for NullKeypad {
    fn poll(&mut self) -> Option<u8> {
        None
    }

    fn wait(&mut self) -> Option<u8> {
        None
    }
}

/// A keypad that replays a fixed sequence of key presses
///
/// Each `poll` or `wait` consumes the next key; once the script runs out no
/// key is pressed and waits are cancelled.
#[derive(Clone, Debug, Default)]
pub struct ScriptedKeypad {
    keys: VecDeque<Option<u8>>,
}

impl ScriptedKeypad {
    /// # Arguments
    /// * `keys` what each successive query sees; `None` for no key
    pub fn new(keys: &[Option<u8>]) -> Self {
        ScriptedKeypad {
            keys: keys.iter().copied().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl Keypad for ScriptedKeypad {
    fn poll(&mut self) -> Option<u8> {
        self.keys.pop_front().flatten()
    }

    fn wait(&mut self) -> Option<u8> {
        // skip over moments where nothing was held, as a real wait would
        while let Some(key) = self.keys.pop_front() {
            if key.is_some() {
                return key;
            }
        }
        None
    }
}

impl<K: Keypad + ?Sized> Keypad for Box<K> {
    fn poll(&mut self) -> Option<u8> {
        (**self).poll()
    }

    fn wait(&mut self) -> Option<u8> {
        (**self).wait()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_keypad_never_has_a_key() {
        let mut keypad = NullKeypad;
        assert_eq!(keypad.poll(), None);
        assert_eq!(keypad.wait(), None);
    }

    #[test]
    fn test_scripted_keypad_polls_in_order() {
        let mut keypad = ScriptedKeypad::new(&[Some(0x1), None, Some(0xA)]);
        assert_eq!(keypad.poll(), Some(0x1));
        assert_eq!(keypad.poll(), None);
        assert_eq!(keypad.poll(), Some(0xA));
        assert_eq!(keypad.poll(), None);
    }

    #[test]
    fn test_scripted_keypad_waits_past_gaps() {
        let mut keypad = ScriptedKeypad::new(&[None, None, Some(0x7), Some(0x8)]);
        assert_eq!(keypad.wait(), Some(0x7));
        assert_eq!(keypad.remaining(), 1);
    }

    #[test]
    fn test_scripted_keypad_wait_cancels_when_exhausted() {
        let mut keypad = ScriptedKeypad::new(&[None]);
        assert_eq!(keypad.wait(), None);
    }
}
