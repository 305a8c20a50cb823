//! Fixed-capacity digit buffer backing the PIN keypad. The buffer only ever
//! holds decimal digits; keypad placeholders and other symbols are rejected
//! before they reach it. Its `Debug` output never includes the digits.

use super::error::KeyError;
use secrecy::SecretString;
use std::fmt;

/// Number of digits in a PIN.
pub const PIN_LENGTH: usize = 4;

/// A single decimal digit.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Digit(u8);

impl Digit {
    #[must_use]
    pub fn new(value: u8) -> Option<Self> {
        (value <= 9).then_some(Self(value))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    fn as_char(self) -> char {
        char::from(b'0' + self.0)
    }
}

impl fmt::Debug for Digit {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Digit(*)")
    }
}

impl TryFrom<char> for Digit {
    type Error = KeyError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        value
            .to_digit(10)
            .and_then(|digit| u8::try_from(digit).ok())
            .and_then(Self::new)
            .ok_or(KeyError::Unsupported(value))
    }
}

/// A keypad press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Digit(Digit),
    RemoveLast,
}

impl TryFrom<char> for Key {
    type Error = KeyError;

    /// `-`, `<`, backspace and delete map to [`Key::RemoveLast`].
    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '-' | '<' | '\u{8}' | '\u{7f}' => Ok(Self::RemoveLast),
            _ => Digit::try_from(value).map(Self::Digit),
        }
    }
}

/// Ordered PIN digits, at most [`PIN_LENGTH`] of them.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PinBuffer {
    slots: [Option<Digit>; PIN_LENGTH],
}

impl PinBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills the first empty slot and returns the new length.
    /// Ignored once the buffer is complete.
    pub fn append_digit(&mut self, digit: Digit) -> usize {
        if let Some(slot) = self.slots.iter_mut().find(|slot| slot.is_none()) {
            *slot = Some(digit);
        }
        self.len()
    }

    /// Clears the highest filled slot and returns the new length.
    pub fn remove_last(&mut self) -> usize {
        if let Some(slot) = self.slots.iter_mut().rev().find(|slot| slot.is_some()) {
            *slot = None;
        }
        self.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.len() == PIN_LENGTH
    }

    pub fn reset(&mut self) {
        self.slots = [None; PIN_LENGTH];
    }

    /// The collected code, only once the buffer is complete.
    #[must_use]
    pub fn code(&self) -> Option<SecretString> {
        if !self.is_complete() {
            return None;
        }
        let code: String = self.slots.iter().flatten().map(|digit| digit.as_char()).collect();
        Some(SecretString::from(code))
    }

    /// Masked rendering such as `**__`, safe to display.
    #[must_use]
    pub fn mask(&self) -> String {
        self.slots
            .iter()
            .map(|slot| if slot.is_some() { '*' } else { '_' })
            .collect()
    }
}

impl fmt::Debug for PinBuffer {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PinBuffer")
            .field("len", &self.len())
            .finish()
    }
}
