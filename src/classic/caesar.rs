// Caesar (shift) cipher.
use crate::{Error, Result};

/// A shift that callers have checked lies in `0..=25`.
///
/// The cipher functions themselves take any integer and reduce it modulo 26;
/// this type is for the layers that must reject out-of-range input instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift(u8);

impl Shift {
    pub fn new(shift: i64) -> Result<Self> {
        if (0..26).contains(&shift) {
            Ok(Self(shift as u8))
        } else {
            Err(Error::InvalidShift(shift))
        }
    }

    pub fn value(self) -> i64 {
        self.0 as i64
    }
}

pub fn caesar_encrypt(text: &str, shift: i64) -> String {
    let shift = shift.rem_euclid(26);
    text.chars().map(|c| shift_char(c, shift)).collect()
}

pub fn caesar_decrypt(text: &str, shift: i64) -> String {
    caesar_encrypt(text, 26 - shift.rem_euclid(26))
}

/// Rotate an ASCII letter within its own case. Anything else is returned as is.
pub(crate) fn shift_char(c: char, shift: i64) -> char {
    let base = if c.is_ascii_uppercase() {
        b'A'
    } else if c.is_ascii_lowercase() {
        b'a'
    } else {
        return c;
    };
    let offset = (c as u8 - base) as i64;
    (base + ((offset + shift.rem_euclid(26)) % 26) as u8) as char
}
