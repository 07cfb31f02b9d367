pub mod caesar;
pub mod playfair;
pub mod vigenere;

pub use caesar::{caesar_decrypt, caesar_encrypt, Shift};
pub use playfair::{playfair_decrypt, playfair_encrypt, PlayfairKey};
pub use vigenere::{vigenere_decrypt, vigenere_encrypt, VigenereKey};

/// A key for one of the classical cipher families.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassicalKey {
    Shift(Shift),
    Vigenere(VigenereKey),
    Playfair(PlayfairKey),
}

impl ClassicalKey {
    pub fn encrypt(&self, text: &str) -> String {
        match self {
            ClassicalKey::Shift(shift) => caesar_encrypt(text, shift.value()),
            ClassicalKey::Vigenere(key) => key.encrypt(text),
            ClassicalKey::Playfair(key) => key.encrypt(text),
        }
    }

    pub fn decrypt(&self, text: &str) -> String {
        match self {
            ClassicalKey::Shift(shift) => caesar_decrypt(text, shift.value()),
            ClassicalKey::Vigenere(key) => key.decrypt(text),
            ClassicalKey::Playfair(key) => key.decrypt(text),
        }
    }
}
