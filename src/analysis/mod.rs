pub mod caesar;
pub mod vigenere;

pub use caesar::{caesar_attack, CaesarCandidate};
pub use vigenere::{
    estimate_vigenere_key, index_of_coincidence, vigenere_key_length, KeyLengthEstimate,
    DEFAULT_MAX_KEY_LENGTH, TARGET_IC,
};
