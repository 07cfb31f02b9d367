pub mod analysis;
pub mod classic;
pub mod config;
mod error;
pub mod frequency;
pub mod primitives;
pub mod stats;
pub mod strength;

pub use error::{Error, Result};

pub use analysis::{caesar_attack, estimate_vigenere_key, vigenere_key_length};
pub use analysis::{CaesarCandidate, KeyLengthEstimate};
pub use classic::{caesar_decrypt, caesar_encrypt, Shift};
pub use classic::{playfair_decrypt, playfair_encrypt, PlayfairKey};
pub use classic::{vigenere_decrypt, vigenere_encrypt, VigenereKey};
pub use config::Config;
pub use frequency::{analyze, chi_squared, score_text, LetterFrequencies};
pub use primitives::{AesMode, AesPrimitive, RsaPadding, RsaPrimitive};
pub use primitives::{RustCryptoAes, RustCryptoRsa};
pub use strength::{audit_aes_implementation, audit_rsa_key, evaluate_aes, evaluate_rsa};
