// Vigenère (polyalphabetic shift) cipher.
use super::caesar::shift_char;
use crate::{Error, Result};

/// An uppercased Vigenère key stored as one shift per letter.
///
/// An empty key is valid and turns both directions into the identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VigenereKey {
    shifts: Vec<u8>,
}

impl VigenereKey {
    pub fn new(key: &str) -> Result<Self> {
        let shifts = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphabetic() {
                    Ok(c.to_ascii_uppercase() as u8 - b'A')
                } else {
                    Err(Error::InvalidKey(format!(
                        "Vigenère keys may only contain letters, found '{c}'"
                    )))
                }
            })
            .collect::<Result<Vec<u8>>>()?;
        Ok(Self { shifts })
    }

    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    pub fn as_string(&self) -> String {
        self.shifts.iter().map(|s| (b'A' + s) as char).collect()
    }

    pub fn encrypt(&self, text: &str) -> String {
        self.apply(text, 1)
    }

    pub fn decrypt(&self, text: &str) -> String {
        self.apply(text, -1)
    }

    fn apply(&self, text: &str, direction: i64) -> String {
        if self.shifts.is_empty() {
            return text.to_string();
        }
        // Only letters advance through the key.
        let mut key_stream = self.shifts.iter().cycle();
        text.chars()
            .map(|c| {
                if c.is_ascii_alphabetic() {
                    let shift = key_stream.next().copied().unwrap_or_default() as i64;
                    shift_char(c, direction * shift)
                } else {
                    c
                }
            })
            .collect()
    }
}

pub fn vigenere_encrypt(text: &str, key: &VigenereKey) -> String {
    key.encrypt(text)
}

pub fn vigenere_decrypt(text: &str, key: &VigenereKey) -> String {
    key.decrypt(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn key(k: &str) -> VigenereKey {
        VigenereKey::new(k).unwrap()
    }

    #[test]
    fn encrypt_matches_textbook_example() {
        assert_eq!(
            vigenere_encrypt("ATTACKATDAWN", &key("LEMON")),
            "LXFOPVEFRNHR"
        );
    }

    #[test]
    fn key_is_case_insensitive() {
        assert_eq!(
            vigenere_encrypt("ATTACKATDAWN", &key("lemon")),
            "LXFOPVEFRNHR"
        );
        assert_eq!(key("lemon").as_string(), "LEMON");
    }

    #[test]
    fn punctuation_does_not_consume_key_letters() {
        let ciphertext = vigenere_encrypt("Attack, at dawn!", &key("LEMON"));

        assert_eq!(ciphertext, "Lxfopv, ef rnhr!");
    }

    #[test]
    fn empty_key_is_identity() {
        let empty = key("");

        assert!(empty.is_empty());
        assert_eq!(vigenere_encrypt("Hola Mundo", &empty), "Hola Mundo");
        assert_eq!(vigenere_decrypt("Hola Mundo", &empty), "Hola Mundo");
    }

    #[rstest]
    #[case("A")]
    #[case("LEMON")]
    #[case("Clave")]
    #[case("zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz")]
    fn decrypt_inverts_encrypt(#[case] k: &str) {
        let text = "En un lugar de la Mancha, de cuyo nombre no quiero acordarme... 1605!";

        let ciphertext = vigenere_encrypt(text, &key(k));

        assert_eq!(vigenere_decrypt(&ciphertext, &key(k)), text);
    }

    #[rstest]
    #[case("LE MON")]
    #[case("KEY1")]
    #[case("AÑO")]
    fn key_rejects_non_letters(#[case] k: &str) {
        assert!(matches!(VigenereKey::new(k), Err(Error::InvalidKey(_))));
    }
}
