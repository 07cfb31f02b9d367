// Playfair (5x5 digraph) cipher.
//
// The key square holds 25 letters: 'J' never appears and is folded into 'I'
// everywhere. Encryption normalises the plaintext into digraphs first, but
// decryption trusts its input to already be paired ciphertext. A trailing
// unpaired character is dropped and any pair containing a character missing
// from the square is skipped rather than rejected.

const GRID_ALPHABET: &str = "ABCDEFGHIKLMNOPQRSTUVWXYZ";
const FILLER: char = 'X';

type Grid = [[char; 5]; 5];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayfairKey {
    grid: Option<Grid>,
}

impl PlayfairKey {
    /// Build the key square. An empty keyword yields a key that leaves text
    /// untouched in both directions.
    pub fn new(keyword: &str) -> Self {
        if keyword.is_empty() {
            return Self { grid: None };
        }

        let mut letters: Vec<char> = Vec::with_capacity(25);
        let keyword = keyword.to_uppercase().replace('J', "I");
        for c in keyword.chars().chain(GRID_ALPHABET.chars()) {
            if c.is_ascii_alphabetic() && !letters.contains(&c) {
                letters.push(c);
            }
        }

        let mut grid = [[' '; 5]; 5];
        for (i, c) in letters.into_iter().enumerate() {
            grid[i / 5][i % 5] = c;
        }
        Self { grid: Some(grid) }
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn encrypt(&self, text: &str) -> String {
        let Some(grid) = &self.grid else {
            return text.to_string();
        };
        let prepared = prepare_plaintext(text);
        let mut result = String::with_capacity(prepared.len());
        for pair in prepared.chunks(2) {
            // Preparation only emits letters from the square.
            if let (Some(a), Some(b)) = (position(grid, pair[0]), position(grid, pair[1])) {
                let (x, y) = substitute(grid, a, b, 1);
                result.push(x);
                result.push(y);
            }
        }
        result
    }

    pub fn decrypt(&self, text: &str) -> String {
        let Some(grid) = &self.grid else {
            return text.to_string();
        };
        let chars: Vec<char> = text
            .to_uppercase()
            .replace('J', "I")
            .replace(' ', "")
            .chars()
            .collect();
        if chars.len() % 2 != 0 {
            tracing::debug!(
                "dropping trailing unpaired character from {} character ciphertext",
                chars.len()
            );
        }

        let mut result = String::with_capacity(chars.len());
        for pair in chars.chunks_exact(2) {
            match (position(grid, pair[0]), position(grid, pair[1])) {
                (Some(a), Some(b)) => {
                    let (x, y) = substitute(grid, a, b, 4);
                    result.push(x);
                    result.push(y);
                }
                _ => tracing::debug!("skipping digraph {}{} not in key square", pair[0], pair[1]),
            }
        }
        result
    }
}

pub fn playfair_encrypt(text: &str, keyword: &str) -> String {
    PlayfairKey::new(keyword).encrypt(text)
}

pub fn playfair_decrypt(text: &str, keyword: &str) -> String {
    PlayfairKey::new(keyword).decrypt(text)
}

/// Uppercase, fold 'J' into 'I', keep letters only and split into digraphs.
/// A pair of identical letters is broken up with an 'X' and an odd-length
/// result is padded with a final 'X'.
fn prepare_plaintext(text: &str) -> Vec<char> {
    let letters: Vec<char> = text
        .to_uppercase()
        .replace('J', "I")
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect();

    let mut prepared = Vec::with_capacity(letters.len() + letters.len() / 2 + 1);
    let mut i = 0;
    while i < letters.len() {
        let first = letters[i];
        prepared.push(first);
        match letters.get(i + 1) {
            Some(&second) if second == first => {
                prepared.push(FILLER);
                i += 1;
            }
            Some(&second) => {
                prepared.push(second);
                i += 2;
            }
            None => i += 1,
        }
    }
    if prepared.len() % 2 != 0 {
        prepared.push(FILLER);
    }
    prepared
}

fn position(grid: &Grid, c: char) -> Option<(usize, usize)> {
    grid.iter()
        .enumerate()
        .find_map(|(row, cells)| cells.iter().position(|&x| x == c).map(|col| (row, col)))
}

/// Apply the Playfair rules to one digraph. `step` is 1 to encrypt and 4
/// (i.e. -1 mod 5) to decrypt; the rectangle rule is its own inverse.
fn substitute(grid: &Grid, a: (usize, usize), b: (usize, usize), step: usize) -> (char, char) {
    let ((r1, c1), (r2, c2)) = (a, b);
    if r1 == r2 {
        (grid[r1][(c1 + step) % 5], grid[r2][(c2 + step) % 5])
    } else if c1 == c2 {
        (grid[(r1 + step) % 5][c1], grid[(r2 + step) % 5][c2])
    } else {
        (grid[r1][c2], grid[r2][c1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[test]
    fn key_square_removes_duplicates_and_folds_j() {
        let key = PlayfairKey::new("Playfair example");

        let grid = key.grid().unwrap();
        assert_eq!(grid[0], ['P', 'L', 'A', 'Y', 'F']);
        assert_eq!(grid[1], ['I', 'R', 'E', 'X', 'M']);
        assert_eq!(grid[2], ['B', 'C', 'D', 'G', 'H']);
        assert_eq!(grid[3], ['K', 'N', 'O', 'Q', 'S']);
        assert_eq!(grid[4], ['T', 'U', 'V', 'W', 'Z']);
        assert!(!grid.iter().flatten().any(|&c| c == 'J'));
    }

    #[test]
    fn encrypt_matches_textbook_example() {
        let ciphertext = playfair_encrypt("Hide the gold in the tree stump", "PLAYFAIREXAMPLE");

        assert_eq!(ciphertext, "BMODZBXDNABEKUDMUIXMMOUVIF");
    }

    #[test]
    fn decrypt_returns_prepared_plaintext() {
        let plaintext = playfair_decrypt("BMODZBXDNABEKUDMUIXMMOUVIF", "PLAYFAIREXAMPLE");

        assert_eq!(plaintext, "HIDETHEGOLDINTHETREXESTUMP");
    }

    #[rstest]
    #[case("ATTACKATDAWN", "MONARCHY")]
    #[case("HIDEGOLD", "KEYWORD")]
    #[case("CRYPTOGRAPHY", "SECRETO")]
    fn decrypt_inverts_encrypt_for_clean_digraphs(#[case] text: &str, #[case] keyword: &str) {
        let ciphertext = playfair_encrypt(text, keyword);

        assert_eq!(playfair_decrypt(&ciphertext, keyword), text);
    }

    #[rstest]
    #[case("BALLOON", "BALXLOON")]
    #[case("HELLO", "HELXLO")]
    #[case("HELLOO", "HELXLOOX")]
    #[case("jump", "IUMP")]
    #[case("a b,c", "ABCX")]
    fn preparation_inserts_fillers(#[case] text: &str, #[case] expected: &str) {
        let prepared: String = prepare_plaintext(text).into_iter().collect();

        assert_eq!(prepared, expected);
    }

    #[test]
    fn empty_key_is_identity() {
        assert_eq!(playfair_encrypt("hello world", ""), "hello world");
        assert_eq!(playfair_decrypt("hello world", ""), "hello world");
    }

    #[test]
    fn decrypt_drops_trailing_unpaired_character() {
        let ciphertext = playfair_encrypt("ATTACK", "MONARCHY");

        let plaintext = playfair_decrypt(&format!("{ciphertext}Q"), "MONARCHY");

        assert_eq!(plaintext, "ATTACK");
    }

    #[test]
    fn decrypt_skips_digraphs_with_unknown_characters() {
        let ciphertext = playfair_encrypt("ATTACK", "MONARCHY");

        let plaintext = playfair_decrypt(&format!("1!{ciphertext}"), "MONARCHY");

        assert_eq!(plaintext, "ATTACK");
    }
}
