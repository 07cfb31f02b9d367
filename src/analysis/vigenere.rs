// Break a Vigenère cipher in two steps: guess the key length, then recover
// the key one letter at a time.
//
// The key length is estimated with the Index of Coincidence (IC): the
// probability that two letters picked at random from a text are equal. For
// Spanish or English prose it is around 0.065-0.075, for uniformly random
// letters it is about 0.038. If we guess the right key length L and split the
// ciphertext into L interleaved streams (letter i goes to stream i mod L),
// each stream was produced by a single Caesar shift, so it keeps the IC of
// natural language. With the wrong length every stream mixes several shifts
// and its IC drops towards the random value.
//
// Once the length is known, each stream is just a Caesar cipher, which we
// brute force by picking the shift whose decryption scores best against the
// Spanish letter frequencies. The shift of each stream is one key letter.

use rayon::prelude::*;
use serde::Serialize;

use crate::{caesar_decrypt, score_text};

/// Expected IC of natural-language text.
pub const TARGET_IC: f64 = 0.065;
/// Fewer letters than this give too little signal to estimate a key length.
pub const MIN_KEY_LENGTH_LETTERS: usize = 50;
pub const DEFAULT_MAX_KEY_LENGTH: usize = 20;
const KEY_LENGTH_CANDIDATES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KeyLengthEstimate {
    pub length: usize,
    pub ic: f64,
}

/// Rank candidate key lengths `1..=min(max_length, letters / 2)` by how close
/// their average IC is to natural language and return the best five. Returns
/// nothing if the ciphertext has fewer than 50 letters.
pub fn vigenere_key_length(ciphertext: &str, max_length: usize) -> Vec<KeyLengthEstimate> {
    let letters = letters_only(ciphertext);
    if letters.len() < MIN_KEY_LENGTH_LETTERS {
        tracing::debug!(
            letters = letters.len(),
            "too few letters to estimate a key length"
        );
        return Vec::new();
    }

    let longest = max_length.min(letters.len() / 2);
    let mut estimates: Vec<KeyLengthEstimate> = (1..=longest)
        .into_par_iter()
        .map(|length| {
            let total_ic: f64 = (0..length)
                .map(|offset| index_of_coincidence(&nth_stream(&letters, offset, length)))
                .sum();
            KeyLengthEstimate {
                length,
                ic: total_ic / length as f64,
            }
        })
        .collect();

    estimates.par_sort_by(|a, b| {
        (a.ic - TARGET_IC)
            .abs()
            .total_cmp(&(b.ic - TARGET_IC).abs())
    });
    estimates.truncate(KEY_LENGTH_CANDIDATES);
    estimates
}

/// Recover a Vigenère key of `key_length` letters, one Caesar shift per key
/// position. Returns an empty string if there are fewer letters than the key
/// length. When two shifts score the same the smaller one wins.
pub fn estimate_vigenere_key(ciphertext: &str, key_length: usize) -> String {
    let letters = letters_only(ciphertext);
    if key_length == 0 || letters.len() < key_length {
        return String::new();
    }

    (0..key_length)
        .map(|offset| {
            let stream: String = nth_stream(&letters, offset, key_length)
                .into_iter()
                .map(char::from)
                .collect();
            let shift = best_shift(&stream);
            (b'A' + shift) as char
        })
        .collect()
}

fn best_shift(stream: &str) -> u8 {
    let mut best_shift = 0;
    let mut best_score = f64::INFINITY;
    for shift in 0..26u8 {
        let score = score_text(&caesar_decrypt(stream, shift as i64));
        if score < best_score {
            best_score = score;
            best_shift = shift;
        }
    }
    best_shift
}

/// Index of Coincidence of the ASCII letters in `text`, case-insensitively.
/// Other bytes are skipped; 0 for fewer than two letters.
pub fn index_of_coincidence(text: &[u8]) -> f64 {
    let mut counts = [0usize; 26];
    let mut n = 0;
    for b in text.iter().filter(|b| b.is_ascii_alphabetic()) {
        counts[(b.to_ascii_uppercase() - b'A') as usize] += 1;
        n += 1;
    }
    if n <= 1 {
        return 0.0;
    }
    let coincidences: usize = counts.iter().map(|&f| f * f.saturating_sub(1)).sum();
    coincidences as f64 / (n * (n - 1)) as f64
}

/// The uppercased ASCII letters of `text`, in order.
fn letters_only(text: &str) -> Vec<u8> {
    text.bytes()
        .filter(u8::is_ascii_alphabetic)
        .map(|b| b.to_ascii_uppercase())
        .collect()
}

/// Every `step`-th letter starting at `offset`: the letters that were shifted
/// by the same key letter.
fn nth_stream(letters: &[u8], offset: usize, step: usize) -> Vec<u8> {
    letters
        .iter()
        .skip(offset)
        .step_by(step)
        .copied()
        .collect()
}
