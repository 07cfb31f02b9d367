// Break a Caesar cipher by brute force.
//
// There are only 26 possible shifts, so we decrypt the ciphertext with every
// one of them and score each candidate against the Spanish letter
// distribution. The candidate with the lowest chi-squared distance is the
// most likely plaintext, but we keep and rank all 26 so the caller can show
// the runners-up as well.

use rayon::prelude::*;
use serde::Serialize;

use crate::{caesar_decrypt, score_text};

const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaesarCandidate {
    pub shift: u8,
    pub text: String,
    pub chi_squared: f64,
    pub preview: String,
}

/// Decrypt `ciphertext` with every shift and return all 26 candidates sorted
/// from most to least Spanish-looking. Equal scores keep ascending shift
/// order.
pub fn caesar_attack(ciphertext: &str) -> Vec<CaesarCandidate> {
    let mut candidates: Vec<CaesarCandidate> = (0..26u8)
        .into_par_iter()
        .map(|shift| {
            let text = caesar_decrypt(ciphertext, shift as i64);
            let chi_squared = score_text(&text);
            let preview = preview(&text);
            CaesarCandidate {
                shift,
                text,
                chi_squared,
                preview,
            }
        })
        .collect();

    candidates.par_sort_by(|a, b| a.chi_squared.total_cmp(&b.chi_squared));
    tracing::debug!(
        best_shift = candidates[0].shift,
        best_score = candidates[0].chi_squared,
        "caesar attack ranked 26 shifts"
    );
    candidates
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        head + "..."
    } else {
        head
    }
}
