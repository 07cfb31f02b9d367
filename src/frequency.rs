// Letter frequency model for Spanish text.
//
// To decide how much a piece of text looks like natural language we count
// how often each letter A-Z occurs, express the counts as percentages and
// compare them against the percentages expected in Spanish. The comparison is
// a chi-squared distance: the sum over the letters of the squared difference
// between observed and expected, divided by the expected value. It is zero for
// a perfect match and grows as the distribution drifts away from Spanish, so
// lower is better. This is a goodness-of-fit distance and not a probability.
//
// The Spanish alphabet also has 'Ñ' (about 0.31%), but it sits outside A-Z and
// is never scored.

use serde::Serialize;

#[rustfmt::skip]
pub const REFERENCE_FREQUENCIES: [f64; 26] = [
    12.53, // A
     2.22, // B
     4.68, // C
     5.86, // D
    13.68, // E
     0.69, // F
     1.01, // G
     0.70, // H
     6.25, // I
     0.44, // J
     0.01, // K
     4.97, // L
     3.15, // M
     6.71, // N
     8.68, // O
     2.51, // P
     0.88, // Q
     6.87, // R
     7.98, // S
     4.63, // T
     3.93, // U
     0.90, // V
     0.02, // W
     0.22, // X
     0.90, // Y
     0.52, // Z
];

/// Percentage of each letter A-Z in a text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LetterFrequencies {
    pub percentages: [f64; 26],
}

impl LetterFrequencies {
    pub fn reference() -> Self {
        Self {
            percentages: REFERENCE_FREQUENCIES,
        }
    }

    pub fn get(&self, letter: char) -> Option<f64> {
        letter_index(letter).map(|i| self.percentages[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, f64)> + '_ {
        self.percentages
            .iter()
            .enumerate()
            .map(|(i, &p)| ((b'A' + i as u8) as char, p))
    }
}

/// Count the letters of `text` (ignoring case and anything that is not an
/// ASCII letter) and return each as a percentage of the letters counted.
pub fn analyze(text: &str) -> LetterFrequencies {
    let mut counts = [0u64; 26];
    for c in text.chars() {
        if let Some(i) = letter_index(c) {
            counts[i] += 1;
        }
    }

    let total: u64 = counts.iter().sum();
    let mut percentages = [0f64; 26];
    if total > 0 {
        percentages
            .iter_mut()
            .zip(counts)
            .for_each(|(p, count)| *p = count as f64 / total as f64 * 100.0);
    }
    LetterFrequencies { percentages }
}

/// Chi-squared distance between observed letter percentages and the Spanish
/// reference. Letters with no expected frequency are skipped.
pub fn chi_squared(observed: &LetterFrequencies) -> f64 {
    observed
        .percentages
        .iter()
        .zip(REFERENCE_FREQUENCIES.iter())
        .filter(|(_, expected)| **expected > 0.0)
        .map(|(&obs, &expected)| (obs - expected).powi(2) / expected)
        .sum()
}

/// How far `text` is from Spanish; lower is closer.
pub fn score_text(text: &str) -> f64 {
    chi_squared(&analyze(text))
}

fn letter_index(c: char) -> Option<usize> {
    if c.is_ascii_alphabetic() {
        Some((c.to_ascii_uppercase() as u8 - b'A') as usize)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIJOTE: &str = include_str!("../data/quijote.txt");

    #[test]
    fn analyze_returns_percentages_of_letters() {
        let freqs = analyze("aAb!! c");

        assert_eq!(freqs.get('A'), Some(50.0));
        assert_eq!(freqs.get('b'), Some(25.0));
        assert_eq!(freqs.get('C'), Some(25.0));
        assert_eq!(freqs.get('D'), Some(0.0));
        assert_eq!(freqs.get('!'), None);
    }

    #[test]
    fn analyze_percentages_sum_to_100() {
        let total: f64 = analyze(QUIJOTE).percentages.iter().sum();

        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn analyze_returns_zeros_without_letters() {
        let freqs = analyze("1234 !?¿ ñ");

        assert!(freqs.percentages.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn chi_squared_of_reference_is_zero() {
        assert_eq!(chi_squared(&LetterFrequencies::reference()), 0.0);
    }

    #[test]
    fn chi_squared_grows_as_distribution_diverges() {
        let reference = LetterFrequencies::reference();
        let mut skewed = [0f64; 26];
        skewed[25] = 100.0;

        let mut previous = chi_squared(&reference);
        for step in 1..=10 {
            let t = step as f64 / 10.0;
            let mut mixed = reference;
            mixed
                .percentages
                .iter_mut()
                .zip(skewed)
                .for_each(|(p, s)| *p = (1.0 - t) * *p + t * s);

            let chi = chi_squared(&mixed);

            assert!(chi > previous, "step {step}: {chi} <= {previous}");
            previous = chi;
        }
    }

    #[test]
    fn spanish_text_scores_better_than_shifted_text() {
        let shifted = crate::caesar_encrypt(QUIJOTE, 7);

        assert!(score_text(QUIJOTE) < score_text(&shifted));
    }

    #[test]
    fn reference_percentages_are_ordered_by_letter() {
        let reference = LetterFrequencies::reference();
        let (top, _) = reference
            .iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap();

        assert_eq!(top, 'E');
        assert_eq!(reference.iter().count(), 26);
    }
}
