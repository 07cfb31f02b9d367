// Statistics over raw bytes, used to judge how random a ciphertext looks.
use std::collections::HashMap;

use serde::Serialize;

pub const AES_BLOCK_SIZE: usize = 16;

/// Shannon entropy in bits per byte (0 to 8).
pub fn shannon_entropy(bytes: &[u8]) -> f64 {
    if bytes.is_empty() {
        return 0.0;
    }
    let mut counts = [0usize; 256];
    bytes.iter().for_each(|&b| counts[b as usize] += 1);

    let len = bytes.len() as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / len;
            -p * p.log2()
        })
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ByteDistribution {
    pub unique_bytes: usize,
    pub total_bytes: usize,
    /// Chi-squared distance of the observed byte values from uniform.
    pub chi_squared: f64,
    /// Percentage of the 256 byte values that occur at least once.
    pub uniformity: f64,
}

pub fn byte_distribution(bytes: &[u8]) -> ByteDistribution {
    let mut counts = [0usize; 256];
    bytes.iter().for_each(|&b| counts[b as usize] += 1);

    let expected = bytes.len() as f64 / 256.0;
    let chi_squared = if bytes.is_empty() {
        0.0
    } else {
        counts
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| (c as f64 - expected).powi(2) / expected)
            .sum()
    };
    let unique_bytes = counts.iter().filter(|&&c| c > 0).count();

    ByteDistribution {
        unique_bytes,
        total_bytes: bytes.len(),
        chi_squared,
        uniformity: unique_bytes as f64 / 256.0 * 100.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlockPatterns {
    pub total_blocks: usize,
    pub unique_blocks: usize,
    /// Distinct blocks that occur more than once.
    pub repeated_blocks: usize,
    /// Percentage of blocks that duplicate an earlier block.
    pub repetition_rate: f64,
}

/// Split `bytes` into `block_size` chunks (the last one may be short) and
/// measure how many are repeats. Identical plaintext blocks encrypted in ECB
/// mode give identical ciphertext blocks, so a high rate betrays ECB.
pub fn block_patterns(bytes: &[u8], block_size: usize) -> BlockPatterns {
    let mut seen_blocks = HashMap::<&[u8], usize>::new();
    for block in bytes.chunks(block_size.max(1)) {
        *seen_blocks.entry(block).or_default() += 1;
    }

    let total_blocks = seen_blocks.values().sum::<usize>();
    let unique_blocks = seen_blocks.len();
    let repeated_blocks = seen_blocks.values().filter(|&&n| n > 1).count();
    let repetition_rate = if total_blocks > 0 {
        (total_blocks - unique_blocks) as f64 / total_blocks as f64 * 100.0
    } else {
        0.0
    };

    BlockPatterns {
        total_blocks,
        unique_blocks,
        repeated_blocks,
        repetition_rate,
    }
}
