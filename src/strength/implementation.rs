// Audits that exercise a real primitive instead of grading a configuration.
//
// The AES audit inspects the key, encrypts the plaintext and measures how
// random the ciphertext looks, then runs two probes: encrypting the same
// input twice (identical output means the IV is reused or absent) and, for
// ECB, encrypting a repeated plaintext to expose repeating blocks. The RSA
// audit checks the public numbers of a key.
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use serde::Serialize;

use super::Severity;
use crate::primitives::{AesMode, AesPrimitive, RsaPrimitive};
use crate::stats::{
    block_patterns, byte_distribution, shannon_entropy, BlockPatterns, ByteDistribution,
    AES_BLOCK_SIZE,
};
use crate::Result;

// Blocks repeating at least this often (in percent) betray ECB.
const REPETITION_THRESHOLD: f64 = 10.0;
const WEAK_EXPONENTS: [u32; 3] = [3, 5, 17];
const STANDARD_EXPONENT: u32 = 65537;
const MAX_KEY_ENTROPY: f64 = 8.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyAnalysis {
    pub strong: bool,
    pub severity: Severity,
    pub entropy: f64,
    /// Entropy as a percentage of 8 bits per byte.
    pub entropy_percentage: f64,
    pub unique_bytes: usize,
    pub total_bytes: usize,
    pub message: String,
}

/// Flag keys made of one repeated byte, keys whose bytes count upwards and
/// keys with less than 90% of 8 bits of entropy per byte.
///
/// The ceiling is fixed at 8 bits whatever the key length. A key of fewer
/// than 147 bytes cannot reach 7.2 bits, so every 16 or 32 byte AES key is
/// reported as low entropy.
pub fn analyze_key_strength(key: &[u8]) -> KeyAnalysis {
    let entropy = shannon_entropy(key);
    let entropy_percentage = entropy / MAX_KEY_ENTROPY * 100.0;
    let unique_bytes = byte_distribution(key).unique_bytes;

    let pattern = if unique_bytes <= 1 {
        Some("key is a single repeated byte")
    } else if key
        .windows(2)
        .all(|pair| pair[0].checked_add(1) == Some(pair[1]))
    {
        Some("key bytes form an incrementing sequence")
    } else {
        None
    };

    let (strong, severity, message) = match pattern {
        Some(pattern) => (false, Severity::Critical, format!("Weak key: {pattern}")),
        None if entropy < MAX_KEY_ENTROPY * 0.9 => (
            false,
            Severity::Medium,
            format!("Low key entropy: {entropy:.2}/{MAX_KEY_ENTROPY:.2} bits"),
        ),
        None => (
            true,
            Severity::Secure,
            format!("Strong key: entropy {entropy:.2}/{MAX_KEY_ENTROPY:.2} bits"),
        ),
    };

    KeyAnalysis {
        strong,
        severity,
        entropy,
        entropy_percentage,
        unique_bytes,
        total_bytes: key.len(),
        message,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IvReuseProbe {
    pub vulnerable: bool,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EcbProbe {
    pub vulnerable: bool,
    pub severity: Severity,
    pub patterns: BlockPatterns,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AesAudit {
    pub score: u32,
    pub mode: AesMode,
    pub key_bits: usize,
    pub key_analysis: KeyAnalysis,
    pub entropy: f64,
    pub distribution: ByteDistribution,
    pub patterns: BlockPatterns,
    pub iv_reuse: IvReuseProbe,
    pub ecb_probe: Option<EcbProbe>,
    pub issues: Vec<String>,
}

/// Encrypt `plaintext` with `primitive` and score what comes out. Failures of
/// the primitive (a bad key length, say) are returned rather than scored.
pub fn audit_aes_implementation(
    primitive: &impl AesPrimitive,
    plaintext: &[u8],
    key: &[u8],
    mode: AesMode,
) -> Result<AesAudit> {
    let key_analysis = analyze_key_strength(key);
    let ciphertext = primitive.encrypt(mode, key, plaintext)?;
    let entropy = shannon_entropy(&ciphertext.data);
    let distribution = byte_distribution(&ciphertext.data);
    let patterns = block_patterns(&ciphertext.data, AES_BLOCK_SIZE);
    let iv_reuse = probe_iv_reuse(primitive, plaintext, key, mode)?;
    let ecb_probe = match mode {
        AesMode::Ecb => Some(probe_ecb(primitive, plaintext, key)?),
        _ => None,
    };

    let mut score: i32 = 0;
    let mut issues = Vec::new();

    if key_analysis.strong {
        score += 30;
    } else {
        score += 10;
        issues.push(format!("Key: {}", key_analysis.message));
    }

    score += match mode {
        AesMode::Ecb => 0,
        AesMode::Cfb | AesMode::Ofb => 20,
        AesMode::Cbc => 25,
        AesMode::Ctr => 30,
    };
    if mode == AesMode::Ecb {
        issues.push("ECB mode is insecure".to_string());
    }

    if entropy > 7.5 {
        score += 25;
    } else if entropy > 6.5 {
        score += 15;
    } else {
        score += 5;
        issues.push(format!("Low ciphertext entropy: {entropy:.2}/8.00"));
    }

    if distribution.uniformity > 80.0 {
        score += 10;
    } else if distribution.uniformity > 60.0 {
        score += 5;
    }

    if patterns.repetition_rate >= REPETITION_THRESHOLD {
        score -= 20;
        issues.push(format!(
            "{:.1}% of ciphertext blocks repeat",
            patterns.repetition_rate
        ));
    }

    if iv_reuse.vulnerable {
        score -= 30;
        issues.push("IV reuse detected".to_string());
    }

    let key_bits = key.len() * 8;
    if key_bits >= 256 {
        score += 10;
    } else if key_bits >= 192 {
        score += 5;
    }

    let score = score.clamp(0, 100) as u32;
    if issues.is_empty() {
        tracing::info!(%mode, key_bits, score, "AES implementation audit passed");
    } else {
        tracing::warn!(%mode, key_bits, score, ?issues, "AES implementation audit found issues");
    }

    Ok(AesAudit {
        score,
        mode,
        key_bits,
        key_analysis,
        entropy,
        distribution,
        patterns,
        iv_reuse,
        ecb_probe,
        issues,
    })
}

fn probe_iv_reuse(
    primitive: &impl AesPrimitive,
    plaintext: &[u8],
    key: &[u8],
    mode: AesMode,
) -> Result<IvReuseProbe> {
    let first = primitive.encrypt(mode, key, plaintext)?;
    let second = primitive.encrypt(mode, key, plaintext)?;

    Ok(if first.data == second.data {
        IvReuseProbe {
            vulnerable: true,
            severity: Severity::Critical,
            message: "Encryption is deterministic: the same plaintext gives the same ciphertext"
                .to_string(),
        }
    } else {
        IvReuseProbe {
            vulnerable: false,
            severity: Severity::Secure,
            message: "Every encryption produces a different ciphertext".to_string(),
        }
    })
}

fn probe_ecb(primitive: &impl AesPrimitive, plaintext: &[u8], key: &[u8]) -> Result<EcbProbe> {
    let repeated = plaintext.repeat(3);
    let ciphertext = primitive.encrypt(AesMode::Ecb, key, &repeated)?;
    let patterns = block_patterns(&ciphertext.data, AES_BLOCK_SIZE);

    Ok(if patterns.repetition_rate >= REPETITION_THRESHOLD {
        EcbProbe {
            vulnerable: true,
            severity: Severity::Critical,
            message: format!(
                "{:.1}% of blocks repeat ({} of {} distinct blocks occur more than once)",
                patterns.repetition_rate, patterns.repeated_blocks, patterns.unique_blocks
            ),
            patterns,
        }
    } else {
        EcbProbe {
            vulnerable: false,
            severity: Severity::Secure,
            message: format!(
                "Only {:.1}% of blocks repeat",
                patterns.repetition_rate
            ),
            patterns,
        }
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RsaIssue {
    pub severity: Severity,
    pub title: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RsaAudit {
    pub score: u32,
    pub bit_length: u64,
    /// The public exponent, in decimal.
    pub exponent: String,
    pub issues: Vec<RsaIssue>,
    /// No critical issues were found.
    pub secure: bool,
}

/// Check the public numbers of an RSA key: the modulus size and parity and
/// the public exponent.
pub fn audit_rsa_key(primitive: &impl RsaPrimitive, public_key_pem: &str) -> Result<RsaAudit> {
    let components = primitive.public_components(public_key_pem)?;
    let bit_length = components.modulus.bits();
    let exponent = components.exponent.to_u32();

    let mut issues = Vec::new();
    if let Some(e) = exponent.filter(|e| WEAK_EXPONENTS.contains(e)) {
        issues.push(RsaIssue {
            severity: Severity::High,
            title: "Weak public exponent".to_string(),
            detail: format!("e={e} is vulnerable to low-exponent attacks; use e=65537"),
        });
    }
    if is_even(&components.modulus) {
        issues.push(RsaIssue {
            severity: Severity::Critical,
            title: "Even modulus".to_string(),
            detail: "The modulus must be odd; regenerate the key".to_string(),
        });
    }
    if bit_length < 2048 {
        issues.push(RsaIssue {
            severity: Severity::Critical,
            title: "Key too short".to_string(),
            detail: format!("{bit_length} bits is insecure; use at least 2048"),
        });
    }

    let count = |severity| issues.iter().filter(|i| i.severity == severity).count() as i32;
    let critical = count(Severity::Critical);
    let high = count(Severity::High);

    let mut score: i32 = match bit_length {
        4096.. => 50,
        2048.. => 35,
        1024.. => 10,
        _ => 0,
    };
    score -= critical * 30 + high * 15;
    match exponent {
        Some(STANDARD_EXPONENT) => score += 25,
        Some(e) if WEAK_EXPONENTS.contains(&e) => score += 5,
        _ => {}
    }
    if critical == 0 {
        score += 25;
    }
    let score = score.clamp(0, 100) as u32;

    if issues.is_empty() {
        tracing::info!(bit_length, score, "RSA key audit passed");
    } else {
        tracing::warn!(bit_length, score, issues = issues.len(), "RSA key audit found issues");
    }

    Ok(RsaAudit {
        score,
        bit_length,
        exponent: components.exponent.to_string(),
        issues,
        secure: critical == 0,
    })
}

fn is_even(n: &BigUint) -> bool {
    (n % 2u32).is_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;

    use crate::primitives::{
        AesCiphertext, AesKeySize, RsaKeyPair, RsaPadding, RsaPublicComponents, RustCryptoAes,
        RustCryptoRsa,
    };
    use crate::Error;

    use num_traits::One;
    use rstest::rstest;

    const QUIJOTE: &str = include_str!("../../data/quijote.txt");

    // XORs the plaintext with the key and always reports the same IV, so two
    // encryptions of the same input are identical.
    struct FixedIvAes;

    impl AesPrimitive for FixedIvAes {
        fn generate_key(&self, size: AesKeySize) -> Vec<u8> {
            vec![0x5a; size.bytes()]
        }

        fn encrypt(&self, mode: AesMode, key: &[u8], plaintext: &[u8]) -> Result<AesCiphertext> {
            let data = plaintext
                .iter()
                .zip(key.iter().cycle())
                .map(|(p, k)| p ^ k)
                .collect();
            Ok(AesCiphertext {
                mode,
                iv: Some(vec![0; 16]),
                data,
            })
        }

        fn decrypt(&self, key: &[u8], ciphertext: &AesCiphertext) -> Result<Vec<u8>> {
            self.encrypt(ciphertext.mode, key, &ciphertext.data)
                .map(|c| c.data)
        }
    }

    struct FakeRsa {
        modulus: BigUint,
        exponent: u32,
        calls: Cell<usize>,
    }

    impl FakeRsa {
        fn new(modulus: BigUint, exponent: u32) -> Self {
            FakeRsa {
                modulus,
                exponent,
                calls: Cell::new(0),
            }
        }
    }

    impl RsaPrimitive for FakeRsa {
        fn generate_keypair(&self, _bits: usize) -> Result<RsaKeyPair> {
            unimplemented!()
        }

        fn encrypt(&self, _: &str, _: &[u8], _: RsaPadding) -> Result<Vec<u8>> {
            unimplemented!()
        }

        fn decrypt(&self, _: &str, _: &[u8], _: RsaPadding) -> Result<Vec<u8>> {
            unimplemented!()
        }

        fn public_components(&self, _: &str) -> Result<RsaPublicComponents> {
            self.calls.set(self.calls.get() + 1);
            Ok(RsaPublicComponents {
                modulus: self.modulus.clone(),
                exponent: BigUint::from(self.exponent),
            })
        }
    }

    // An odd modulus of exactly `bits` bits.
    fn odd_modulus(bits: u64) -> BigUint {
        (BigUint::one() << (bits - 1)) + 1u32
    }

    #[rstest]
    #[case(vec![0u8; 32], "single repeated byte")]
    #[case((0u8..16).collect(), "incrementing sequence")]
    #[case((200u8..232).collect(), "incrementing sequence")]
    fn patterned_keys_are_weak(#[case] key: Vec<u8>, #[case] pattern: &str) {
        let analysis = analyze_key_strength(&key);

        assert!(!analysis.strong);
        assert_eq!(analysis.severity, Severity::Critical);
        assert!(analysis.message.contains(pattern));
    }

    #[test]
    fn low_entropy_key_is_weak() {
        let key = [b"ABAB".repeat(4), b"CDCD".repeat(4)].concat();

        let analysis = analyze_key_strength(&key);

        assert!(!analysis.strong);
        assert_eq!(analysis.severity, Severity::Medium);
        assert_eq!(analysis.unique_bytes, 4);
    }

    #[test]
    fn every_byte_value_once_is_strong() {
        let key: Vec<u8> = (0..=255u8).map(|i| i.wrapping_mul(37) ^ 0xa5).collect();

        let analysis = analyze_key_strength(&key);

        assert!(analysis.strong);
        assert_eq!(analysis.unique_bytes, 256);
        assert!((analysis.entropy_percentage - 100.0).abs() < 1e-9);
    }

    #[test]
    fn entropy_is_measured_against_eight_bits() {
        // 32 distinct bytes carry 5 bits each: 62.5% of the 8-bit ceiling.
        let key: Vec<u8> = (0..32u8).map(|i| i.wrapping_mul(37) ^ 0xa5).collect();

        let analysis = analyze_key_strength(&key);

        assert!(!analysis.strong);
        assert_eq!(analysis.severity, Severity::Medium);
        assert!((analysis.entropy - 5.0).abs() < 1e-9);
        assert!((analysis.entropy_percentage - 62.5).abs() < 1e-9);
    }

    #[test]
    fn sound_configuration_loses_only_the_key_entropy_points() {
        let key = RustCryptoAes.generate_key(AesKeySize::Aes256);

        let audit =
            audit_aes_implementation(&RustCryptoAes, QUIJOTE.as_bytes(), &key, AesMode::Ctr)
                .unwrap();

        // 10 (key) + 30 (CTR) + 25 (entropy) + 10 (uniformity) + 10 (256 bits).
        assert_eq!(audit.score, 85);
        assert_eq!(audit.issues.len(), 1);
        assert!(audit.issues[0].starts_with("Key: Low key entropy"));
        assert!(!audit.iv_reuse.vulnerable);
        assert!(audit.ecb_probe.is_none());
        assert_eq!(audit.key_bits, 256);
    }

    #[test]
    fn deterministic_primitive_is_caught_reusing_ivs() {
        let key = RustCryptoAes.generate_key(AesKeySize::Aes256);

        let audit =
            audit_aes_implementation(&FixedIvAes, QUIJOTE.as_bytes(), &key, AesMode::Cbc)
                .unwrap();

        assert!(audit.iv_reuse.vulnerable);
        assert_eq!(audit.iv_reuse.severity, Severity::Critical);
        assert!(audit.issues.iter().any(|i| i == "IV reuse detected"));
    }

    #[test]
    fn ecb_with_weak_key_scores_zero() {
        let plaintext = b"YELLOW SUBMARINE".repeat(4);

        let audit =
            audit_aes_implementation(&RustCryptoAes, &plaintext, &[0u8; 16], AesMode::Ecb)
                .unwrap();

        assert_eq!(audit.score, 0);
        assert!(audit.iv_reuse.vulnerable);
        assert!(audit.patterns.repetition_rate >= 10.0);
        assert!(audit.issues.iter().any(|i| i == "ECB mode is insecure"));
    }

    #[test]
    fn ecb_probe_finds_repeated_blocks() {
        let key = RustCryptoAes.generate_key(AesKeySize::Aes128);

        let audit =
            audit_aes_implementation(&RustCryptoAes, b"YELLOW SUBMARINE", &key, AesMode::Ecb)
                .unwrap();

        let probe = audit.ecb_probe.unwrap();
        assert!(probe.vulnerable);
        // Three copies of one block plus a block of padding.
        assert_eq!(probe.patterns.total_blocks, 4);
        assert_eq!(probe.patterns.unique_blocks, 2);
    }

    #[test]
    fn primitive_errors_are_propagated() {
        let result =
            audit_aes_implementation(&RustCryptoAes, b"hola", &[1, 2, 3], AesMode::Cbc);

        assert!(matches!(result, Err(Error::InvalidKeyLength(3))));
    }

    #[rstest]
    #[case(4096, 65537, 100)]
    #[case(2048, 65537, 85)]
    #[case(3072, 65537, 85)]
    #[case(2048, 3, 50)]
    #[case(1024, 65537, 5)]
    fn rsa_key_scores(#[case] bits: u64, #[case] exponent: u32, #[case] expected: u32) {
        let rsa = FakeRsa::new(odd_modulus(bits), exponent);

        let audit = audit_rsa_key(&rsa, "ignored").unwrap();

        assert_eq!(audit.bit_length, bits);
        assert_eq!(audit.score, expected);
        assert_eq!(rsa.calls.get(), 1);
    }

    #[test]
    fn broken_rsa_key_collects_every_issue() {
        let even_modulus = BigUint::one() << 1023u32;
        let rsa = FakeRsa::new(even_modulus, 3);

        let audit = audit_rsa_key(&rsa, "ignored").unwrap();

        let titles: Vec<&str> = audit.issues.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["Weak public exponent", "Even modulus", "Key too short"]);
        assert_eq!(audit.score, 0);
        assert!(!audit.secure);
        assert_eq!(audit.exponent, "3");
    }

    #[test]
    fn generated_rsa_key_is_read_from_pem() {
        let keypair = RustCryptoRsa.generate_keypair(1024).unwrap();

        let audit = audit_rsa_key(&RustCryptoRsa, &keypair.public_key_pem).unwrap();

        assert_eq!(audit.bit_length, 1024);
        assert_eq!(audit.exponent, "65537");
        assert_eq!(audit.issues.len(), 1);
        assert_eq!(audit.score, 5);
    }
}
