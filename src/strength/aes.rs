use super::{Finding, SecurityTier, Severity, StrengthEvaluation};

const TIER_BOUNDS: [f64; 4] = [90.0, 75.0, 50.0, 25.0];

fn key_points(key_bits: usize) -> f64 {
    match key_bits {
        128 => 70.0,
        192 => 85.0,
        256 => 100.0,
        _ => 0.0,
    }
}

fn mode_points(mode: &str) -> f64 {
    match mode {
        "ECB" => 0.0,
        "CFB" | "OFB" => 80.0,
        "CBC" => 90.0,
        "CTR" => 95.0,
        _ => 50.0,
    }
}

/// Grade an AES configuration. `mode` is matched case-insensitively;
/// unknown modes get a neutral score.
pub fn evaluate_aes(key_bits: usize, mode: &str) -> StrengthEvaluation {
    let mode = mode.trim().to_ascii_uppercase();
    let score = 0.5 * key_points(key_bits) + 0.5 * mode_points(&mode);

    let mut findings = vec![key_finding(key_bits)];
    findings.extend(mode_findings(&mode));
    findings.push(quantum_finding(key_bits));

    let mut recommendations = Vec::new();
    match mode.as_str() {
        "ECB" => recommendations.push("CRITICAL: switch to CBC, CTR or GCM immediately".into()),
        "CBC" => {
            recommendations.push("Use a unique, random IV for every message".into());
            recommendations.push("Add an HMAC to authenticate the ciphertext".into());
        }
        "CTR" => {
            recommendations.push("Never reuse a nonce under the same key".into());
            recommendations.push("Prefer GCM for built-in authentication".into());
        }
        _ => {}
    }
    if key_bits < 256 {
        recommendations.push("Consider upgrading to AES-256 for maximum security".into());
    }
    if mode != "CBC" && mode != "CTR" {
        recommendations.push("Consider CBC or CTR for better security".into());
    }
    recommendations.push("Rotate keys periodically".into());
    recommendations.push("Manage keys with a key management system (KMS)".into());

    let evaluation = StrengthEvaluation {
        score,
        tier: SecurityTier::from_score(score, TIER_BOUNDS),
        findings,
        recommendations,
    };
    tracing::debug!(key_bits, %mode, score, tier = %evaluation.tier, "evaluated AES");
    evaluation
}

fn key_finding(key_bits: usize) -> Finding {
    let (severity, rating, years) = match key_bits {
        256 => (Severity::Secure, "excellent", Some(77)),
        192 => (Severity::Secure, "very good", Some(58)),
        128 => (Severity::Medium, "good", Some(38)),
        _ => (Severity::Critical, "not a valid AES key size", None),
    };
    let detail = match years {
        Some(years) => format!(
            "2^{key_bits} possible keys; exhaustive search would take ~10^{years} years"
        ),
        None => format!("AES keys are 128, 192 or 256 bits, not {key_bits}"),
    };
    Finding::new(severity, format!("Key strength: {rating}"), detail)
}

fn mode_findings(mode: &str) -> Vec<Finding> {
    match mode {
        "ECB" => vec![
            Finding::new(
                Severity::Critical,
                "ECB mode is insecure",
                "Identical plaintext blocks give identical ciphertext blocks, leaking patterns",
            ),
            Finding::new(
                Severity::Critical,
                "No diffusion",
                "A change in one block never propagates to the others",
            ),
            Finding::new(
                Severity::Critical,
                "Dictionary attacks",
                "Known plaintext blocks can be recognised wherever they occur",
            ),
        ],
        "CBC" => vec![
            Finding::new(
                Severity::Secure,
                "CBC mode is secure",
                "Widely adopted; needs a unique random IV per message and has no authentication",
            ),
            Finding::new(
                Severity::Medium,
                "Padding oracle",
                "Decryption errors that reveal bad padding let an attacker decrypt",
            ),
            Finding::new(
                Severity::Medium,
                "IV reuse",
                "Reusing an IV exposes common message prefixes",
            ),
        ],
        "CTR" => vec![
            Finding::new(
                Severity::Secure,
                "CTR mode is very secure",
                "Parallelisable and needs no padding; the nonce must be unique per message",
            ),
            Finding::new(
                Severity::Medium,
                "Nonce reuse",
                "Two messages under the same nonce XOR to the XOR of their plaintexts",
            ),
        ],
        "CFB" | "OFB" => vec![
            Finding::new(
                Severity::Secure,
                format!("{mode} mode is secure"),
                "Requires a unique IV for every message",
            ),
            Finding::new(
                Severity::Medium,
                "IV reuse",
                "Always use a fresh IV",
            ),
        ],
        _ => vec![Finding::new(
            Severity::Medium,
            format!("Unknown mode '{mode}'"),
            "The security of this mode could not be assessed",
        )],
    }
}

// Grover's algorithm halves the effective key length.
fn quantum_finding(key_bits: usize) -> Finding {
    let effective = key_bits / 2;
    if key_bits >= 256 {
        Finding::new(
            Severity::Secure,
            "Quantum resistant",
            format!("Grover's algorithm reduces the key to ~{effective} effective bits"),
        )
    } else {
        Finding::new(
            Severity::Medium,
            "Limited quantum resistance",
            format!("Grover's algorithm reduces the key to ~{effective} effective bits; consider AES-256"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(256, "CTR", 97.5, SecurityTier::VeryHigh)]
    #[case(256, "CBC", 95.0, SecurityTier::VeryHigh)]
    #[case(192, "CFB", 82.5, SecurityTier::High)]
    #[case(128, "OFB", 75.0, SecurityTier::High)]
    #[case(128, "GCM", 60.0, SecurityTier::Medium)]
    #[case(128, "ECB", 35.0, SecurityTier::Low)]
    #[case(512, "ECB", 0.0, SecurityTier::Critical)]
    fn scores_and_tiers(
        #[case] key_bits: usize,
        #[case] mode: &str,
        #[case] score: f64,
        #[case] tier: SecurityTier,
    ) {
        let evaluation = evaluate_aes(key_bits, mode);

        assert_eq!(evaluation.score, score);
        assert_eq!(evaluation.tier, tier);
    }

    #[test]
    fn strong_config_beats_weak_config() {
        assert!(evaluate_aes(256, "CTR").score > evaluate_aes(128, "ECB").score);
    }

    #[rstest]
    fn ecb_is_always_critical(#[values(128, 192, 256)] key_bits: usize) {
        let evaluation = evaluate_aes(key_bits, "ECB");

        assert!(evaluation.has_finding(Severity::Critical));
        assert!(evaluation.recommendations[0].starts_with("CRITICAL"));
    }

    #[test]
    fn mode_is_case_insensitive() {
        assert_eq!(evaluate_aes(256, "ctr"), evaluate_aes(256, "CTR"));
    }

    #[test]
    fn recommendations_follow_configuration() {
        let cbc = evaluate_aes(128, "CBC").recommendations;
        let ctr = evaluate_aes(256, "CTR").recommendations;
        let ofb = evaluate_aes(256, "OFB").recommendations;

        assert!(cbc.iter().any(|r| r.contains("HMAC")));
        assert!(cbc.iter().any(|r| r.contains("AES-256")));
        assert!(!ctr.iter().any(|r| r.contains("AES-256")));
        assert!(ofb.iter().any(|r| r.contains("CBC or CTR")));
        for recommendations in [&cbc, &ctr, &ofb] {
            assert!(recommendations.iter().any(|r| r.contains("KMS")));
            assert!(recommendations.iter().any(|r| r.contains("Rotate")));
        }
    }

    #[test]
    fn aes_256_is_quantum_resistant() {
        let strong = evaluate_aes(256, "CBC");
        let weak = evaluate_aes(128, "CBC");

        assert!(strong
            .findings
            .iter()
            .any(|f| f.title == "Quantum resistant" && f.detail.contains("~128")));
        assert!(weak
            .findings
            .iter()
            .any(|f| f.title == "Limited quantum resistance" && f.detail.contains("~64")));
    }
}
