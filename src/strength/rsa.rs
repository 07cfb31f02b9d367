use super::{Finding, SecurityTier, Severity, StrengthEvaluation};

const TIER_BOUNDS: [f64; 4] = [90.0, 70.0, 40.0, 20.0];

fn key_points(key_bits: usize) -> f64 {
    match key_bits {
        1024 => 0.0,
        2048 => 75.0,
        4096 => 100.0,
        _ => 50.0,
    }
}

fn padding_points(padding: &str) -> f64 {
    match padding {
        "OAEP" => 100.0,
        "PKCS1V15" => 60.0,
        "NONE" => 0.0,
        _ => 50.0,
    }
}

/// Grade an RSA configuration. `padding` is one of `OAEP`, `PKCS1v15` or
/// `None` (textbook RSA), matched case-insensitively.
pub fn evaluate_rsa(key_bits: usize, padding: &str) -> StrengthEvaluation {
    let padding = padding.trim().to_ascii_uppercase();
    let score = 0.6 * key_points(key_bits) + 0.4 * padding_points(&padding);

    let mut findings = key_findings(key_bits);
    findings.extend(padding_findings(&padding));

    let mut recommendations = Vec::new();
    match padding.as_str() {
        "NONE" => recommendations.push("CRITICAL: implement OAEP immediately".into()),
        "PKCS1V15" => recommendations.push("Upgrade to OAEP for better security".into()),
        _ => {}
    }
    if key_bits < 2048 {
        recommendations.push("URGENT: upgrade to RSA-2048 at the very least".into());
    } else if key_bits == 2048 {
        recommendations.push("Plan a migration to RSA-4096 for long-term data".into());
    }
    if padding != "OAEP" {
        recommendations.push("Use OAEP with SHA-256 or stronger".into());
    }
    recommendations.push("Consider elliptic curves (ECC) as a more efficient alternative".into());
    recommendations.push("Keep the private key in an HSM or other secure storage".into());
    recommendations.push("Rotate key pairs periodically".into());

    let evaluation = StrengthEvaluation {
        score,
        tier: SecurityTier::from_score(score, TIER_BOUNDS),
        findings,
        recommendations,
    };
    tracing::debug!(key_bits, %padding, score, tier = %evaluation.tier, "evaluated RSA");
    evaluation
}

fn key_findings(key_bits: usize) -> Vec<Finding> {
    match key_bits {
        1024 => vec![
            Finding::new(
                Severity::Critical,
                "RSA-1024 is insecure",
                "~80 bits of symmetric-equivalent security; deprecated since 2010",
            ),
            Finding::new(
                Severity::Critical,
                "Factorisation is feasible",
                "GNFS needs ~2^86 operations; RSA-768 has already been factored publicly",
            ),
        ],
        2048 => vec![
            Finding::new(
                Severity::Secure,
                "RSA-2048 is the current industry standard",
                "~112 bits of symmetric-equivalent security; considered adequate until ~2030",
            ),
            Finding::new(
                Severity::Secure,
                "Factorisation is hard",
                "GNFS needs ~2^117 operations",
            ),
        ],
        4096 => vec![
            Finding::new(
                Severity::Secure,
                "RSA-4096 offers long-term security",
                "~140 bits of symmetric-equivalent security; expected to hold beyond 2040",
            ),
            Finding::new(
                Severity::Secure,
                "Factorisation is very hard",
                "GNFS needs ~2^140 operations",
            ),
        ],
        _ => vec![Finding::new(
            Severity::Medium,
            format!("Non-standard key size of {key_bits} bits"),
            "Prefer 2048 or 4096 bit keys",
        )],
    }
}

fn padding_findings(padding: &str) -> Vec<Finding> {
    match padding {
        "NONE" => vec![
            Finding::new(
                Severity::Critical,
                "Textbook RSA",
                "Encryption without padding is deterministic and open to direct mathematical attacks",
            ),
            Finding::new(
                Severity::Critical,
                "Multiplicative property",
                "E(m1) * E(m2) = E(m1 * m2) lets an attacker forge related ciphertexts",
            ),
            Finding::new(
                Severity::Critical,
                "Small messages",
                "Short messages with a small exponent fall to integer root attacks",
            ),
        ],
        "PKCS1V15" => vec![
            Finding::new(
                Severity::High,
                "Bleichenbacher attack",
                "A PKCS#1 v1.5 padding oracle allows decryption",
            ),
            Finding::new(
                Severity::Medium,
                "Timing attacks",
                "Timing differences while checking padding leak information",
            ),
        ],
        "OAEP" => vec![Finding::new(
            Severity::Secure,
            "OAEP is the recommended padding",
            "Probabilistic and resistant to known attacks; the implementation must run in constant time",
        )],
        _ => vec![Finding::new(
            Severity::Medium,
            format!("Unknown padding '{padding}'"),
            "The security of this padding could not be assessed",
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(4096, "OAEP", 100.0, SecurityTier::VeryHigh)]
    #[case(2048, "OAEP", 85.0, SecurityTier::High)]
    #[case(4096, "PKCS1v15", 84.0, SecurityTier::High)]
    #[case(2048, "PKCS1v15", 69.0, SecurityTier::Medium)]
    #[case(3072, "OAEP", 70.0, SecurityTier::High)]
    #[case(1024, "OAEP", 40.0, SecurityTier::Medium)]
    #[case(2048, "None", 45.0, SecurityTier::Medium)]
    #[case(1024, "PKCS1v15", 24.0, SecurityTier::Low)]
    #[case(1024, "None", 0.0, SecurityTier::Critical)]
    fn scores_and_tiers(
        #[case] key_bits: usize,
        #[case] padding: &str,
        #[case] score: f64,
        #[case] tier: SecurityTier,
    ) {
        let evaluation = evaluate_rsa(key_bits, padding);

        assert!((evaluation.score - score).abs() < 1e-9);
        assert_eq!(evaluation.tier, tier);
    }

    #[test]
    fn textbook_rsa_is_critical() {
        let evaluation = evaluate_rsa(4096, "None");

        assert!(evaluation.has_finding(Severity::Critical));
        assert!(evaluation.recommendations[0].contains("OAEP"));
    }

    #[test]
    fn small_keys_get_urgent_recommendation() {
        let evaluation = evaluate_rsa(1024, "OAEP");

        assert!(evaluation
            .recommendations
            .iter()
            .any(|r| r.starts_with("URGENT")));
        assert!(!evaluation
            .recommendations
            .iter()
            .any(|r| r.contains("SHA-256")));
    }

    #[test]
    fn standard_key_plans_migration() {
        let evaluation = evaluate_rsa(2048, "PKCS1v15");

        assert_eq!(
            evaluation.recommendations,
            [
                "Upgrade to OAEP for better security",
                "Plan a migration to RSA-4096 for long-term data",
                "Use OAEP with SHA-256 or stronger",
                "Consider elliptic curves (ECC) as a more efficient alternative",
                "Keep the private key in an HSM or other secure storage",
                "Rotate key pairs periodically",
            ]
        );
    }
}
