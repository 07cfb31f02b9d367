// Security scoring for AES and RSA.
//
// `evaluate_aes` and `evaluate_rsa` grade a configuration on paper: a key
// size and a mode or padding name go in, a 0-100 score with a tier, a list
// of findings and a list of recommendations come out. The audits in
// `implementation` go further and actually drive a primitive, looking at
// the keys and ciphertexts it produces.
pub mod aes;
pub mod implementation;
pub mod rsa;

use std::fmt;

use serde::Serialize;

pub use self::aes::evaluate_aes;
pub use self::rsa::evaluate_rsa;
pub use implementation::{
    analyze_key_strength, audit_aes_implementation, audit_rsa_key, AesAudit, EcbProbe,
    IvReuseProbe, KeyAnalysis, RsaAudit, RsaIssue,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityTier {
    Critical,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl SecurityTier {
    /// Map a score onto a tier given the lower bounds of VeryHigh, High,
    /// Medium and Low, in that order.
    fn from_score(score: f64, bounds: [f64; 4]) -> Self {
        let [very_high, high, medium, low] = bounds;
        if score >= very_high {
            SecurityTier::VeryHigh
        } else if score >= high {
            SecurityTier::High
        } else if score >= medium {
            SecurityTier::Medium
        } else if score >= low {
            SecurityTier::Low
        } else {
            SecurityTier::Critical
        }
    }
}

impl fmt::Display for SecurityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SecurityTier::Critical => "critical",
            SecurityTier::Low => "low",
            SecurityTier::Medium => "medium",
            SecurityTier::High => "high",
            SecurityTier::VeryHigh => "very high",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Secure,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub title: String,
    pub detail: String,
}

impl Finding {
    fn new(severity: Severity, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Finding {
            severity,
            title: title.into(),
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrengthEvaluation {
    pub score: f64,
    pub tier: SecurityTier,
    pub findings: Vec<Finding>,
    pub recommendations: Vec<String>,
}

impl StrengthEvaluation {
    pub fn has_finding(&self, severity: Severity) -> bool {
        self.findings.iter().any(|f| f.severity == severity)
    }
}
