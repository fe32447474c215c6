//! Phishing signal registry
//!
//! Signals are weighted boolean detectors:
//! - The registry is a fixed, ordered list defined at compile time
//! - Registry order drives the order of reasons in a result
//! - A [`SignalHits`] record holds one analysis' detector outcomes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a registered signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKey {
    /// Pressure or time-limit phrasing
    Urgency,
    /// Requests for passwords, codes or login confirmation
    Credential,
    /// Payment, gift card, crypto or money-transfer mentions
    Money,
    /// Brand or authority names
    Impersonation,
    /// Link on a known URL shortener
    Shortlink,
    /// Link with a suspicious-domain trait
    LinkMismatch,
    /// Account closure or legal consequences
    Threat,
    /// Many symbols or an all-caps message
    WeirdFormat,
    /// Repeated punctuation, random caps, known misspellings
    Typos,
    /// Mentions of attached or downloadable files
    Attachments,
}

impl SignalKey {
    /// Every key, in registry order
    pub const ALL: [SignalKey; 10] = [
        SignalKey::Urgency,
        SignalKey::Credential,
        SignalKey::Money,
        SignalKey::Impersonation,
        SignalKey::Shortlink,
        SignalKey::LinkMismatch,
        SignalKey::Threat,
        SignalKey::WeirdFormat,
        SignalKey::Typos,
        SignalKey::Attachments,
    ];

    /// Stable identifier used in output
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKey::Urgency => "urgency",
            SignalKey::Credential => "credential",
            SignalKey::Money => "money",
            SignalKey::Impersonation => "impersonation",
            SignalKey::Shortlink => "shortlink",
            SignalKey::LinkMismatch => "link_mismatch",
            SignalKey::Threat => "threat",
            SignalKey::WeirdFormat => "weird_format",
            SignalKey::Typos => "typos",
            SignalKey::Attachments => "attachments",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SignalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A registered signal
#[derive(Debug, Clone, Serialize)]
pub struct SignalDef {
    /// Signal identifier
    pub key: SignalKey,
    /// Score contribution when the detector fires
    pub weight: u32,
    /// Human-readable reason
    pub label: &'static str,
}

/// The signal registry, in evaluation order
pub static SIGNALS: &[SignalDef] = &[
    SignalDef {
        key: SignalKey::Urgency,
        weight: 14,
        label: "Urgency / pressure language",
    },
    SignalDef {
        key: SignalKey::Credential,
        weight: 18,
        label: "Asks for passwords / codes / login",
    },
    SignalDef {
        key: SignalKey::Money,
        weight: 16,
        label: "Payment / gift cards / crypto request",
    },
    SignalDef {
        key: SignalKey::Impersonation,
        weight: 14,
        label: "Impersonation language (bank, IRS, support)",
    },
    SignalDef {
        key: SignalKey::Shortlink,
        weight: 12,
        label: "Shortened or obfuscated link",
    },
    SignalDef {
        key: SignalKey::LinkMismatch,
        weight: 16,
        label: "Suspicious link or misleading domain",
    },
    SignalDef {
        key: SignalKey::Threat,
        weight: 12,
        label: "Threats: account closed / legal action",
    },
    SignalDef {
        key: SignalKey::WeirdFormat,
        weight: 8,
        label: "Odd formatting (ALL CAPS / many symbols)",
    },
    SignalDef {
        key: SignalKey::Typos,
        weight: 10,
        label: "Suspicious spelling patterns / typos",
    },
    SignalDef {
        key: SignalKey::Attachments,
        weight: 10,
        label: "Mentions attachments or opening files",
    },
];

/// Look up a signal definition by key
pub fn signal_def(key: SignalKey) -> &'static SignalDef {
    &SIGNALS[key.index()]
}

/// Detector outcomes for a single analysis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalHits {
    hits: [bool; SignalKey::ALL.len()],
}

impl SignalHits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a detector outcome
    pub fn set(&mut self, key: SignalKey, hit: bool) {
        self.hits[key.index()] = hit;
    }

    /// Whether the detector for `key` fired
    pub fn is_hit(&self, key: SignalKey) -> bool {
        self.hits[key.index()]
    }

    /// Registered signals that fired, in registry order
    pub fn fired(&self) -> impl Iterator<Item = &'static SignalDef> + '_ {
        SIGNALS.iter().filter(|def| self.is_hit(def.key))
    }

    /// Number of detectors that fired
    pub fn count(&self) -> usize {
        self.hits.iter().filter(|&&hit| hit).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_matches_key_order() {
        assert_eq!(SIGNALS.len(), SignalKey::ALL.len());
        for (def, key) in SIGNALS.iter().zip(SignalKey::ALL) {
            assert_eq!(def.key, key);
            assert_eq!(signal_def(key).key, key);
        }
    }

    #[test]
    fn test_registry_weights() {
        let weights: Vec<u32> = SIGNALS.iter().map(|d| d.weight).collect();
        assert_eq!(weights, vec![14, 18, 16, 14, 12, 16, 12, 8, 10, 10]);
        assert!(SIGNALS.iter().all(|d| d.weight > 0));
    }

    #[test]
    fn test_labels_unique() {
        let mut labels: Vec<&str> = SIGNALS.iter().map(|d| d.label).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), SIGNALS.len());
    }

    #[test]
    fn test_hits_fired_in_registry_order() {
        let mut hits = SignalHits::new();
        hits.set(SignalKey::Attachments, true);
        hits.set(SignalKey::Urgency, true);
        hits.set(SignalKey::Threat, true);

        let fired: Vec<SignalKey> = hits.fired().map(|d| d.key).collect();
        assert_eq!(
            fired,
            vec![SignalKey::Urgency, SignalKey::Threat, SignalKey::Attachments]
        );
        assert_eq!(hits.count(), 3);
        assert!(!hits.is_hit(SignalKey::Money));
    }

    #[test]
    fn test_key_serializes_snake_case() {
        let json = serde_json::to_string(&SignalKey::LinkMismatch).unwrap();
        assert_eq!(json, "\"link_mismatch\"");
        assert_eq!(SignalKey::WeirdFormat.to_string(), "weird_format");
    }
}
