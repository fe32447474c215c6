//! Score aggregation
//!
//! Turns detector outcomes into a bounded risk score, a confidence estimate
//! and a verdict tier:
//! - Registered signals add their weight in registry order
//! - Bonus rules add score for link counts and the link + credential combo
//! - Score is clamped to 0..=100, confidence to 55..=92

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::{
    evaluate, extract_links, SignalHits, SignalKey, CONFIDENCE_MAX, CONFIDENCE_MIN,
    HIGH_THRESHOLD, MEDIUM_THRESHOLD, NO_INPUT_REASON, NO_SIGNALS_REASON, SCORE_MAX, SCORE_MIN,
};

/// Characters of text per confidence length step
pub const LENGTH_STEP_CHARS: usize = 120;

/// Maximum number of length steps counted toward confidence
pub const MAX_LENGTH_STEPS: u32 = 4;

/// Coarse risk tier derived from the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Low,
    Medium,
    High,
}

impl Verdict {
    /// Tier for a clamped score
    pub fn from_score(score: u32) -> Self {
        if score >= HIGH_THRESHOLD {
            Verdict::High
        } else if score >= MEDIUM_THRESHOLD {
            Verdict::Medium
        } else {
            Verdict::Low
        }
    }

    /// Display badge with an emoji marker
    pub fn badge(&self) -> &'static str {
        match self {
            Verdict::Low => "Low ✅",
            Verdict::Medium => "Medium ⚡",
            Verdict::High => "High ⚠️",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Verdict::Low => "Low",
            Verdict::Medium => "Medium",
            Verdict::High => "High",
        };
        f.write_str(name)
    }
}

/// Outcome of analyzing one message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Risk score, 0..=100
    pub score: u32,
    /// Tier derived from the score
    pub verdict: Verdict,
    /// Unique reasons, registry order then bonus rules
    pub reasons: Vec<String>,
    /// Confidence estimate, 55..=92
    pub confidence: u32,
    /// Triggered signals, bonus rules included
    pub hits: u32,
    /// Number of distinct links found
    pub links_found: usize,
}

impl AnalysisResult {
    /// Up to `limit` reasons, or the "no strong signals" placeholder
    pub fn display_reasons(&self, limit: usize) -> Vec<&str> {
        if self.reasons.is_empty() {
            return vec![NO_SIGNALS_REASON];
        }
        self.reasons.iter().take(limit).map(String::as_str).collect()
    }
}

/// A score bonus triggered by a count or combination condition
struct BonusRule {
    bonus: u32,
    reason: &'static str,
    applies: fn(&SignalHits, usize) -> bool,
}

fn multiple_links(_: &SignalHits, links: usize) -> bool {
    links >= 2
}

fn many_links(_: &SignalHits, links: usize) -> bool {
    links >= 4
}

fn link_with_credential(signals: &SignalHits, links: usize) -> bool {
    signals.is_hit(SignalKey::Credential) && links >= 1
}

// Each rule fires independently; the two link-count rules stack.
static BONUS_RULES: &[BonusRule] = &[
    BonusRule {
        bonus: 6,
        reason: "Multiple links present",
        applies: multiple_links,
    },
    BonusRule {
        bonus: 6,
        reason: "Many links present",
        applies: many_links,
    },
    BonusRule {
        bonus: 10,
        reason: "Link + credential request combo",
        applies: link_with_credential,
    },
];

/// Analyze one message
///
/// Total over any input: empty text yields score 0, confidence 55 and a Low
/// verdict. Callers that want a distinct "no input" state use [`Scanner`].
pub fn analyze(text: &str) -> AnalysisResult {
    let links = extract_links(text);
    let signals = evaluate(text, &links);
    aggregate(text, &signals, links.len())
}

/// Combine detector outcomes and the link count into a result
pub fn aggregate(raw: &str, signals: &SignalHits, links_found: usize) -> AnalysisResult {
    let mut score: u32 = 0;
    let mut hits: u32 = 0;
    let mut reasons: Vec<&str> = Vec::new();

    for def in signals.fired() {
        score += def.weight;
        hits += 1;
        reasons.push(def.label);
    }

    for rule in BONUS_RULES {
        if (rule.applies)(signals, links_found) {
            score += rule.bonus;
            hits += 1;
            reasons.push(rule.reason);
        }
    }

    let score = score.clamp(SCORE_MIN, SCORE_MAX);
    let length_steps = ((raw.chars().count() / LENGTH_STEP_CHARS) as u32).min(MAX_LENGTH_STEPS);
    let confidence = (CONFIDENCE_MIN + hits * 6 + length_steps * 3).clamp(CONFIDENCE_MIN, CONFIDENCE_MAX);
    let verdict = Verdict::from_score(score);

    let mut seen = HashSet::new();
    let reasons: Vec<String> = reasons
        .into_iter()
        .filter(|reason| seen.insert(*reason))
        .map(str::to_string)
        .collect();

    debug!(
        "Analysis complete: score={} verdict={} hits={} links={}",
        score, verdict, hits, links_found
    );

    AnalysisResult {
        score,
        verdict,
        reasons,
        confidence,
        hits,
        links_found,
    }
}

/// Errors from [`Scanner`]
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Input too large: {len} characters (limit {max})")]
    InputTooLarge { len: usize, max: usize },
}

/// What a caller shows for one submitted message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assessment {
    /// Empty or whitespace-only input; the engine was not run
    NoInput,
    /// Engine result
    Analyzed(AnalysisResult),
}

impl Assessment {
    pub fn score(&self) -> u32 {
        match self {
            Assessment::NoInput => 0,
            Assessment::Analyzed(result) => result.score,
        }
    }

    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            Assessment::NoInput => None,
            Assessment::Analyzed(result) => Some(result.verdict),
        }
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            Assessment::NoInput => None,
            Assessment::Analyzed(result) => Some(result),
        }
    }

    /// Reasons to display, capped at `limit`
    pub fn display_reasons(&self, limit: usize) -> Vec<&str> {
        match self {
            Assessment::NoInput => vec![NO_INPUT_REASON],
            Assessment::Analyzed(result) => result.display_reasons(limit),
        }
    }
}

/// Caller-side policy around [`analyze`]: empty-input short-circuit and size limit
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    max_input_chars: Option<usize>,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject input longer than `max` characters; 0 disables the limit
    pub fn with_max_input_chars(mut self, max: usize) -> Self {
        self.max_input_chars = (max > 0).then_some(max);
        self
    }

    pub fn max_input_chars(&self) -> Option<usize> {
        self.max_input_chars
    }

    /// Assess one message
    pub fn scan(&self, text: &str) -> Result<Assessment, ScanError> {
        if text.trim().is_empty() {
            debug!("Empty input, skipping analysis");
            return Ok(Assessment::NoInput);
        }

        if let Some(max) = self.max_input_chars {
            let len = text.chars().count();
            if len > max {
                return Err(ScanError::InputTooLarge { len, max });
            }
        }

        Ok(Assessment::Analyzed(analyze(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgent_password_shortlink_scenario() {
        let result = analyze(
            "URGENT: verify your password immediately at http://bit.ly/abc or your account will be closed",
        );
        assert_eq!(result.links_found, 1);
        assert_eq!(result.score, 14 + 18 + 12 + 12 + 10);
        assert_eq!(result.verdict, Verdict::Medium);
        assert_eq!(result.hits, 5);
        assert_eq!(
            result.reasons,
            vec![
                "Urgency / pressure language",
                "Asks for passwords / codes / login",
                "Shortened or obfuscated link",
                "Threats: account closed / legal action",
                "Link + credential request combo",
            ]
        );
        assert_eq!(result.confidence, 55 + 5 * 6);
    }

    #[test]
    fn test_benign_message_scenario() {
        let result = analyze("Hi, lunch tomorrow at noon?");
        assert_eq!(result.score, 0);
        assert_eq!(result.hits, 0);
        assert_eq!(result.links_found, 0);
        assert_eq!(result.verdict, Verdict::Low);
        assert_eq!(result.confidence, 55);
        assert!(result.reasons.is_empty());
        assert_eq!(result.display_reasons(9), vec![NO_SIGNALS_REASON]);
    }

    #[test]
    fn test_four_bare_domains_scenario() {
        let result = analyze("Resources: alpha.io beta.net gamma.org delta.dev");
        assert_eq!(result.links_found, 4);
        assert_eq!(result.score, 12);
        assert_eq!(result.hits, 2);
        assert_eq!(result.verdict, Verdict::Low);
        assert_eq!(result.reasons, vec!["Multiple links present", "Many links present"]);
    }

    #[test]
    fn test_hyphenated_domain_flagged() {
        let result = analyze("Update at secure-login-update-verify.account-check.com");
        assert!(result
            .reasons
            .iter()
            .any(|r| r == "Suspicious link or misleading domain"));
    }

    #[test]
    fn test_score_clamped_to_max() {
        let text = "URGENT!!! Your BANK account suspended. Confirm your password and pay with a gift card \
                    at http://bit.ly/x and http://192.168.0.1/login, open the attachment";
        let result = analyze(text);
        assert_eq!(result.score, 100);
        assert_eq!(result.verdict, Verdict::High);
        assert!(result.hits >= 9);
        assert!(result.confidence <= CONFIDENCE_MAX);
    }

    #[test]
    fn test_empty_input_through_engine() {
        for text in ["", "   ", "\n\t  \r\n"] {
            let result = analyze(text);
            assert_eq!(result.score, 0);
            assert_eq!(result.hits, 0);
            assert_eq!(result.links_found, 0);
            assert_eq!(result.confidence, 55);
            assert_eq!(result.verdict, Verdict::Low);
        }
    }

    #[test]
    fn test_confidence_length_boost_caps() {
        let long = "lorem ipsum dolor sit amet ".repeat(40);
        let result = analyze(&long);
        assert_eq!(result.hits, 0);
        assert_eq!(result.confidence, 55 + 4 * 3);

        let medium = "x".repeat(250);
        assert_eq!(analyze(&medium).confidence, 55 + 2 * 3);
    }

    #[test]
    fn test_verdict_thresholds() {
        assert_eq!(Verdict::from_score(0), Verdict::Low);
        assert_eq!(Verdict::from_score(39), Verdict::Low);
        assert_eq!(Verdict::from_score(40), Verdict::Medium);
        assert_eq!(Verdict::from_score(74), Verdict::Medium);
        assert_eq!(Verdict::from_score(75), Verdict::High);
        assert_eq!(Verdict::from_score(100), Verdict::High);
        assert_eq!(Verdict::Medium.badge(), "Medium ⚡");
        assert_eq!(Verdict::High.to_string(), "High");
    }

    #[test]
    fn test_aggregate_dedups_reasons() {
        let mut signals = SignalHits::new();
        signals.set(SignalKey::Credential, true);
        let result = aggregate("text", &signals, 1);
        assert_eq!(result.score, 28);
        assert_eq!(result.hits, 2);
        assert_eq!(result.reasons.len(), 2);
    }

    #[test]
    fn test_invariants_on_adversarial_input() {
        let inputs = vec![
            "a".repeat(20_000),
            "!".repeat(20_000),
            "http://".repeat(2_000),
            "a.".repeat(10_000),
            "a-".repeat(10_000) + ".com",
            "aBa".repeat(5_000),
            "ÄÖÜ ß 😀 ".repeat(2_000),
            "xn--@".repeat(2_000),
            "1.2.3.4.".repeat(2_000),
        ];

        for text in &inputs {
            let result = analyze(text);
            assert!(result.score <= 100);
            assert!((55..=92).contains(&result.confidence));
            assert_eq!(result.verdict, Verdict::from_score(result.score));
            let unique: HashSet<&String> = result.reasons.iter().collect();
            assert_eq!(unique.len(), result.reasons.len());
        }
    }

    #[test]
    fn test_result_serializes_with_camel_case() {
        let result = analyze("Hi, lunch tomorrow at noon?");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["linksFound"], 0);
        assert_eq!(json["verdict"], "Low");
        assert_eq!(json["confidence"], 55);
    }

    #[test]
    fn test_scanner_no_input() {
        let scanner = Scanner::new();
        let assessment = scanner.scan("  \n ").unwrap();
        assert_eq!(assessment, Assessment::NoInput);
        assert_eq!(assessment.score(), 0);
        assert_eq!(assessment.verdict(), None);
        assert_eq!(assessment.display_reasons(9), vec![NO_INPUT_REASON]);
    }

    #[test]
    fn test_scanner_input_limit() {
        let scanner = Scanner::new().with_max_input_chars(10);
        assert!(matches!(
            scanner.scan("this message is too long"),
            Err(ScanError::InputTooLarge { max: 10, .. })
        ));
        assert!(scanner.scan("short").is_ok());

        let unlimited = Scanner::new().with_max_input_chars(0);
        assert_eq!(unlimited.max_input_chars(), None);
    }

    #[test]
    fn test_display_reasons_limit() {
        let text = "URGENT!!! Your BANK account suspended. Confirm your password and pay with a gift card \
                    at http://bit.ly/x and http://192.168.0.1/login, open the attachment";
        let assessment = Scanner::new().scan(text).unwrap();
        assert_eq!(assessment.display_reasons(9).len(), 9);
        assert!(assessment.result().unwrap().reasons.len() > 9);
    }
}
