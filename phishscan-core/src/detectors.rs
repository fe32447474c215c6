//! Signal detectors
//!
//! Each registered signal has one pure predicate. Phrase detectors match the
//! normalized text (lowercased, whitespace collapsed); the formatting and
//! mixed-case checks need the original casing and read the raw text; link
//! detectors read the extracted link set.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::{is_shortener, looks_suspicious, SignalHits, SignalKey};

/// More symbols than this marks a message as oddly formatted
pub const WEIRD_CHAR_LIMIT: usize = 25;

/// An all-caps message longer than this marks it as oddly formatted
pub const ALL_CAPS_MIN_LEN: usize = 40;

/// Length of a same-character punctuation run that counts as a typo pattern
pub const REPEATED_PUNCT_RUN: usize = 3;

// Phrase patterns; all run against lowercased text
static URGENCY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:urgent|immediately|asap|act now|final notice|limited time|today only|within \d+ (?:min|mins|minutes|hour|hours))\b",
    )
    .unwrap()
});

static CREDENTIAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:password|passcode|verification code|2fa|otp|security code|login|sign in|confirm your identity)\b",
    )
    .unwrap()
});

static MONEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:gift card|wire|bitcoin|crypto|payment|pay now|refund|invoice|cash app|venmo|zelle)\b",
    )
    .unwrap()
});

static IMPERSONATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:bank|irs|apple|microsoft|google|amazon|paypal|usps|fedex|dhl|support team|help desk)\b",
    )
    .unwrap()
});

static THREAT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:account (?:(?:will be|has been|is|was) )?(?:locked|suspended|disabled|closed)|legal action|warrant|arrest|penalty|lawsuit)\b",
    )
    .unwrap()
});

static ATTACHMENTS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:open the attachment|attached|pdf attached|download (?:the )?file|docu?ment attached)\b",
    )
    .unwrap()
});

static MISSPELLING_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:verifcation|updte|acount|passw0rd|securrity|paymnt)\b").unwrap()
});

// Case-sensitive: runs against the raw text
static RANDOM_CAPS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-z][A-Z][a-z]").unwrap()
});

/// Lowercase, collapse whitespace runs to one space, trim the ends
pub fn normalize(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Characters that are neither ASCII alphanumeric nor whitespace
pub fn count_weird_chars(raw: &str) -> usize {
    raw.chars()
        .filter(|c| !c.is_ascii_alphanumeric() && !c.is_whitespace())
        .count()
}

/// Many symbols, or a long message written entirely in capitals
pub fn has_weird_format(raw: &str) -> bool {
    if count_weird_chars(raw) > WEIRD_CHAR_LIMIT {
        return true;
    }
    raw.chars().count() > ALL_CAPS_MIN_LEN && raw.to_uppercase() == raw
}

/// A run of 3+ identical `!`, `?`, `.` or `,` characters
pub fn has_repeated_punctuation(raw: &str) -> bool {
    let mut run = 0;
    let mut prev = None;
    for c in raw.chars() {
        let is_mark = matches!(c, '!' | '?' | '.' | ',');
        run = if is_mark && prev == Some(c) { run + 1 } else { 1 };
        if is_mark && run >= REPEATED_PUNCT_RUN {
            return true;
        }
        prev = Some(c);
    }
    false
}

/// Repeated punctuation, random mid-word capitals, or a known misspelling
pub fn has_typo_patterns(raw: &str, normalized: &str) -> bool {
    has_repeated_punctuation(raw)
        || RANDOM_CAPS_REGEX.is_match(raw)
        || MISSPELLING_REGEX.is_match(normalized)
}

/// Run the detector registered for `key`
pub fn detect(key: SignalKey, raw: &str, normalized: &str, links: &[&str]) -> bool {
    match key {
        SignalKey::Urgency => URGENCY_REGEX.is_match(normalized),
        SignalKey::Credential => CREDENTIAL_REGEX.is_match(normalized),
        SignalKey::Money => MONEY_REGEX.is_match(normalized),
        SignalKey::Impersonation => IMPERSONATION_REGEX.is_match(normalized),
        SignalKey::Shortlink => links.iter().any(|link| is_shortener(link)),
        SignalKey::LinkMismatch => links.iter().any(|link| looks_suspicious(link)),
        SignalKey::Threat => THREAT_REGEX.is_match(normalized),
        SignalKey::WeirdFormat => has_weird_format(raw),
        SignalKey::Typos => has_typo_patterns(raw, normalized),
        SignalKey::Attachments => ATTACHMENTS_REGEX.is_match(normalized),
    }
}

/// Evaluate every registered detector against one message
pub fn evaluate(raw: &str, links: &[&str]) -> SignalHits {
    let normalized = normalize(raw);
    let mut hits = SignalHits::new();

    for key in SignalKey::ALL {
        let hit = detect(key, raw, &normalized, links);
        if hit {
            debug!("Signal fired: {}", key);
        }
        hits.set(key, hit);
    }

    hits
}
