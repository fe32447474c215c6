//! Link extraction and link-level checks
//!
//! Recognizes two link shapes, purely syntactically:
//! - Scheme-prefixed URLs (`http://`, `https://`)
//! - Bare domains with an optional path (`example.com/login`)
//!
//! Nothing here resolves hosts or verifies that a domain exists.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Known URL-shortening services
pub const SHORTENERS: &[&str] = &[
    "bit.ly",
    "tinyurl.com",
    "t.co",
    "goo.gl",
    "ow.ly",
    "is.gd",
    "buff.ly",
    "cutt.ly",
    "rebrand.ly",
    "rb.gy",
    "shorturl.at",
];

// Regex patterns for link extraction. The regex crate matches in linear time,
// so adversarial input cannot trigger catastrophic backtracking.
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bhttps?://[^\s)]+").unwrap()
});

static BARE_DOMAIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:[a-z0-9-]+\.)+[a-z]{2,}(?:/[^\s)]*)?").unwrap()
});

static SCHEME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://").unwrap()
});

static IPV4_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{1,3}(?:\.\d{1,3}){3}\b").unwrap()
});

/// Trailing sentence punctuation is not part of a link
fn trim_link(link: &str) -> &str {
    link.trim_end_matches(['.', ',', ';', ':', '!', '?', '\'', '"'])
}

/// Extract link-like substrings from text, deduplicated, in discovery order
///
/// Scheme-prefixed URLs come first and are only deduplicated against exact
/// repeats. A bare-domain match is dropped when an already captured link
/// contains it, so `example.com` is not counted again next to
/// `https://example.com/page`.
pub fn extract_links(text: &str) -> Vec<&str> {
    let mut links: Vec<&str> = Vec::new();

    for m in URL_REGEX.find_iter(text) {
        let url = trim_link(m.as_str());
        if !links.contains(&url) {
            links.push(url);
        }
    }

    for m in BARE_DOMAIN_REGEX.find_iter(text) {
        let bare = trim_link(m.as_str());
        if !links.iter().any(|captured| captured.contains(bare)) {
            links.push(bare);
        }
    }

    debug!("Extracted {} links", links.len());
    links
}

/// Lowercased host portion of a link (scheme stripped, path/query/fragment dropped)
pub fn link_host(link: &str) -> String {
    let lower = link.to_lowercase();
    let rest = SCHEME_REGEX.replace(&lower, "");
    rest.split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Whether the link's host mentions a known shortener
pub fn is_shortener(link: &str) -> bool {
    let host = link_host(link);
    SHORTENERS.iter().any(|shortener| host.contains(shortener))
}

/// Whether the link shows a trait common in phishing URLs
///
/// Flags credentials-in-URL (`@`), punycode, IPv4 hosts, deep subdomain
/// chains (4+ labels) and hyphen-heavy hosts (3+ hyphens).
pub fn looks_suspicious(link: &str) -> bool {
    let lower = link.to_lowercase();
    if lower.contains('@') {
        debug!("Link flagged: contains '@'");
        return true;
    }
    if lower.contains("xn--") {
        debug!("Link flagged: punycode label");
        return true;
    }

    let host = link_host(link);
    if IPV4_REGEX.is_match(&host) {
        debug!("Link flagged: IPv4 host");
        return true;
    }
    if host.split('.').count() >= 4 {
        debug!("Link flagged: deep subdomain chain");
        return true;
    }
    if host.matches('-').count() >= 3 {
        debug!("Link flagged: hyphen-heavy host");
        return true;
    }

    false
}
