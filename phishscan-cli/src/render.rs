//! Terminal rendering of assessments

use phishscan_core::Assessment;

/// Placeholder for values that have no meaning without input
const BLANK: &str = "—";

/// Render one assessment as a human-readable block
pub fn render_assessment(
    assessment: &Assessment,
    links: &[&str],
    max_reasons: usize,
    show_links: bool,
) -> String {
    let mut out = String::new();

    let verdict = assessment
        .verdict()
        .map(|v| v.badge().to_string())
        .unwrap_or_else(|| BLANK.to_string());

    let (confidence, hits, links_found) = match assessment.result() {
        Some(result) => (
            format!("{}%", result.confidence),
            result.hits,
            result.links_found,
        ),
        None => (BLANK.to_string(), 0, 0),
    };

    out.push_str(&format!("🎯 Risk score: {}/100\n", assessment.score()));
    out.push_str(&format!("🏷️  Verdict: {}\n", verdict));
    out.push_str(&format!("📈 Confidence: {}\n", confidence));
    out.push_str(&format!("🚩 Signals hit: {}\n", hits));
    out.push_str(&format!("🔗 Links found: {}\n", links_found));

    out.push_str("\nReasons:\n");
    for reason in assessment.display_reasons(max_reasons) {
        out.push_str(&format!("  • {}\n", reason));
    }

    if show_links && !links.is_empty() {
        out.push_str("\nLinks:\n");
        for link in links {
            out.push_str(&format!("  - {}\n", link));
        }
    }

    out
}
