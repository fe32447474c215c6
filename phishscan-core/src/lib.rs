//! PhishScan Core - Heuristic phishing-risk scoring for pasted messages
//!
//! This crate provides the scoring pipeline:
//! - Link extraction (scheme-prefixed URLs and bare domains)
//! - A fixed registry of weighted signal detectors
//! - Aggregation into a score, confidence estimate and verdict tier
//! - A report envelope for exporting results without the message text
//!
//! Every analysis is a pure function of its input text. Nothing is stored
//! between calls and nothing touches the network.

pub mod signals;
pub mod links;
pub mod detectors;
pub mod analysis;
pub mod report;

pub use signals::*;
pub use links::*;
pub use detectors::*;
pub use analysis::*;
pub use report::*;

/// Lowest possible score
pub const SCORE_MIN: u32 = 0;

/// Highest possible score
pub const SCORE_MAX: u32 = 100;

/// Confidence floor (no hits, short text)
pub const CONFIDENCE_MIN: u32 = 55;

/// Confidence ceiling
pub const CONFIDENCE_MAX: u32 = 92;

/// Score at or above which the verdict is High
pub const HIGH_THRESHOLD: u32 = 75;

/// Score at or above which the verdict is Medium
pub const MEDIUM_THRESHOLD: u32 = 40;

/// Number of reasons a display surface shows by default
pub const DEFAULT_MAX_REASONS: usize = 9;

/// Display reason when no signal fired
pub const NO_SIGNALS_REASON: &str = "No strong phishing signals detected. Still verify independently.";

/// Display reason for empty input
pub const NO_INPUT_REASON: &str = "Paste a message above to analyze.";
