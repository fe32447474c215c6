//! Exportable analysis reports
//!
//! A report wraps one [`AnalysisResult`] for output. It identifies the
//! analyzed message by a SHA-256 fingerprint and never carries the text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::AnalysisResult;

/// Short content fingerprint for a message (first 16 hex chars of SHA-256)
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())[..16].to_string()
}

/// One analyzed message, ready for export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Unique report ID
    pub id: Uuid,
    /// Caller-supplied message identifier (batch line id)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Fingerprint of the analyzed text
    pub fingerprint: String,
    /// When the analysis ran
    pub analyzed_at: DateTime<Utc>,
    /// Links found in the message
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
    /// The engine result
    pub result: AnalysisResult,
}

impl Report {
    /// Create a new report builder
    pub fn builder(text: &str, result: AnalysisResult) -> ReportBuilder {
        ReportBuilder::new(text, result)
    }
}

/// Builder for reports
pub struct ReportBuilder {
    fingerprint: String,
    result: AnalysisResult,
    source: Option<String>,
    links: Vec<String>,
}

impl ReportBuilder {
    pub fn new(text: &str, result: AnalysisResult) -> Self {
        Self {
            fingerprint: fingerprint(text),
            result,
            source: None,
            links: Vec::new(),
        }
    }

    pub fn source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    pub fn links(mut self, links: &[&str]) -> Self {
        self.links = links.iter().map(|link| link.to_string()).collect();
        self
    }

    pub fn build(self) -> Report {
        Report {
            id: Uuid::new_v4(),
            source: self.source,
            fingerprint: self.fingerprint,
            analyzed_at: Utc::now(),
            links: self.links,
            result: self.result,
        }
    }
}
