//! Batch analysis of JSON-lines input
//!
//! Each line holds `{"id": "optional", "text": "..."}`. Messages are scored
//! concurrently on the blocking pool and emitted in input order.

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use phishscan_core::{extract_links, Assessment, Report, Scanner};

/// One input line
#[derive(Debug, Clone, Deserialize)]
pub struct BatchMessage {
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
}

/// A line that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    pub line: usize,
    pub message: String,
}

/// Outcome for one message, written as one JSON line
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    Analyzed {
        line: usize,
        report: Report,
    },
    NoInput {
        line: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
    Rejected {
        line: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        error: String,
    },
}

impl BatchOutcome {
    pub fn line(&self) -> usize {
        match self {
            BatchOutcome::Analyzed { line, .. }
            | BatchOutcome::NoInput { line, .. }
            | BatchOutcome::Rejected { line, .. } => *line,
        }
    }
}

/// Parse JSON lines; blank lines are skipped, line numbers are 1-based
pub fn parse_batch(input: &str) -> (Vec<(usize, BatchMessage)>, Vec<LineError>) {
    let mut messages = Vec::new();
    let mut errors = Vec::new();

    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<BatchMessage>(raw) {
            Ok(message) => messages.push((line, message)),
            Err(e) => errors.push(LineError {
                line,
                message: e.to_string(),
            }),
        }
    }

    (messages, errors)
}

fn assess(line: usize, message: BatchMessage, scanner: &Scanner) -> BatchOutcome {
    match scanner.scan(&message.text) {
        Ok(Assessment::NoInput) => BatchOutcome::NoInput {
            line,
            id: message.id,
        },
        Ok(Assessment::Analyzed(result)) => {
            let links = extract_links(&message.text);
            let mut builder = Report::builder(&message.text, result).links(&links);
            if let Some(id) = &message.id {
                builder = builder.source(id);
            }
            BatchOutcome::Analyzed {
                line,
                report: builder.build(),
            }
        }
        Err(e) => BatchOutcome::Rejected {
            line,
            id: message.id,
            error: e.to_string(),
        },
    }
}

/// Analyze messages with up to `concurrency` in flight, preserving input order
pub async fn run_batch(
    messages: Vec<(usize, BatchMessage)>,
    scanner: Scanner,
    concurrency: usize,
) -> Vec<BatchOutcome> {
    let concurrency = concurrency.max(1);
    debug!("Running batch of {} messages, concurrency {}", messages.len(), concurrency);

    stream::iter(messages)
        .map(|(line, message)| {
            let scanner = scanner.clone();
            let id = message.id.clone();
            async move {
                match tokio::task::spawn_blocking(move || assess(line, message, &scanner)).await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        warn!("Analysis task for line {} failed: {}", line, e);
                        BatchOutcome::Rejected {
                            line,
                            id,
                            error: format!("analysis task failed: {}", e),
                        }
                    }
                }
            }
        })
        .buffered(concurrency)
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = r#"{"id": "a", "text": "Hi, lunch tomorrow at noon?"}

{"text": "URGENT: verify your password immediately at http://bit.ly/abc or your account will be closed"}
not json
{"id": "blank", "text": "   "}
{"id": "long", "text": "this one is far too long for the limit"}
"#;

    #[test]
    fn test_parse_batch() {
        let (messages, errors) = parse_batch(INPUT);
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].0, 1);
        assert_eq!(messages[1].0, 3);
        assert_eq!(messages[0].1.id.as_deref(), Some("a"));
        assert!(messages[1].1.id.is_none());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, 4);
    }

    #[tokio::test]
    async fn test_run_batch_preserves_order() {
        let (messages, _) = parse_batch(INPUT);
        let scanner = Scanner::new().with_max_input_chars(95);
        let outcomes = run_batch(messages, scanner, 3).await;

        let lines: Vec<usize> = outcomes.iter().map(BatchOutcome::line).collect();
        assert_eq!(lines, vec![1, 3, 5, 6]);

        match &outcomes[0] {
            BatchOutcome::Analyzed { report, .. } => {
                assert_eq!(report.result.score, 0);
                assert_eq!(report.source.as_deref(), Some("a"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        match &outcomes[1] {
            BatchOutcome::Analyzed { report, .. } => {
                assert_eq!(report.result.score, 66);
                assert_eq!(report.links, vec!["http://bit.ly/abc"]);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(matches!(outcomes[2], BatchOutcome::NoInput { .. }));
        assert!(matches!(outcomes[3], BatchOutcome::Analyzed { .. }));
    }

    #[tokio::test]
    async fn test_run_batch_rejects_oversized() {
        let (messages, _) = parse_batch(INPUT);
        let scanner = Scanner::new().with_max_input_chars(20);
        let outcomes = run_batch(messages, scanner, 0).await;

        let rejected = outcomes
            .iter()
            .filter(|o| matches!(o, BatchOutcome::Rejected { .. }))
            .count();
        assert_eq!(rejected, 3);

        let json = serde_json::to_string(&outcomes[1]).unwrap();
        assert!(json.contains("\"status\":\"rejected\""));
    }
}
