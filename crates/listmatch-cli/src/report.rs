//! Match reports printed by the CLI

use listmatch_core::{ListItemMatchStrategy, MatchOutcome};
use serde::Serialize;

/// One comparison, as printed with `--json`
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub is_match: bool,
    pub outcome: MatchOutcome,
    pub stripped_similarity: f64,
    pub raw_similarity: f64,
}

impl MatchReport {
    pub fn build(strategy: &ListItemMatchStrategy, a: &str, b: &str) -> Self {
        let outcome = strategy.explain(a, b);
        Self {
            is_match: outcome.is_match(),
            outcome,
            stripped_similarity: strategy.stripped_similarity(a, b),
            raw_similarity: strategy.raw_similarity(a, b),
        }
    }

    /// Human-readable single line
    pub fn summary(&self) -> String {
        format!(
            "{} [{}] stripped {:.2}% raw {:.2}%",
            if self.is_match { "match" } else { "no match" },
            self.outcome,
            self.stripped_similarity,
            self.raw_similarity
        )
    }
}

/// Matching candidate indices for `--candidates`
#[derive(Debug, Clone, Serialize)]
pub struct CandidateReport {
    pub candidates: usize,
    pub matches: Vec<usize>,
}

/// Split a candidates file into one fragment per non-empty line.
pub fn candidate_lines(contents: &str) -> Vec<&str> {
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect()
}
