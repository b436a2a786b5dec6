//! Character similarity by recursive longest common substring
//!
//! The score is the classic "similar text" measure: find the longest run
//! shared by both strings, then repeat on the pieces to the left of the run
//! and to the right of it, summing the run lengths. The percentage is
//! `2 * matched / (len(a) + len(b)) * 100`.
//!
//! The match thresholds in [`crate::strategy`] are calibrated against this
//! exact measure, including its tie-break: among equally long runs the one
//! found first by a scan over `a` positions, then `b` positions, wins. The
//! measure is therefore not symmetric in general.

use serde::Serialize;

/// Result of scoring two strings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Similarity {
    /// Codepoints matched across all recursion levels
    pub matched: usize,
    /// `matched` relative to the combined length, in `[0, 100]`
    pub percent: f64,
}

impl Similarity {
    const NONE: Similarity = Similarity {
        matched: 0,
        percent: 0.0,
    };
}

/// Score two strings. Two empty strings score 0%.
pub fn similar_text(a: &str, b: &str) -> Similarity {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    similar_chars(&a, &b)
}

/// Score two codepoint slices.
pub fn similar_chars(a: &[char], b: &[char]) -> Similarity {
    let total = a.len() + b.len();
    if total == 0 {
        return Similarity::NONE;
    }

    let matched = matched_chars(a, b);
    Similarity {
        matched,
        percent: matched as f64 * 200.0 / total as f64,
    }
}

/// A common run: start in `a`, start in `b`, length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    a: usize,
    b: usize,
    len: usize,
}

/// Sum of common run lengths, walking split ranges with an explicit stack so
/// input length never bounds the call stack.
fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    // (start_a, end_a, start_b, end_b)
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((start_a, end_a, start_b, end_b)) = pending.pop() {
        let Some(run) = longest_common_run(&a[start_a..end_a], &b[start_b..end_b]) else {
            continue;
        };
        matched += run.len;

        if run.a > 0 && run.b > 0 {
            pending.push((start_a, start_a + run.a, start_b, start_b + run.b));
        }

        let after_a = start_a + run.a + run.len;
        let after_b = start_b + run.b + run.len;
        if after_a < end_a && after_b < end_b {
            pending.push((after_a, end_a, after_b, end_b));
        }
    }

    matched
}

/// First longest run shared by `a` and `b`, or `None` when they share no
/// codepoint. Only a strictly longer run replaces the current best.
fn longest_common_run(a: &[char], b: &[char]) -> Option<Run> {
    let mut best = Run { a: 0, b: 0, len: 0 };

    for i in 0..a.len() {
        // Nothing starting here can be strictly longer
        if a.len() - i <= best.len {
            break;
        }
        for j in 0..b.len() {
            if b.len() - j <= best.len {
                break;
            }
            let len = a[i..]
                .iter()
                .zip(&b[j..])
                .take_while(|(x, y)| x == y)
                .count();
            if len > best.len {
                best = Run { a: i, b: j, len };
            }
        }
    }

    (best.len > 0).then_some(best)
}

/// Pluggable similarity measure returning a percentage in `[0, 100]`.
pub trait SimilarityScorer: Send + Sync {
    fn percent(&self, a: &str, b: &str) -> f64;
}

/// Default scorer: [`similar_text`] with an optional input cap.
///
/// When `max_chars` is set and the combined codepoint length of a pair exceeds
/// it, the pair scores 0% instead of paying the superlinear search.
#[derive(Debug, Clone, Copy, Default)]
pub struct LcsScorer {
    pub max_chars: Option<usize>,
}

impl LcsScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_chars(max_chars: usize) -> Self {
        Self {
            max_chars: Some(max_chars),
        }
    }

    pub fn score(&self, a: &str, b: &str) -> Similarity {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();

        match self.max_chars {
            Some(cap) if a.len() + b.len() > cap => {
                tracing::debug!(
                    len_a = a.len(),
                    len_b = b.len(),
                    cap,
                    "Skipping similarity scoring above input cap"
                );
                Similarity::NONE
            }
            _ => similar_chars(&a, &b),
        }
    }
}

impl SimilarityScorer for LcsScorer {
    fn percent(&self, a: &str, b: &str) -> f64 {
        self.score(a, b).percent
    }
}
