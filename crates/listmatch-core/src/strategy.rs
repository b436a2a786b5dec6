//! Match strategies deciding whether two fragments are the same item
//!
//! A diff engine pairs fragments from corresponding positions of two document
//! versions (list item contents, typically) and asks a [`MatchStrategy`]
//! whether they are one item, possibly edited, or two unrelated items.
//!
//! # List item checks (in order, first success wins)
//!
//! 1. Similarity of the tag-stripped fragments
//! 2. Similarity of the raw fragments
//! 3. Exact leftover: the shorter cleaned fragment is fully covered by the
//!    common prefix and suffix
//! 4. Proportional overlap: prefix plus suffix cover enough of the shorter
//!    cleaned fragment
//!
//! Checks 1 and 2 need 100% similarity unless both fragments are longer than
//! [`LONG_FRAGMENT_CHARS`], in which case 60% is enough.

use std::fmt;

use serde::Serialize;
use tracing::trace;

use crate::config::MatcherConfig;
use crate::error::ConfigResult;
use crate::similarity::{LcsScorer, SimilarityScorer};
use crate::text::{
    char_len, trim_fragment, AffixFinder, CharAffixFinder, MarkupStripper, TagStripper,
};

/// Both fragments must be strictly longer than this to use the long threshold
pub const LONG_FRAGMENT_CHARS: usize = 70;

/// Similarity percentage required when both fragments are long
pub const LONG_SIMILARITY_THRESHOLD: f64 = 60.0;

/// Similarity percentage required otherwise
pub const SHORT_SIMILARITY_THRESHOLD: f64 = 100.0;

/// Fixed length-ratio floor of the proportional-overlap check
pub const MIN_OVERLAP_LENGTH_RATIO: f64 = 0.1;

/// Decides whether two fragments represent the same item.
///
/// Implementations are stateless per call and safe to share across threads.
pub trait MatchStrategy: Send + Sync {
    fn is_match(&self, a: &str, b: &str) -> bool;
}

/// Which check decided a comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum MatchOutcome {
    /// Stripped fragments reached the similarity threshold
    StrippedSimilarity { percent: f64 },
    /// Raw fragments reached the similarity threshold
    RawSimilarity { percent: f64 },
    /// Shorter cleaned fragment fully covered by common prefix and suffix
    ExactLeftover,
    /// Common prefix and suffix cover enough of the shorter cleaned fragment
    ProportionalOverlap,
    /// One of the fragments is empty even with its markup
    NoComparableContent,
    /// No check passed
    Insufficient,
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        matches!(
            self,
            MatchOutcome::StrippedSimilarity { .. }
                | MatchOutcome::RawSimilarity { .. }
                | MatchOutcome::ExactLeftover
                | MatchOutcome::ProportionalOverlap
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchOutcome::StrippedSimilarity { .. } => "stripped_similarity",
            MatchOutcome::RawSimilarity { .. } => "raw_similarity",
            MatchOutcome::ExactLeftover => "exact_leftover",
            MatchOutcome::ProportionalOverlap => "proportional_overlap",
            MatchOutcome::NoComparableContent => "no_comparable_content",
            MatchOutcome::Insufficient => "insufficient",
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOutcome::StrippedSimilarity { percent }
            | MatchOutcome::RawSimilarity { percent } => {
                write!(f, "{} ({:.2}%)", self.as_str(), percent)
            }
            _ => f.write_str(self.as_str()),
        }
    }
}

/// Similarity percentage a pair must reach, by codepoint lengths.
#[inline]
pub fn similarity_threshold(len_a: usize, len_b: usize) -> f64 {
    if len_a > LONG_FRAGMENT_CHARS && len_b > LONG_FRAGMENT_CHARS {
        LONG_SIMILARITY_THRESHOLD
    } else {
        SHORT_SIMILARITY_THRESHOLD
    }
}

/// Match strategy for list item contents.
///
/// Generic over its three capabilities so alternate strippers, scorers and
/// affix finders can be injected; the defaults reproduce the reference
/// behaviour.
#[derive(Debug, Clone, Default)]
pub struct ListItemMatchStrategy<S = TagStripper, C = LcsScorer, F = CharAffixFinder> {
    config: MatcherConfig,
    stripper: S,
    scorer: C,
    affixes: F,
}

impl ListItemMatchStrategy {
    /// Create with default thresholds and capabilities
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom thresholds. The config is used as given; see
    /// [`Self::try_with_config`] for a validating constructor.
    pub fn with_config(config: MatcherConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Validate `config` and create the strategy
    pub fn try_with_config(config: MatcherConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }
}

impl<S, C, F> ListItemMatchStrategy<S, C, F>
where
    S: MarkupStripper,
    C: SimilarityScorer,
    F: AffixFinder,
{
    /// Create with injected capabilities
    pub fn with_capabilities(config: MatcherConfig, stripper: S, scorer: C, affixes: F) -> Self {
        Self {
            config,
            stripper,
            scorer,
            affixes,
        }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Similarity percentage of the tag-stripped fragments
    pub fn stripped_similarity(&self, a: &str, b: &str) -> f64 {
        self.score(&self.stripper.strip(a), &self.stripper.strip(b))
    }

    /// Similarity percentage of the raw fragments
    pub fn raw_similarity(&self, a: &str, b: &str) -> f64 {
        self.score(a, b)
    }

    /// Run the checks in order and report which one decided.
    pub fn explain(&self, a: &str, b: &str) -> MatchOutcome {
        let outcome = self.evaluate(a, b);
        trace!(outcome = outcome.as_str(), "List item comparison");
        outcome
    }

    fn evaluate(&self, a: &str, b: &str) -> MatchOutcome {
        let threshold = similarity_threshold(char_len(a), char_len(b));

        let a_stripped = self.stripper.strip(a);
        let b_stripped = self.stripper.strip(b);

        let percent = self.score(&a_stripped, &b_stripped);
        if percent >= threshold {
            return MatchOutcome::StrippedSimilarity { percent };
        }

        let percent = self.score(a, b);
        if percent >= threshold {
            return MatchOutcome::RawSimilarity { percent };
        }

        self.affix_overlap(a, b, &a_stripped, &b_stripped)
    }

    fn affix_overlap(&self, a: &str, b: &str, a_stripped: &str, b_stripped: &str) -> MatchOutcome {
        let mut a_cleaned = trim_fragment(a_stripped);
        let mut b_cleaned = trim_fragment(b_stripped);

        // Pure-markup fragments compare by their markup
        if a_cleaned.is_empty() || b_cleaned.is_empty() {
            a_cleaned = a;
            b_cleaned = b;
        }
        if a_cleaned.is_empty() || b_cleaned.is_empty() {
            return MatchOutcome::NoComparableContent;
        }

        let prefix = self.affixes.common_prefix_len(a_cleaned, b_cleaned);
        let suffix = self.affixes.common_suffix_len(a_cleaned, b_cleaned);
        let common = prefix + suffix;

        // Both non-zero: the cleaned fragments are non-empty slices of, or
        // equal to, the originals
        let shorter = char_len(a_cleaned).min(char_len(b_cleaned));
        let longest_original = char_len(a).max(char_len(b));
        let length_ratio = shorter as f64 / longest_original as f64;

        // Prefix and suffix may overlap, so common can exceed shorter
        if common >= shorter && length_ratio > self.config.length_ratio_threshold {
            return MatchOutcome::ExactLeftover;
        }

        let common_ratio = common as f64 / shorter as f64;
        if length_ratio > MIN_OVERLAP_LENGTH_RATIO
            && common_ratio > self.config.common_text_ratio_threshold
        {
            return MatchOutcome::ProportionalOverlap;
        }

        MatchOutcome::Insufficient
    }

    /// Score in a fixed argument order so the decision is symmetric.
    fn score(&self, a: &str, b: &str) -> f64 {
        if a <= b {
            self.scorer.percent(a, b)
        } else {
            self.scorer.percent(b, a)
        }
    }
}

impl<S, C, F> MatchStrategy for ListItemMatchStrategy<S, C, F>
where
    S: MarkupStripper,
    C: SimilarityScorer,
    F: AffixFinder,
{
    fn is_match(&self, a: &str, b: &str) -> bool {
        self.explain(a, b).is_match()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::borrow::Cow;

    fn strategy() -> ListItemMatchStrategy {
        ListItemMatchStrategy::new()
    }

    #[test]
    fn test_threshold_selection() {
        assert_eq!(similarity_threshold(71, 71), 60.0);
        assert_eq!(similarity_threshold(70, 200), 100.0);
        assert_eq!(similarity_threshold(200, 70), 100.0);
        assert_eq!(similarity_threshold(0, 0), 100.0);
    }

    #[test]
    fn test_identical_fragments() {
        assert_eq!(
            strategy().explain("hello", "hello"),
            MatchOutcome::StrippedSimilarity { percent: 100.0 }
        );
    }

    #[test]
    fn test_markup_only_differs() {
        assert_eq!(
            strategy().explain("<b>hello</b>", "<i>hello</i>"),
            MatchOutcome::StrippedSimilarity { percent: 100.0 }
        );
    }

    #[test]
    fn test_raw_similarity_when_stripping_differs() {
        // Nothing is left after stripping, the raw markup still matches
        let s = strategy();
        let outcome = s.explain("<img src=\"a.png\">", "<img src=\"a.png\">");
        assert_eq!(outcome, MatchOutcome::RawSimilarity { percent: 100.0 });
    }

    #[test]
    fn test_both_empty() {
        assert_eq!(
            strategy().explain("", ""),
            MatchOutcome::NoComparableContent
        );
    }

    #[test]
    fn test_one_empty() {
        assert_eq!(
            strategy().explain("", "hello"),
            MatchOutcome::NoComparableContent
        );
    }

    #[test]
    fn test_exact_leftover() {
        assert_eq!(
            strategy().explain("Item: Apple", "Item: Apple (fresh)"),
            MatchOutcome::ExactLeftover
        );
    }

    #[test]
    fn test_exact_leftover_needs_length_ratio() {
        // "a" is the whole prefix of the other fragment but only 1/20 of it
        let long = "abcdefghijklmnopqrst";
        assert_eq!(strategy().explain("a", long), MatchOutcome::Insufficient);

        let lenient = ListItemMatchStrategy::with_config(MatcherConfig::new(0.01, 0.6));
        assert_eq!(lenient.explain("a", long), MatchOutcome::ExactLeftover);
    }

    #[test]
    fn test_proportional_overlap() {
        // prefix "Buy " (4) + suffix " milk" (5) over shorter length 12
        let a = "Buy some milk";
        let b = "Buy oat milk";
        assert_eq!(strategy().explain(a, b), MatchOutcome::ProportionalOverlap);
    }

    #[test]
    fn test_proportional_overlap_respects_config() {
        let strict = ListItemMatchStrategy::with_config(MatcherConfig::new(0.1, 0.9));
        assert_eq!(
            strict.explain("Buy some milk", "Buy oat milk"),
            MatchOutcome::Insufficient
        );
    }

    #[test]
    fn test_unrelated() {
        assert_eq!(
            strategy().explain("Apples", "Bicycles"),
            MatchOutcome::Insufficient
        );
    }

    #[test]
    fn test_pure_markup_falls_back_to_raw() {
        // No text after stripping; affixes are measured on the raw markup
        let outcome = strategy().explain("<hr class=\"a\">", "<hr class=\"b\">");
        assert_eq!(outcome, MatchOutcome::ProportionalOverlap);
    }

    #[test]
    fn test_whitespace_is_trimmed_before_affixes() {
        assert_eq!(
            strategy().explain("  Item: Apple\n", "Item: Apple (fresh)"),
            MatchOutcome::ExactLeftover
        );
    }

    #[test]
    fn test_try_with_config_validates() {
        assert!(ListItemMatchStrategy::try_with_config(MatcherConfig::new(0.2, 0.5)).is_ok());
        assert!(ListItemMatchStrategy::try_with_config(MatcherConfig::new(0.2, 5.0)).is_err());
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(
            MatchOutcome::RawSimilarity { percent: 62.5 }.to_string(),
            "raw_similarity (62.50%)"
        );
        assert_eq!(MatchOutcome::ExactLeftover.to_string(), "exact_leftover");
        assert!(!MatchOutcome::Insufficient.is_match());
    }

    #[test]
    fn test_outcome_serializes_with_check_tag() {
        let json =
            serde_json::to_value(MatchOutcome::StrippedSimilarity { percent: 100.0 }).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"check": "stripped_similarity", "percent": 100.0})
        );
        let json = serde_json::to_value(MatchOutcome::Insufficient).unwrap();
        assert_eq!(json, serde_json::json!({"check": "insufficient"}));
    }

    struct NoStrip;

    impl MarkupStripper for NoStrip {
        fn strip<'a>(&self, text: &'a str) -> Cow<'a, str> {
            Cow::Borrowed(text)
        }
    }

    struct FixedScore(f64);

    impl SimilarityScorer for FixedScore {
        fn percent(&self, _a: &str, _b: &str) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_injected_capabilities() {
        let always = ListItemMatchStrategy::with_capabilities(
            MatcherConfig::default(),
            NoStrip,
            FixedScore(100.0),
            CharAffixFinder,
        );
        assert!(always.is_match("Apples", "Bicycles"));

        let never = ListItemMatchStrategy::with_capabilities(
            MatcherConfig::default(),
            NoStrip,
            FixedScore(0.0),
            CharAffixFinder,
        );
        // Markup is kept, so the affixes see "<b>" vs "<i>" and miss
        assert!(!never.is_match("<b>x</b>", "<i>y</i>"));
        assert!(never.is_match("Item: Apple", "Item: Apple (fresh)"));
    }
}
