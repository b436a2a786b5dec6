//! List item matching for structural HTML diffs
//!
//! Given two fragments taken from corresponding positions of two document
//! versions, decide whether they are the same item (possibly edited) or
//! unrelated items. A diff engine uses the answer to tell moved or edited
//! items apart from replaced ones.
//!
//! # Features
//!
//! - `parallel` - Score large candidate lists with rayon
//!
//! # Example
//!
//! ```rust
//! use listmatch_core::{ListItemMatchStrategy, MatchStrategy, MatchOutcome};
//!
//! let strategy = ListItemMatchStrategy::new();
//!
//! assert!(strategy.is_match("<b>hello</b>", "<i>hello</i>"));
//! assert!(!strategy.is_match("Apples", "Bicycles"));
//!
//! let outcome = strategy.explain("Item: Apple", "Item: Apple (fresh)");
//! assert_eq!(outcome, MatchOutcome::ExactLeftover);
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod similarity;
pub mod strategy;
pub mod text;

// Re-export main types at crate root
pub use batch::{all_matches, first_match};
pub use config::MatcherConfig;
pub use error::{ConfigError, ConfigResult};
pub use similarity::{similar_text, LcsScorer, Similarity, SimilarityScorer};
pub use strategy::{ListItemMatchStrategy, MatchOutcome, MatchStrategy};
pub use text::{AffixFinder, CharAffixFinder, MarkupStripper, TagStripper};
