//! Candidate search over lists of fragments
//!
//! On native with the `parallel` feature, large candidate lists are scored
//! with rayon. Results are identical to the sequential path. The rayon branch
//! is only compiled, and tested, with `cargo test -p listmatch-core --features
//! parallel`.

use crate::strategy::MatchStrategy;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Candidate count at which [`all_matches`] switches to parallel scoring
pub const PARALLEL_THRESHOLD: usize = 64;

/// Index of the first candidate matching `needle`, scanning in order.
pub fn first_match<S, T>(strategy: &S, needle: &str, candidates: &[T]) -> Option<usize>
where
    S: MatchStrategy + ?Sized,
    T: AsRef<str>,
{
    candidates
        .iter()
        .position(|candidate| strategy.is_match(needle, candidate.as_ref()))
}

/// Indices of all candidates matching `needle`, ascending.
#[cfg(feature = "parallel")]
pub fn all_matches<S, T>(strategy: &S, needle: &str, candidates: &[T]) -> Vec<usize>
where
    S: MatchStrategy + ?Sized,
    T: AsRef<str> + Sync,
{
    if candidates.len() >= PARALLEL_THRESHOLD {
        candidates
            .par_iter()
            .enumerate()
            .filter(|(_, candidate)| strategy.is_match(needle, candidate.as_ref()))
            .map(|(idx, _)| idx)
            .collect()
    } else {
        matches_sequential(strategy, needle, candidates)
    }
}

/// Indices of all candidates matching `needle`, ascending.
#[cfg(not(feature = "parallel"))]
pub fn all_matches<S, T>(strategy: &S, needle: &str, candidates: &[T]) -> Vec<usize>
where
    S: MatchStrategy + ?Sized,
    T: AsRef<str> + Sync,
{
    matches_sequential(strategy, needle, candidates)
}

fn matches_sequential<S, T>(strategy: &S, needle: &str, candidates: &[T]) -> Vec<usize>
where
    S: MatchStrategy + ?Sized,
    T: AsRef<str>,
{
    candidates
        .iter()
        .enumerate()
        .filter(|(_, candidate)| strategy.is_match(needle, candidate.as_ref()))
        .map(|(idx, _)| idx)
        .collect()
}
