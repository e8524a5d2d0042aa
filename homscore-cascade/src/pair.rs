//! Filter/full score pairs and the two-stage decision rule over them.

use core::fmt;

use homscore_classn::Outcome;

/// The cheap filter score and expensive full score of one instance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterFullPair {
    filter_score: f64,
    full_score: f64,
}

impl FilterFullPair {
    pub fn new(filter_score: f64, full_score: f64) -> Self {
        Self {
            filter_score,
            full_score,
        }
    }

    pub fn filter_score(&self) -> f64 {
        self.filter_score
    }

    pub fn full_score(&self) -> f64 {
        self.full_score
    }
}

impl fmt::Display for FilterFullPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FilterFullPair[filter: {}; full: {}]",
            self.filter_score, self.full_score
        )
    }
}

/// A candidate filter threshold for one full-score cutoff.
///
/// An instance is *wanted* (truly positive) when its full score reaches
/// `cutoff`, and *selected* (predicted positive) when its filter score
/// reaches `threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterAttempt {
    threshold: f64,
    cutoff: f64,
}

impl FilterAttempt {
    pub fn new(threshold: f64, cutoff: f64) -> Self {
        Self { threshold, cutoff }
    }

    /// Minimum filter score to be selected.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Minimum full score to be wanted.
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    #[inline]
    pub fn is_wanted(&self, pair: &FilterFullPair) -> bool {
        pair.full_score >= self.cutoff
    }

    #[inline]
    pub fn is_selected(&self, pair: &FilterFullPair) -> bool {
        pair.filter_score >= self.threshold
    }

    /// Outcome of the attempt on one pair.
    #[inline]
    pub fn classify(&self, pair: &FilterFullPair) -> Outcome {
        Outcome::classify(self.is_wanted(pair), self.is_selected(pair))
    }
}

impl fmt::Display for FilterAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FilterAttempt[threshold: {}; cutoff: {}]",
            self.threshold, self.cutoff
        )
    }
}
