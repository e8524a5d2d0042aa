//! Calibrating a filter score against a full score.
//!
//! A [`FilterFullList`] holds the filter and full scores of a set of past
//! instances, sorted by full score. For a full-score cutoff (what counts as
//! a hit) and a target sensitivity, it finds the lowest filter threshold that
//! would have kept that fraction of the hits, then measures how the
//! resulting filter behaves over the whole population.

use homscore_classn::{ConfusionMatrix, RateStatistic};
use homscore_core::{Diagnosed, Diagnostic, HomscoreError, Result};
use tracing::{debug, warn};

use crate::config::{validate_sensitivity, CalibrationConfig};
use crate::pair::{FilterAttempt, FilterFullPair};

/// Filter/full score pairs sorted ascending by full score.
///
/// Equal full scores keep insertion order. All insertions go through
/// [`insert`](Self::insert) or [`from_pairs`](Self::from_pairs), which
/// maintain the ordering.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterFullList {
    entries: Vec<FilterFullPair>,
}

/// The filter score with `k = floor((1 - s) * n)` wanted entries below it.
///
/// `k` is clamped to `n - 1`, so a sensitivity of zero gives the largest
/// filter score in `wanted`.
fn threshold_of_wanted(wanted: &[FilterFullPair], sensitivity_fraction: f64) -> f64 {
    let mut filters: Vec<f64> = wanted.iter().map(FilterFullPair::filter_score).collect();
    let n = filters.len();
    let k = (((1.0 - sensitivity_fraction) * n as f64).floor() as usize).min(n - 1);
    let (_, kth, _) = filters.select_nth_unstable_by(k, |a, b| a.total_cmp(b));
    *kth
}

/// The diagnostic for an assessed attempt that keeps fewer wanted instances
/// than requested, if it does.
pub fn sensitivity_shortfall(
    attempt: &FilterAttempt,
    matrix: &ConfusionMatrix,
    requested: f64,
) -> Option<Diagnostic> {
    let achieved = RateStatistic::Sensitivity.calculate(matrix).to_f64();
    (achieved < requested).then(|| Diagnostic::InsufficientSensitivity {
        cutoff: attempt.cutoff(),
        requested,
        achieved,
    })
}

fn report(diagnostic: &Diagnostic) {
    if let Diagnostic::InsufficientSensitivity {
        cutoff,
        requested,
        achieved,
    } = diagnostic
    {
        warn!(cutoff, requested, achieved, "filter threshold falls short of requested sensitivity");
    }
}

fn strict_error(diagnostic: &Diagnostic) -> Option<HomscoreError> {
    match *diagnostic {
        Diagnostic::InsufficientSensitivity {
            requested,
            achieved,
            ..
        } => Some(HomscoreError::InsufficientSensitivity {
            requested,
            achieved,
        }),
        _ => None,
    }
}

impl FilterFullList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from unsorted pairs.
    pub fn from_pairs<I: IntoIterator<Item = FilterFullPair>>(pairs: I) -> Self {
        let mut entries: Vec<FilterFullPair> = pairs.into_iter().collect();
        entries.sort_by(|a, b| a.full_score().total_cmp(&b.full_score()));
        debug!(entries = entries.len(), "built filter/full list");
        Self { entries }
    }

    /// Insert a pair at its sorted position, after any equal full scores.
    pub fn insert(&mut self, pair: FilterFullPair) {
        let idx = self
            .entries
            .partition_point(|p| p.full_score().total_cmp(&pair.full_score()).is_le());
        self.entries.insert(idx, pair);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FilterFullPair> {
        self.entries.get(index)
    }

    /// The pairs in ascending full-score order.
    pub fn entries(&self) -> &[FilterFullPair] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilterFullPair> {
        self.entries.iter()
    }

    /// The entries with full score at or above `cutoff`.
    pub fn wanted(&self, cutoff: f64) -> &[FilterFullPair] {
        let start = self.entries.partition_point(|p| p.full_score() < cutoff);
        &self.entries[start..]
    }

    /// The lowest filter threshold that keeps `sensitivity_fraction` of the
    /// entries with full score at or above `cutoff`.
    ///
    /// A fraction of 1 gives the smallest wanted filter score; 0 gives the
    /// largest.
    ///
    /// # Errors
    ///
    /// - [`HomscoreError::InvalidInput`] if the fraction is outside `[0, 1]`
    ///   or `cutoff` is NaN.
    /// - [`HomscoreError::EmptyWantedSet`] if no entry reaches `cutoff`.
    pub fn threshold_for_sensitivity(&self, cutoff: f64, sensitivity_fraction: f64) -> Result<f64> {
        validate_sensitivity(sensitivity_fraction)?;
        // No full score is `>= NaN`, but `wanted(NaN)` would return everything.
        if cutoff.is_nan() {
            return Err(HomscoreError::InvalidInput(
                "full-score cutoff is NaN".to_string(),
            ));
        }
        let wanted = self.wanted(cutoff);
        if wanted.is_empty() {
            return Err(HomscoreError::EmptyWantedSet { cutoff });
        }
        Ok(threshold_of_wanted(wanted, sensitivity_fraction))
    }

    /// The threshold for `cutoff` as a two-stage decision rule.
    pub fn attempt_for_sensitivity(&self, cutoff: f64, sensitivity_fraction: f64) -> Result<FilterAttempt> {
        let threshold = self.threshold_for_sensitivity(cutoff, sensitivity_fraction)?;
        Ok(FilterAttempt::new(threshold, cutoff))
    }

    /// Classify every entry (not only the wanted ones) under `attempt`.
    pub fn assess(&self, attempt: &FilterAttempt) -> ConfusionMatrix {
        self.entries.iter().map(|p| attempt.classify(p)).collect()
    }

    /// Calibrate and assess a threshold for `cutoff`.
    ///
    /// A realised sensitivity below the request is logged and returned as a
    /// diagnostic rather than failing.
    pub fn result_for_sensitivity(
        &self,
        cutoff: f64,
        sensitivity_fraction: f64,
    ) -> Result<Diagnosed<ConfusionMatrix>> {
        let attempt = self.attempt_for_sensitivity(cutoff, sensitivity_fraction)?;
        let matrix = self.assess(&attempt);
        let diagnostics: Vec<Diagnostic> =
            sensitivity_shortfall(&attempt, &matrix, sensitivity_fraction)
                .into_iter()
                .collect();
        diagnostics.iter().for_each(report);
        Ok(Diagnosed::with(matrix, diagnostics))
    }

    /// [`result_for_sensitivity`](Self::result_for_sensitivity) using a
    /// config; a shortfall is an error when `config.strict` is set.
    pub fn result_with_config(
        &self,
        cutoff: f64,
        config: &CalibrationConfig,
    ) -> Result<Diagnosed<ConfusionMatrix>> {
        let result = self.result_for_sensitivity(cutoff, config.sensitivity_fraction)?;
        if config.strict {
            if let Some(err) = result.diagnostics.iter().find_map(strict_error) {
                return Err(err);
            }
        }
        Ok(result)
    }

    /// One attempt per numerically distinct full score, in ascending cutoff
    /// order.
    ///
    /// `-0.0` and `0.0` are the same cutoff. NaN full scores are never
    /// wanted and give no attempt.
    pub fn attempts_for_all_cutoffs(&self, sensitivity_fraction: f64) -> Result<Vec<FilterAttempt>> {
        validate_sensitivity(sensitivity_fraction)?;
        let mut attempts = Vec::new();
        let mut previous: Option<f64> = None;
        for pair in &self.entries {
            let cutoff = pair.full_score();
            if cutoff.is_nan() || previous == Some(cutoff) {
                continue;
            }
            previous = Some(cutoff);
            let wanted = self.wanted(cutoff);
            if wanted.is_empty() {
                continue;
            }
            let threshold = threshold_of_wanted(wanted, sensitivity_fraction);
            attempts.push(FilterAttempt::new(threshold, cutoff));
        }
        Ok(attempts)
    }

    /// Assess every attempt of
    /// [`attempts_for_all_cutoffs`](Self::attempts_for_all_cutoffs).
    pub fn results_for_all_cutoffs(
        &self,
        sensitivity_fraction: f64,
    ) -> Result<Vec<(FilterAttempt, ConfusionMatrix)>> {
        let attempts = self.attempts_for_all_cutoffs(sensitivity_fraction)?;

        #[cfg(feature = "parallel")]
        let results = {
            use rayon::prelude::*;
            attempts
                .into_par_iter()
                .map(|a| (a, self.assess(&a)))
                .collect()
        };
        #[cfg(not(feature = "parallel"))]
        let results = attempts
            .into_iter()
            .map(|a| (a, self.assess(&a)))
            .collect();

        Ok(results)
    }

    /// Calibrate a threshold for every distinct full score.
    ///
    /// Every shortfall is logged and returned as a diagnostic, or fails the
    /// calibration when `config.strict` is set.
    pub fn calibrate(&self, config: &CalibrationConfig) -> Result<Diagnosed<Vec<FilterAttempt>>> {
        config.validate()?;
        let results = self.results_for_all_cutoffs(config.sensitivity_fraction)?;
        let mut attempts = Vec::with_capacity(results.len());
        let mut diagnostics = Vec::new();
        for (attempt, matrix) in &results {
            if let Some(diag) = sensitivity_shortfall(attempt, matrix, config.sensitivity_fraction) {
                if config.strict {
                    if let Some(err) = strict_error(&diag) {
                        return Err(err);
                    }
                }
                report(&diag);
                diagnostics.push(diag);
            }
            attempts.push(*attempt);
        }
        debug!(
            cutoffs = attempts.len(),
            shortfalls = diagnostics.len(),
            "calibrated filter thresholds"
        );
        Ok(Diagnosed::with(attempts, diagnostics))
    }
}

impl FromIterator<FilterFullPair> for FilterFullList {
    fn from_iter<I: IntoIterator<Item = FilterFullPair>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl<'a> IntoIterator for &'a FilterFullList {
    type Item = &'a FilterFullPair;
    type IntoIter = std::slice::Iter<'a, FilterFullPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
