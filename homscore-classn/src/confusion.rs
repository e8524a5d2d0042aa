//! Binary confusion matrices and threshold sweeps.
//!
//! A [`ConfusionMatrix`] counts true/false positives/negatives at one
//! decision threshold. A [`ConfusionMatrixSequence`] is obtained by sweeping
//! the threshold of a [`NamedScoreSeries`] from "reject all" to "accept all".

use core::fmt;
use core::ops::{Add, AddAssign};

use homscore_core::{Annotated, HomscoreError, Result, Scored};

use crate::series::NamedScoreSeries;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// The four outcomes of a binary classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    /// Actually positive, predicted positive.
    TruePositive,
    /// Actually negative, predicted negative.
    TrueNegative,
    /// Actually negative, predicted positive.
    FalsePositive,
    /// Actually positive, predicted negative.
    FalseNegative,
}

impl Outcome {
    /// Every outcome, in the order TP, TN, FP, FN.
    pub const ALL: [Outcome; 4] = [
        Outcome::TruePositive,
        Outcome::TrueNegative,
        Outcome::FalsePositive,
        Outcome::FalseNegative,
    ];

    /// Classify an instance from its true class and the predicted class.
    pub fn classify(actual_positive: bool, predicted_positive: bool) -> Self {
        match (actual_positive, predicted_positive) {
            (true, true) => Outcome::TruePositive,
            (false, false) => Outcome::TrueNegative,
            (false, true) => Outcome::FalsePositive,
            (true, false) => Outcome::FalseNegative,
        }
    }

    /// Short label ("TP", "TN", "FP" or "FN").
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Outcome::TruePositive => "TP",
            Outcome::TrueNegative => "TN",
            Outcome::FalsePositive => "FP",
            Outcome::FalseNegative => "FN",
        }
    }
}

// ---------------------------------------------------------------------------
// Confusion Matrix
// ---------------------------------------------------------------------------

/// Counts of the four outcomes of a binary classifier at one threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfusionMatrix {
    /// Positives predicted positive.
    pub true_positives: usize,
    /// Negatives predicted negative.
    pub true_negatives: usize,
    /// Negatives predicted positive.
    pub false_positives: usize,
    /// Positives predicted negative.
    pub false_negatives: usize,
}

impl ConfusionMatrix {
    /// Build from the four counts, in the order TP, TN, FP, FN.
    pub fn new(
        true_positives: usize,
        true_negatives: usize,
        false_positives: usize,
        false_negatives: usize,
    ) -> Self {
        Self {
            true_positives,
            true_negatives,
            false_positives,
            false_negatives,
        }
    }

    /// The count for one outcome.
    #[inline]
    pub fn get(&self, outcome: Outcome) -> usize {
        match outcome {
            Outcome::TruePositive => self.true_positives,
            Outcome::TrueNegative => self.true_negatives,
            Outcome::FalsePositive => self.false_positives,
            Outcome::FalseNegative => self.false_negatives,
        }
    }

    fn get_mut(&mut self, outcome: Outcome) -> &mut usize {
        match outcome {
            Outcome::TruePositive => &mut self.true_positives,
            Outcome::TrueNegative => &mut self.true_negatives,
            Outcome::FalsePositive => &mut self.false_positives,
            Outcome::FalseNegative => &mut self.false_negatives,
        }
    }

    /// Total number of instances counted.
    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    /// Number of actual positives (`TP + FN`).
    pub fn actual_positives(&self) -> usize {
        self.true_positives + self.false_negatives
    }

    /// Number of actual negatives (`TN + FP`).
    pub fn actual_negatives(&self) -> usize {
        self.true_negatives + self.false_positives
    }

    /// Number of instances predicted positive (`TP + FP`).
    pub fn predicted_positives(&self) -> usize {
        self.true_positives + self.false_positives
    }

    /// Move instances from predicted-negative to predicted-positive:
    /// `num_positives` from FN to TP and `num_negatives` from TN to FP.
    ///
    /// # Errors
    ///
    /// Returns an error (leaving the matrix unchanged) if more positives
    /// than false negatives, or more negatives than true negatives, would
    /// be moved.
    pub fn move_to_predicted_positive(
        &mut self,
        num_positives: usize,
        num_negatives: usize,
    ) -> Result<()> {
        if num_positives > self.false_negatives {
            return Err(HomscoreError::InvalidInput(format!(
                "cannot move {} positives out of {} false negatives",
                num_positives, self.false_negatives
            )));
        }
        if num_negatives > self.true_negatives {
            return Err(HomscoreError::InvalidInput(format!(
                "cannot move {} negatives out of {} true negatives",
                num_negatives, self.true_negatives
            )));
        }
        self.true_positives += num_positives;
        self.false_negatives -= num_positives;
        self.false_positives += num_negatives;
        self.true_negatives -= num_negatives;
        Ok(())
    }
}

impl Add for ConfusionMatrix {
    type Output = ConfusionMatrix;

    fn add(self, rhs: Self) -> Self {
        Self {
            true_positives: self.true_positives + rhs.true_positives,
            true_negatives: self.true_negatives + rhs.true_negatives,
            false_positives: self.false_positives + rhs.false_positives,
            false_negatives: self.false_negatives + rhs.false_negatives,
        }
    }
}

impl AddAssign for ConfusionMatrix {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl AddAssign<Outcome> for ConfusionMatrix {
    fn add_assign(&mut self, outcome: Outcome) {
        *self.get_mut(outcome) += 1;
    }
}

impl core::iter::Sum for ConfusionMatrix {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl FromIterator<Outcome> for ConfusionMatrix {
    fn from_iter<I: IntoIterator<Item = Outcome>>(iter: I) -> Self {
        let mut matrix = Self::default();
        for outcome in iter {
            matrix += outcome;
        }
        matrix
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConfusionMatrix[TP: {:>4}; TN: {:>4}; FP: {:>4}; FN: {:>4}]",
            self.true_positives, self.true_negatives, self.false_positives, self.false_negatives
        )
    }
}

// ---------------------------------------------------------------------------
// Sequence
// ---------------------------------------------------------------------------

/// The confusion matrices obtained by sweeping a series' decision threshold
/// from best score to worst.
///
/// Holds one matrix per instance. The matrix for instance `i` counts every
/// instance scoring at least as well as `i` as predicted positive, so tied
/// scores are always selected together and share a matrix. The reject-all
/// matrix that precedes the sweep is kept separately as [`initial`].
///
/// [`initial`]: ConfusionMatrixSequence::initial
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfusionMatrixSequence {
    name: String,
    initial: ConfusionMatrix,
    matrices: Vec<ConfusionMatrix>,
}

impl ConfusionMatrixSequence {
    /// Sweep the threshold of `series` from best to worst.
    pub fn build(series: &NamedScoreSeries) -> Self {
        let values = series.values();
        let order = series.order();
        let num_positives = values.iter().filter(|v| v.is_positive()).count();
        let num_negatives = values.len() - num_positives;

        let initial = ConfusionMatrix::new(0, num_negatives, 0, num_positives);
        let mut running = initial;
        let mut matrices = Vec::with_capacity(values.len());

        let mut i = 0;
        while i < values.len() {
            // Find the end of the tie group.
            let mut j = i + 1;
            while j < values.len() && order.compare(values[j].score(), values[i].score()).is_eq() {
                j += 1;
            }
            let group_positives = values[i..j].iter().filter(|v| v.is_positive()).count();
            let group_negatives = (j - i) - group_positives;
            running.true_positives += group_positives;
            running.false_negatives -= group_positives;
            running.false_positives += group_negatives;
            running.true_negatives -= group_negatives;

            matrices.extend(core::iter::repeat(running).take(j - i));
            i = j;
        }

        Self {
            name: series.name().to_string(),
            initial,
            matrices,
        }
    }

    /// The reject-all matrix: nothing predicted positive.
    pub fn initial(&self) -> &ConfusionMatrix {
        &self.initial
    }

    /// Number of per-instance matrices (equal to the series size).
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    /// Whether the sequence was built from an empty series.
    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    /// Matrix after selecting the instance at `index` (and its ties).
    pub fn get(&self, index: usize) -> Option<&ConfusionMatrix> {
        self.matrices.get(index)
    }

    /// The per-instance matrices, best instance first.
    pub fn matrices(&self) -> &[ConfusionMatrix] {
        &self.matrices
    }

    /// Iterate the per-instance matrices.
    pub fn iter(&self) -> core::slice::Iter<'_, ConfusionMatrix> {
        self.matrices.iter()
    }

    /// Iterate the reject-all matrix followed by the per-instance matrices.
    pub fn iter_from_initial(&self) -> impl Iterator<Item = &ConfusionMatrix> + '_ {
        core::iter::once(&self.initial).chain(self.matrices.iter())
    }
}

impl Annotated for ConfusionMatrixSequence {
    fn name(&self) -> &str {
        &self.name
    }
}

impl<'a> IntoIterator for &'a ConfusionMatrixSequence {
    type Item = &'a ConfusionMatrix;
    type IntoIter = core::slice::Iter<'a, ConfusionMatrix>;

    fn into_iter(self) -> Self::IntoIter {
        self.matrices.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::ScoredInstance;

    fn lower_is_better_fixture() -> NamedScoreSeries {
        NamedScoreSeries::from_values(
            "fixture",
            false,
            vec![
                ScoredInstance::new(3.0, true, "a"),
                ScoredInstance::new(3.1, false, "b"),
                ScoredInstance::new(3.2, true, "c"),
                ScoredInstance::new(3.3, true, "d"),
                ScoredInstance::new(3.4, true, "e1"),
                ScoredInstance::new(3.4, false, "e2"),
                ScoredInstance::new(3.5, true, "f"),
                ScoredInstance::new(3.6, false, "g"),
                ScoredInstance::new(3.7, false, "h"),
                ScoredInstance::new(3.8, true, "i"),
                ScoredInstance::new(3.9, false, "j"),
            ],
        )
    }

    // ── Confusion Matrix ────────────────────────────────────────

    #[test]
    fn classify_covers_all_outcomes() {
        assert_eq!(Outcome::classify(true, true), Outcome::TruePositive);
        assert_eq!(Outcome::classify(false, false), Outcome::TrueNegative);
        assert_eq!(Outcome::classify(false, true), Outcome::FalsePositive);
        assert_eq!(Outcome::classify(true, false), Outcome::FalseNegative);
    }

    #[test]
    fn get_matches_fields() {
        let cm = ConfusionMatrix::new(8, 20, 6, 15);
        assert_eq!(cm.get(Outcome::TruePositive), 8);
        assert_eq!(cm.get(Outcome::TrueNegative), 20);
        assert_eq!(cm.get(Outcome::FalsePositive), 6);
        assert_eq!(cm.get(Outcome::FalseNegative), 15);
        assert_eq!(cm.total(), 49);
        assert_eq!(cm.actual_positives(), 23);
        assert_eq!(cm.actual_negatives(), 26);
        assert_eq!(cm.predicted_positives(), 14);
    }

    #[test]
    fn addition_is_commutative_and_associative() {
        let a = ConfusionMatrix::new(1, 2, 3, 4);
        let b = ConfusionMatrix::new(5, 0, 1, 2);
        let c = ConfusionMatrix::new(0, 7, 0, 1);
        assert_eq!(a + b, b + a);
        assert_eq!((a + b) + c, a + (b + c));
        assert_eq!([a, b, c].into_iter().sum::<ConfusionMatrix>(), a + b + c);
    }

    #[test]
    fn outcomes_collect_into_matrix() {
        let cm: ConfusionMatrix = [
            Outcome::TruePositive,
            Outcome::TruePositive,
            Outcome::FalseNegative,
            Outcome::TrueNegative,
        ]
        .into_iter()
        .collect();
        assert_eq!(cm, ConfusionMatrix::new(2, 1, 0, 1));
    }

    #[test]
    fn move_to_predicted_positive_updates_counts() {
        let mut cm = ConfusionMatrix::new(0, 5, 0, 6);
        cm.move_to_predicted_positive(2, 1).unwrap();
        assert_eq!(cm, ConfusionMatrix::new(2, 4, 1, 4));
    }

    #[test]
    fn move_to_predicted_positive_rejects_overdraw() {
        let mut cm = ConfusionMatrix::new(0, 1, 0, 1);
        assert!(cm.move_to_predicted_positive(2, 0).is_err());
        assert!(cm.move_to_predicted_positive(0, 2).is_err());
        assert_eq!(cm, ConfusionMatrix::new(0, 1, 0, 1));
    }

    #[test]
    fn display_format() {
        let cm = ConfusionMatrix::new(8, 20, 6, 15);
        assert_eq!(
            cm.to_string(),
            "ConfusionMatrix[TP:    8; TN:   20; FP:    6; FN:   15]"
        );
    }

    // ── Sequence ────────────────────────────────────────────────

    #[test]
    fn sequence_has_one_matrix_per_instance() {
        let series = lower_is_better_fixture();
        let seq = ConfusionMatrixSequence::build(&series);
        assert_eq!(seq.len(), 11);
        assert_eq!(seq.name(), "fixture");
        assert_eq!(*seq.initial(), ConfusionMatrix::new(0, 5, 0, 6));
    }

    #[test]
    fn sequence_ends_accepting_all() {
        let seq = ConfusionMatrixSequence::build(&lower_is_better_fixture());
        let last = seq.matrices().last().unwrap();
        assert_eq!(last.false_negatives, 0);
        assert_eq!(last.true_negatives, 0);
        assert_eq!(*last, ConfusionMatrix::new(6, 0, 5, 0));
    }

    #[test]
    fn tied_instances_share_a_matrix() {
        let seq = ConfusionMatrixSequence::build(&lower_is_better_fixture());
        // e1 and e2 (both 3.4) sit at positions 4 and 5.
        assert_eq!(seq.get(4), seq.get(5));
        assert_eq!(*seq.get(5).unwrap(), ConfusionMatrix::new(4, 3, 2, 2));
        // Before the tie: a, b, c, d selected.
        assert_eq!(*seq.get(3).unwrap(), ConfusionMatrix::new(3, 4, 1, 3));
    }

    #[test]
    fn empty_series_gives_empty_sequence() {
        let series = NamedScoreSeries::new("empty", true);
        let seq = ConfusionMatrixSequence::build(&series);
        assert!(seq.is_empty());
        assert_eq!(*seq.initial(), ConfusionMatrix::default());
        assert_eq!(seq.iter_from_initial().count(), 1);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::instance::ScoredInstance;
    use proptest::prelude::*;

    fn instances() -> impl Strategy<Value = Vec<(i8, bool)>> {
        proptest::collection::vec((-5i8..5, any::<bool>()), 0..60)
    }

    proptest! {
        #[test]
        fn sweep_invariants_hold(raw in instances(), higher in any::<bool>()) {
            let values: Vec<ScoredInstance> = raw
                .iter()
                .enumerate()
                .map(|(i, &(s, p))| ScoredInstance::new(f64::from(s), p, format!("id{}", i)))
                .collect();
            let n = values.len();
            let num_pos = raw.iter().filter(|r| r.1).count();
            let series = NamedScoreSeries::from_values("p", higher, values);
            let seq = ConfusionMatrixSequence::build(&series);

            prop_assert_eq!(seq.len(), n);
            let mut prev_tp = 0;
            let mut prev_tn = n - num_pos;
            for m in seq.iter() {
                prop_assert_eq!(m.total(), n);
                prop_assert_eq!(m.actual_positives(), num_pos);
                prop_assert_eq!(m.actual_negatives(), n - num_pos);
                prop_assert!(m.true_positives >= prev_tp);
                prop_assert!(m.true_negatives <= prev_tn);
                prev_tp = m.true_positives;
                prev_tn = m.true_negatives;
            }
            if let Some(last) = seq.matrices().last() {
                prop_assert_eq!(last.false_negatives, 0);
                prop_assert_eq!(last.true_negatives, 0);
            }
        }
    }
}
