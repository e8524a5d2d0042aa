//! Rate statistics of the form `A / (A + B)` over confusion-matrix counts.
//!
//! Every [`RateStatistic`] is defined by a numerator outcome `A` and a second
//! outcome `B` that joins it in the denominator (sensitivity is
//! `TP / (TP + FN)`, precision is `TP / (TP + FP)`, and so on). The
//! definitions live in one `const` table that is indexed at compile time:
//! a statistic missing from the table, or listed twice, fails the build.
//!
//! Results are exact [`SizeRatio`]s. A denominator of zero is floored at one,
//! so a statistic over a matrix with no relevant instances is `0/1`.

use core::fmt;

use homscore_core::SizeRatio;

use crate::confusion::{ConfusionMatrix, Outcome};

/// The standard rate statistics.
///
/// Several are synonyms (sensitivity, recall, hit rate and true positive
/// rate are the same quantity); they are kept distinct so each carries its
/// conventional name as an axis label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RateStatistic {
    /// `TP / (TP + FN)`
    Sensitivity,
    /// `TP / (TP + FN)`
    Recall,
    /// `TP / (TP + FN)`
    HitRate,
    /// `TP / (TP + FN)`
    TruePositiveRate,
    /// `TN / (TN + FP)`
    Specificity,
    /// `TN / (TN + FP)`
    TrueNegativeRate,
    /// `TP / (TP + FP)`
    Precision,
    /// `TP / (TP + FP)`
    PositivePredictiveValue,
    /// `FP / (FP + TN)`
    FallOut,
    /// `FP / (FP + TN)`
    FalsePositiveRate,
    /// `FP / (FP + TP)`
    FalseDiscoveryRate,
}

/// Numerator and extra denominator outcome of each statistic.
const NUMERATOR_AND_DENOMINATOR: [(RateStatistic, Outcome, Outcome); 11] = [
    (RateStatistic::Sensitivity, Outcome::TruePositive, Outcome::FalseNegative),
    (RateStatistic::Recall, Outcome::TruePositive, Outcome::FalseNegative),
    (RateStatistic::HitRate, Outcome::TruePositive, Outcome::FalseNegative),
    (RateStatistic::TruePositiveRate, Outcome::TruePositive, Outcome::FalseNegative),
    (RateStatistic::Specificity, Outcome::TrueNegative, Outcome::FalsePositive),
    (RateStatistic::TrueNegativeRate, Outcome::TrueNegative, Outcome::FalsePositive),
    (RateStatistic::Precision, Outcome::TruePositive, Outcome::FalsePositive),
    (RateStatistic::PositivePredictiveValue, Outcome::TruePositive, Outcome::FalsePositive),
    (RateStatistic::FallOut, Outcome::FalsePositive, Outcome::TrueNegative),
    (RateStatistic::FalsePositiveRate, Outcome::FalsePositive, Outcome::TrueNegative),
    (RateStatistic::FalseDiscoveryRate, Outcome::FalsePositive, Outcome::TruePositive),
];

const NUM_STATISTICS: usize = RateStatistic::ALL.len();

/// [`NUMERATOR_AND_DENOMINATOR`] re-indexed by discriminant.
const OUTCOMES_BY_STATISTIC: [(Outcome, Outcome); NUM_STATISTICS] = index_outcome_table();

const fn index_outcome_table() -> [(Outcome, Outcome); NUM_STATISTICS] {
    let mut indexed = [(Outcome::TruePositive, Outcome::TruePositive); NUM_STATISTICS];
    let mut seen = [false; NUM_STATISTICS];

    let mut i = 0;
    while i < NUMERATOR_AND_DENOMINATOR.len() {
        let (stat, numerator, denominator) = NUMERATOR_AND_DENOMINATOR[i];
        let idx = stat as usize;
        assert!(!seen[idx], "rate statistic listed twice in outcome table");
        seen[idx] = true;
        indexed[idx] = (numerator, denominator);
        i += 1;
    }

    let mut j = 0;
    while j < NUM_STATISTICS {
        assert!(seen[j], "rate statistic missing from outcome table");
        j += 1;
    }
    indexed
}

impl RateStatistic {
    /// Every statistic, in declaration order.
    pub const ALL: [RateStatistic; 11] = [
        RateStatistic::Sensitivity,
        RateStatistic::Recall,
        RateStatistic::HitRate,
        RateStatistic::TruePositiveRate,
        RateStatistic::Specificity,
        RateStatistic::TrueNegativeRate,
        RateStatistic::Precision,
        RateStatistic::PositivePredictiveValue,
        RateStatistic::FallOut,
        RateStatistic::FalsePositiveRate,
        RateStatistic::FalseDiscoveryRate,
    ];

    /// The outcome counted in the numerator.
    pub fn numerator(self) -> Outcome {
        OUTCOMES_BY_STATISTIC[self as usize].0
    }

    /// The outcome that joins the numerator in the denominator.
    pub fn denominator(self) -> Outcome {
        OUTCOMES_BY_STATISTIC[self as usize].1
    }

    /// Compute `A / max(A + B, 1)` for this statistic.
    pub fn calculate(self, matrix: &ConfusionMatrix) -> SizeRatio {
        let numerator = matrix.get(self.numerator());
        let other = matrix.get(self.denominator());
        SizeRatio::floored(numerator, numerator + other)
    }

    /// Human-readable name, suitable as a plot axis label.
    pub fn name(self) -> &'static str {
        match self {
            RateStatistic::Sensitivity => "Sensitivity",
            RateStatistic::Recall => "Recall",
            RateStatistic::HitRate => "Hit Rate",
            RateStatistic::TruePositiveRate => "True Positive Rate",
            RateStatistic::Specificity => "Specificity",
            RateStatistic::TrueNegativeRate => "True Negative Rate",
            RateStatistic::Precision => "Precision",
            RateStatistic::PositivePredictiveValue => "Positive Predictive Value",
            RateStatistic::FallOut => "Fall Out",
            RateStatistic::FalsePositiveRate => "False Positive Rate",
            RateStatistic::FalseDiscoveryRate => "False Discovery Rate",
        }
    }
}

impl fmt::Display for RateStatistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The x and y statistics of a ROC curve.
pub const ROC_RATES: (RateStatistic, RateStatistic) =
    (RateStatistic::FalsePositiveRate, RateStatistic::TruePositiveRate);

/// The x and y statistics of a precision-recall curve.
pub const PRECISION_RECALL_RATES: (RateStatistic, RateStatistic) =
    (RateStatistic::Recall, RateStatistic::Precision);
