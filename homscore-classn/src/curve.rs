//! Curves of one rate statistic against another, and the areas under them.
//!
//! A [`CurveSeries`] pairs two [`RateStatistic`]s over a
//! [`ConfusionMatrixSequence`], starting from the reject-all matrix so ROC
//! curves begin at the origin. [`area_under_curve`] integrates the points
//! with the trapezoidal rule in the order they are stored.

use homscore_core::Annotated;

use crate::confusion::{ConfusionMatrix, ConfusionMatrixSequence};
use crate::rate::{RateStatistic, PRECISION_RECALL_RATES, ROC_RATES};
use crate::series::NamedScoreSeries;

/// A named sequence of `(x, y)` points, one per threshold.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurveSeries {
    name: String,
    x_statistic: RateStatistic,
    y_statistic: RateStatistic,
    points: Vec<(f64, f64)>,
}

impl CurveSeries {
    /// Pair `x_statistic` with `y_statistic` over every matrix of `sequence`
    /// (reject-all matrix first).
    pub fn from_sequence(
        sequence: &ConfusionMatrixSequence,
        x_statistic: RateStatistic,
        y_statistic: RateStatistic,
        name: impl Into<String>,
    ) -> Self {
        let points = sequence
            .iter_from_initial()
            .map(|m| point(m, x_statistic, y_statistic))
            .collect();
        Self {
            name: name.into(),
            x_statistic,
            y_statistic,
            points,
        }
    }

    /// The `(x, y)` points in sweep order.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// The statistic on the x axis.
    pub fn x_statistic(&self) -> RateStatistic {
        self.x_statistic
    }

    /// The statistic on the y axis.
    pub fn y_statistic(&self) -> RateStatistic {
        self.y_statistic
    }

    /// Axis labels `(x, y)` for a plotting collaborator.
    pub fn axis_labels(&self) -> (&'static str, &'static str) {
        (self.x_statistic.name(), self.y_statistic.name())
    }

    /// Area under this curve (trapezoidal).
    pub fn area(&self) -> f64 {
        area_under_curve(&self.points)
    }
}

impl Annotated for CurveSeries {
    fn name(&self) -> &str {
        &self.name
    }
}

fn point(matrix: &ConfusionMatrix, x: RateStatistic, y: RateStatistic) -> (f64, f64) {
    (x.calculate(matrix).to_f64(), y.calculate(matrix).to_f64())
}

/// Build a curve named after the sequence.
pub fn make_series(
    sequence: &ConfusionMatrixSequence,
    x_statistic: RateStatistic,
    y_statistic: RateStatistic,
) -> CurveSeries {
    CurveSeries::from_sequence(sequence, x_statistic, y_statistic, sequence.name())
}

/// ROC curve (false positive rate against true positive rate).
pub fn roc_series(sequence: &ConfusionMatrixSequence) -> CurveSeries {
    make_series(sequence, ROC_RATES.0, ROC_RATES.1)
}

/// Precision-recall curve (recall against precision).
pub fn precision_recall_series(sequence: &ConfusionMatrixSequence) -> CurveSeries {
    make_series(sequence, PRECISION_RECALL_RATES.0, PRECISION_RECALL_RATES.1)
}

/// Trapezoidal area: sum of trapezoids between consecutive points, taken in
/// the order given.
///
/// The points are not re-sorted; a curve that doubles back on x subtracts
/// area. Curves swept from a score ordering are monotone in x already.
pub fn area_under_curve(points: &[(f64, f64)]) -> f64 {
    points
        .windows(2)
        .map(|w| (w[1].0 - w[0].0) * (w[1].1 + w[0].1) / 2.0)
        .sum()
}

/// Area under the ROC curve of a sequence.
pub fn area_under_roc_curve(sequence: &ConfusionMatrixSequence) -> f64 {
    roc_series(sequence).area()
}

/// Area under the ROC curve of a series, sweeping it first.
pub fn area_under_roc_curve_of_series(series: &NamedScoreSeries) -> f64 {
    area_under_roc_curve(&ConfusionMatrixSequence::build(series))
}
