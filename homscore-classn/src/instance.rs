//! Scored, labelled instances and the ordering that ranks them.

use core::cmp::Ordering;
use core::fmt;

use homscore_core::Scored;

/// One score produced by a comparison method for one labelled instance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoredInstance {
    score: f64,
    is_positive: bool,
    instance_id: String,
}

impl ScoredInstance {
    /// Create a scored instance.
    pub fn new(score: f64, is_positive: bool, instance_id: impl Into<String>) -> Self {
        Self {
            score,
            is_positive,
            instance_id: instance_id.into(),
        }
    }

    /// Whether the instance is a true member of the positive class.
    pub fn is_positive(&self) -> bool {
        self.is_positive
    }

    /// Identifier of the instance (unique within a series).
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }
}

impl Scored for ScoredInstance {
    fn score(&self) -> f64 {
        self.score
    }
}

impl fmt::Display for ScoredInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ScoredInstance[{} ({}) : {}]",
            self.instance_id,
            if self.is_positive { "positive" } else { "negative" },
            self.score
        )
    }
}

/// Direction in which scores improve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreOrder {
    higher_is_better: bool,
}

impl ScoreOrder {
    /// Higher scores rank first.
    pub const HIGHER_IS_BETTER: Self = Self {
        higher_is_better: true,
    };
    /// Lower scores rank first.
    pub const LOWER_IS_BETTER: Self = Self {
        higher_is_better: false,
    };

    /// Build from a flag.
    pub fn new(higher_is_better: bool) -> Self {
        Self { higher_is_better }
    }

    /// Whether higher scores are better.
    pub fn higher_is_better(&self) -> bool {
        self.higher_is_better
    }

    /// Compare two scores so that the better one sorts first.
    ///
    /// Uses `total_cmp`, so NaN sorts consistently rather than poisoning the
    /// ordering.
    pub fn compare(&self, a: f64, b: f64) -> Ordering {
        if self.higher_is_better {
            b.total_cmp(&a)
        } else {
            a.total_cmp(&b)
        }
    }

    /// Whether score `a` is strictly better than score `b`.
    pub fn is_better(&self, a: f64, b: f64) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    /// A sentinel score that nothing real can be worse than.
    ///
    /// Used to impute scores for instances a method failed to score.
    pub fn worst_possible_score(&self) -> f64 {
        if self.higher_is_better {
            f64::MIN
        } else {
            f64::MAX
        }
    }
}
