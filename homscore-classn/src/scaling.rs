//! Linear rescaling of score values.

/// A linear map `value * multiplier + constant`.
///
/// [`NamedScoreSeries::scaling`](crate::series::NamedScoreSeries::scaling)
/// builds one that sends a series' worst score to 0 and its best to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueListScaling {
    /// Factor applied first.
    pub multiplier: f64,
    /// Offset added after multiplying.
    pub constant: f64,
}

impl ValueListScaling {
    /// Create a scaling.
    pub fn new(multiplier: f64, constant: f64) -> Self {
        Self {
            multiplier,
            constant,
        }
    }

    /// The scaling that maps `worst` to 0 and `best` to 1.
    ///
    /// If `best == worst` the multiplier is 1, so every value shifts by the
    /// same constant instead of dividing by zero.
    pub fn from_worst_and_best(worst: f64, best: f64) -> Self {
        let worst_to_best = best - worst;
        let multiplier = if worst_to_best != 0.0 {
            1.0 / worst_to_best
        } else {
            1.0
        };
        Self {
            multiplier,
            constant: -(multiplier * worst),
        }
    }

    /// Apply the scaling to one value.
    #[inline]
    pub fn scale(&self, value: f64) -> f64 {
        value * self.multiplier + self.constant
    }
}

impl Default for ValueListScaling {
    /// The identity scaling.
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}
