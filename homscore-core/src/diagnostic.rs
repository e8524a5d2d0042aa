//! Non-fatal diagnostics that travel alongside a computed value.
//!
//! Some conditions are worth reporting but should not stop processing, such
//! as a calibrated threshold that falls short of its requested sensitivity.
//! Operations that can hit such conditions return a [`Diagnosed`] value
//! holding both the result and the list of [`Diagnostic`]s raised while
//! computing it.

use core::fmt;

/// A recoverable condition noticed while computing a result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Diagnostic {
    /// The realised sensitivity of a filter attempt is below the requested one.
    InsufficientSensitivity {
        /// Full-score cutoff of the attempt.
        cutoff: f64,
        /// The sensitivity the caller asked for.
        requested: f64,
        /// The sensitivity realised over the whole population.
        achieved: f64,
    },
    /// Missing instances were filled in with a fallback score before a series
    /// was added to a collection.
    ImputedMissingInstances {
        /// Name of the series that was extended.
        series: String,
        /// How many instances were imputed.
        count: usize,
        /// Up to six example instance ids.
        examples: Vec<String>,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::InsufficientSensitivity {
                cutoff,
                requested,
                achieved,
            } => write!(
                f,
                "filter for cutoff {} targeted sensitivity {} but achieved {}",
                cutoff, requested, achieved
            ),
            Diagnostic::ImputedMissingInstances {
                series,
                count,
                examples,
            } => write!(
                f,
                "imputed {} missing instances into series {}; examples include: {}",
                count,
                series,
                examples.join(", ")
            ),
        }
    }
}

/// A value together with the diagnostics raised while computing it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnosed<T> {
    /// The computed value.
    pub value: T,
    /// Non-fatal conditions noticed along the way (empty when all is well).
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Diagnosed<T> {
    /// Wrap a value with no diagnostics.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    /// Wrap a value with the given diagnostics.
    pub fn with(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    /// Whether no diagnostics were raised.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Transform the value, keeping the diagnostics.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Diagnosed<U> {
        Diagnosed {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }

    /// Discard the diagnostics.
    pub fn into_value(self) -> T {
        self.value
    }
}
