//! Exact ratios of counts.
//!
//! [`SizeRatio`] holds a `numerator / denominator` pair of `usize` counts in
//! lowest terms, so two ratios compare equal exactly when they denote the
//! same rational number. Rate statistics computed from confusion matrices
//! are returned as `SizeRatio` rather than `f64` so tests can compare them
//! exactly.

use core::cmp::Ordering;
use core::fmt;

use crate::{HomscoreError, Result};

/// A non-negative rational number with `usize` numerator and denominator,
/// always stored in lowest terms with a non-zero denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizeRatio {
    numer: usize,
    denom: usize,
}

impl SizeRatio {
    /// Create a ratio, reducing it to lowest terms.
    ///
    /// # Errors
    ///
    /// Returns an error if `denom` is zero.
    pub fn new(numer: usize, denom: usize) -> Result<Self> {
        if denom == 0 {
            return Err(HomscoreError::InvalidInput(
                "SizeRatio::new: denominator must be non-zero".into(),
            ));
        }
        Ok(Self::reduced(numer, denom))
    }

    /// Create `numer / max(denom, 1)`, reduced to lowest terms.
    ///
    /// This never fails: an empty denominator is floored at one, so
    /// `floored(0, 0)` is zero.
    pub fn floored(numer: usize, denom: usize) -> Self {
        Self::reduced(numer, denom.max(1))
    }

    fn reduced(numer: usize, denom: usize) -> Self {
        let g = gcd(numer, denom);
        Self {
            numer: numer / g,
            denom: denom / g,
        }
    }

    /// The zero ratio `0/1`.
    pub const fn zero() -> Self {
        Self { numer: 0, denom: 1 }
    }

    /// The unit ratio `1/1`.
    pub const fn one() -> Self {
        Self { numer: 1, denom: 1 }
    }

    /// Numerator in lowest terms.
    pub fn numer(&self) -> usize {
        self.numer
    }

    /// Denominator in lowest terms (never zero).
    pub fn denom(&self) -> usize {
        self.denom
    }

    /// Nearest `f64` to this ratio.
    pub fn to_f64(self) -> f64 {
        self.numer as f64 / self.denom as f64
    }
}

impl Default for SizeRatio {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialOrd for SizeRatio {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SizeRatio {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.numer as u128 * other.denom as u128;
        let rhs = other.numer as u128 * self.denom as u128;
        lhs.cmp(&rhs)
    }
}

impl From<SizeRatio> for f64 {
    fn from(r: SizeRatio) -> f64 {
        r.to_f64()
    }
}

impl fmt::Display for SizeRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numer, self.denom)
    }
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    // gcd(0, 0) only arises for a zero denominator, which callers exclude.
    a.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduces_to_lowest_terms() {
        let r = SizeRatio::new(8, 14).unwrap();
        assert_eq!(r.numer(), 4);
        assert_eq!(r.denom(), 7);
        assert_eq!(r, SizeRatio::new(4, 7).unwrap());
    }

    #[test]
    fn zero_denominator_rejected() {
        assert!(SizeRatio::new(3, 0).is_err());
    }

    #[test]
    fn floored_never_divides_by_zero() {
        assert_eq!(SizeRatio::floored(0, 0), SizeRatio::zero());
        assert_eq!(SizeRatio::floored(5, 0), SizeRatio::new(5, 1).unwrap());
        assert_eq!(SizeRatio::floored(2, 4), SizeRatio::new(1, 2).unwrap());
    }

    #[test]
    fn zero_numerator_normalises() {
        assert_eq!(SizeRatio::new(0, 26).unwrap(), SizeRatio::zero());
    }

    #[test]
    fn ordering_is_exact() {
        let third = SizeRatio::new(1, 3).unwrap();
        let half = SizeRatio::new(1, 2).unwrap();
        assert!(third < half);
        assert!(SizeRatio::new(2, 6).unwrap() == third);
        assert_eq!(half.max(third), half);
    }

    #[test]
    fn converts_and_displays() {
        let r = SizeRatio::new(6, 26).unwrap();
        assert!((r.to_f64() - 6.0 / 26.0).abs() < 1e-15);
        assert_eq!(r.to_string(), "3/13");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn equal_ratios_cross_multiply(n in 0usize..10_000, d in 1usize..10_000, k in 1usize..50) {
            let a = SizeRatio::new(n, d).unwrap();
            let b = SizeRatio::new(n * k, d * k).unwrap();
            prop_assert_eq!(a, b);
            prop_assert_eq!(a.cmp(&b), Ordering::Equal);
        }
    }
}
