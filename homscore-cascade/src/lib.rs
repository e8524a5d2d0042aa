//! Calibration of two-stage filter-then-full scoring cascades.
//!
//! A cheap filter score decides which candidates get an expensive full
//! score. Given historical `(filter, full)` pairs, [`FilterFullList`] finds
//! the filter threshold that keeps a target fraction of the candidates whose
//! full score reaches a cutoff, and measures the whole cascade's
//! [`ConfusionMatrix`](homscore_classn::ConfusionMatrix) at that threshold.
//!
//! ```
//! use homscore_cascade::{FilterFullList, FilterFullPair};
//!
//! let list: FilterFullList = [(1.0, 10.0), (4.0, 60.0), (2.0, 70.0), (6.0, 80.0)]
//!     .into_iter()
//!     .map(|(filter, full)| FilterFullPair::new(filter, full))
//!     .collect();
//!
//! // Keep every pair with a full score of at least 60.
//! let threshold = list.threshold_for_sensitivity(60.0, 1.0).unwrap();
//! assert_eq!(threshold, 2.0);
//! ```

pub mod config;
pub mod list;
pub mod pair;

pub use config::CalibrationConfig;
pub use list::{sensitivity_shortfall, FilterFullList};
pub use pair::{FilterAttempt, FilterFullPair};
