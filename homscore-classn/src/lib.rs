//! Classification quality of homology scores.
//!
//! Measures how well a scalar score separates positive from negative
//! instances, from score series through to curve areas:
//!
//! - **Instances**: [`ScoredInstance`] and the [`ScoreOrder`] that ranks them
//! - **Series**: [`NamedScoreSeries`], kept sorted best-first
//! - **Collections**: [`ScoreSeriesCollection`] over one shared instance set
//! - **Confusion matrices**: [`ConfusionMatrix`] and the threshold sweep
//!   [`ConfusionMatrixSequence`]
//! - **Rate statistics**: exact [`RateStatistic`] ratios (sensitivity,
//!   precision, fall-out, ...)
//! - **Curves**: ROC and precision-recall [`CurveSeries`] with trapezoidal AUC
//! - **SVM-light**: training data writer, prediction reader, [`RbfModel`]
//!
//! # Example
//!
//! ```
//! use homscore_classn::{area_under_roc_curve_of_series, NamedScoreSeries, ScoredInstance};
//!
//! let series = NamedScoreSeries::from_values(
//!     "ssap",
//!     true,
//!     vec![
//!         ScoredInstance::new(0.9, true, "a"),
//!         ScoredInstance::new(0.7, false, "b"),
//!         ScoredInstance::new(0.5, true, "c"),
//!         ScoredInstance::new(0.3, false, "d"),
//!     ],
//! );
//! let auc = area_under_roc_curve_of_series(&series);
//! assert!((auc - 0.75).abs() < 1e-12);
//! ```

pub mod collection;
pub mod confusion;
pub mod curve;
pub mod instance;
pub mod rate;
pub mod rbf;
pub mod reader;
pub mod scaling;
pub mod series;
pub mod svmlight;

pub use collection::{MetricScore, ScoreSeriesCollection};
pub use confusion::{ConfusionMatrix, ConfusionMatrixSequence, Outcome};
pub use curve::{
    area_under_curve, area_under_roc_curve, area_under_roc_curve_of_series, make_series,
    precision_recall_series, roc_series, CurveSeries,
};
pub use instance::{ScoreOrder, ScoredInstance};
pub use rate::{RateStatistic, PRECISION_RECALL_RATES, ROC_RATES};
pub use rbf::{RbfModel, SupportVector};
pub use reader::{read_series, read_series_file, read_svm_light_predictions};
pub use scaling::ValueListScaling;
pub use series::{correlated_data, NamedScoreSeries};
pub use svmlight::{
    format_g17, random_split, write_svm_light_data_files, write_svm_light_rows,
    SvmLightSplitConfig,
};
