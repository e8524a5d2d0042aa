//! A name-keyed set of score series over one universe of instances.
//!
//! Once a [`ScoreSeriesCollection`] holds a series, every further series must
//! score exactly the same instance ids. Series that miss some ids can be
//! brought in with [`ScoreSeriesCollection::add_and_impute_missing`], which
//! fills the gaps at a fallback score first.

use std::collections::BTreeSet;

use homscore_core::{Annotated, Diagnosed, Diagnostic, HomscoreError, Result};
use tracing::{debug, warn};

use crate::confusion::ConfusionMatrixSequence;
use crate::curve::{make_series, CurveSeries};
use crate::instance::ScoredInstance;
use crate::rate::{RateStatistic, PRECISION_RECALL_RATES, ROC_RATES};
use crate::scaling::ValueListScaling;
use crate::series::{self, NamedScoreSeries};

/// How many offending ids an error or diagnostic quotes.
const MAX_EXAMPLE_IDS: usize = 6;

/// One metric's score for one instance, as produced by a multi-metric
/// comparison record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricScore {
    /// Metric name; becomes the series name.
    pub name: String,
    /// The score.
    pub value: f64,
    /// Direction of the metric.
    pub higher_is_better: bool,
}

impl MetricScore {
    pub fn new(name: impl Into<String>, value: f64, higher_is_better: bool) -> Self {
        Self {
            name: name.into(),
            value,
            higher_is_better,
        }
    }
}

/// Score series kept sorted and unique on name, all covering the same ids.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreSeriesCollection {
    series: Vec<NamedScoreSeries>,
}

fn quoted_examples<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    ids.into_iter()
        .take(MAX_EXAMPLE_IDS)
        .map(str::to_string)
        .collect()
}

impl ScoreSeriesCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from series that may each miss some instances.
    ///
    /// Each series is added with [`add_and_impute_missing`](Self::add_and_impute_missing)
    /// at its own worst possible score. Note that only ids already
    /// established by earlier series can be imputed, so the first series
    /// must cover every instance.
    pub fn from_series_list<I>(list: I) -> Result<Diagnosed<Self>>
    where
        I: IntoIterator<Item = NamedScoreSeries>,
    {
        let mut collection = Self::new();
        let mut diagnostics = Vec::new();
        for series in list {
            let fallback = series.worst_possible_score();
            let added = collection.add_and_impute_missing(series, fallback)?;
            diagnostics.extend(added.diagnostics);
        }
        Ok(Diagnosed {
            value: collection,
            diagnostics,
        })
    }

    /// Number of series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether the collection holds no series.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// The series, sorted by name.
    pub fn series(&self) -> &[NamedScoreSeries] {
        &self.series
    }

    /// Iterate the series in name order.
    pub fn iter(&self) -> std::slice::Iter<'_, NamedScoreSeries> {
        self.series.iter()
    }

    /// Add a series covering exactly the established instance ids.
    ///
    /// # Errors
    ///
    /// - [`HomscoreError::InconsistentInstanceSet`] if the collection is
    ///   non-empty and the ids differ from those already present.
    /// - [`HomscoreError::DuplicateSeriesName`] if the name is taken.
    ///
    /// The collection is unchanged on error.
    pub fn add(&mut self, series: NamedScoreSeries) -> Result<()> {
        if let Some(front) = self.series.first() {
            if !front.instance_ids_match(&series) {
                return Err(HomscoreError::InconsistentInstanceSet(format!(
                    "series {} does not cover the same instances as series {}",
                    series.name(),
                    front.name()
                )));
            }
        }
        let idx = match self
            .series
            .binary_search_by(|s| s.name().cmp(series.name()))
        {
            Ok(_) => return Err(HomscoreError::DuplicateSeriesName(series.name().to_string())),
            Err(idx) => idx,
        };
        debug!(
            series = series.name(),
            instances = series.len(),
            "adding score series"
        );
        self.series.insert(idx, series);
        Ok(())
    }

    /// Add a series after giving it a `fallback_score` entry for every
    /// established instance id it lacks.
    ///
    /// Imputed instances take their positive/negative label from the
    /// established series. Returns how many were imputed, with an
    /// [`Diagnostic::ImputedMissingInstances`] when that is non-zero.
    ///
    /// # Errors
    ///
    /// [`HomscoreError::InconsistentInstanceSet`] if the series scores ids
    /// that the collection does not know, plus any error of [`add`](Self::add).
    /// The collection is unchanged on error.
    pub fn add_and_impute_missing(
        &mut self,
        mut series: NamedScoreSeries,
        fallback_score: f64,
    ) -> Result<Diagnosed<usize>> {
        let Some(front) = self.series.first() else {
            self.add(series)?;
            return Ok(Diagnosed::clean(0));
        };

        let established = front.sorted_instance_ids();
        let (unknown, missing) = {
            let incoming = series.sorted_instance_ids();
            let unknown = quoted_examples(incoming.difference(&established).copied());
            let missing: BTreeSet<String> = established
                .difference(&incoming)
                .map(|id| id.to_string())
                .collect();
            (unknown, missing)
        };
        if !unknown.is_empty() {
            return Err(HomscoreError::InconsistentInstanceSet(format!(
                "series {} scores instances not in the collection, e.g. {}",
                series.name(),
                unknown.join(", ")
            )));
        }

        let mut diagnostics = Vec::new();
        if !missing.is_empty() {
            let examples = quoted_examples(missing.iter().map(String::as_str));
            warn!(
                series = series.name(),
                count = missing.len(),
                fallback_score,
                examples = %examples.join(", "),
                "imputing missing instances"
            );
            for instance in front.iter().filter(|v| missing.contains(v.instance_id())) {
                series.add(ScoredInstance::new(
                    fallback_score,
                    instance.is_positive(),
                    instance.instance_id(),
                ));
            }
            diagnostics.push(Diagnostic::ImputedMissingInstances {
                series: series.name().to_string(),
                count: missing.len(),
                examples,
            });
        }

        self.add(series)?;
        Ok(Diagnosed {
            value: missing.len(),
            diagnostics,
        })
    }

    /// Fan one multi-metric record out to one series per metric.
    ///
    /// The first call creates a series for each metric. Later calls must
    /// name exactly the same metrics with the same directions.
    ///
    /// # Errors
    ///
    /// [`HomscoreError::InconsistentMetricSet`] on a repeated metric name, a
    /// metric set that differs from the established one, or a direction that
    /// conflicts with an existing series.
    /// [`HomscoreError::InconsistentInstanceSet`] if `instance_id` is already
    /// in the collection. The collection is unchanged on error.
    pub fn add_from_per_instance_scores(
        &mut self,
        scores: &[MetricScore],
        is_positive: bool,
        instance_id: &str,
    ) -> Result<()> {
        let mut sorted: Vec<&MetricScore> = scores.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        if let Some(w) = sorted.windows(2).find(|w| w[0].name == w[1].name) {
            return Err(HomscoreError::InconsistentMetricSet(format!(
                "metric {} given twice for instance {}",
                w[0].name, instance_id
            )));
        }

        if self.series.is_empty() {
            self.series = sorted
                .iter()
                .map(|m| NamedScoreSeries::new(m.name.clone(), m.higher_is_better))
                .collect();
        } else {
            let names_match = sorted.len() == self.series.len()
                && sorted
                    .iter()
                    .zip(&self.series)
                    .all(|(m, s)| m.name == s.name());
            if !names_match {
                return Err(HomscoreError::InconsistentMetricSet(format!(
                    "instance {} has metrics [{}] but the collection has [{}]",
                    instance_id,
                    sorted.iter().map(|m| m.name.as_str()).collect::<Vec<_>>().join(", "),
                    self.names().join(", ")
                )));
            }
            if let Some((m, _)) = sorted
                .iter()
                .zip(&self.series)
                .find(|(m, s)| m.higher_is_better != s.higher_is_better())
            {
                return Err(HomscoreError::InconsistentMetricSet(format!(
                    "metric {} changes direction at instance {}",
                    m.name, instance_id
                )));
            }
            let seen = self
                .series
                .first()
                .is_some_and(|s| s.iter().any(|v| v.instance_id() == instance_id));
            if seen {
                return Err(HomscoreError::InconsistentInstanceSet(format!(
                    "instance {} already has scores in the collection",
                    instance_id
                )));
            }
        }

        for (metric, series) in sorted.iter().zip(self.series.iter_mut()) {
            series.add(ScoredInstance::new(metric.value, is_positive, instance_id));
        }
        Ok(())
    }

    /// Look up a series by name.
    ///
    /// # Errors
    ///
    /// [`HomscoreError::NotFound`] if no series has that name.
    pub fn get(&self, name: &str) -> Result<&NamedScoreSeries> {
        self.series
            .binary_search_by(|s| s.name().cmp(name))
            .map(|idx| &self.series[idx])
            .map_err(|_| HomscoreError::NotFound(format!("score series {}", name)))
    }

    /// Series names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.series.iter().map(Annotated::name).collect()
    }

    /// The shared instance ids, sorted.
    pub fn instance_ids(&self) -> Vec<&str> {
        self.series
            .first()
            .map(|s| s.sorted_instance_ids().into_iter().collect())
            .unwrap_or_default()
    }

    /// Number of instances each series covers.
    pub fn num_instances(&self) -> usize {
        self.series.first().map_or(0, NamedScoreSeries::len)
    }

    /// Direction of the series at `index` (in name order).
    ///
    /// # Errors
    ///
    /// [`HomscoreError::NotFound`] if `index` is out of range.
    pub fn higher_is_better_of_index(&self, index: usize) -> Result<bool> {
        self.series
            .get(index)
            .map(NamedScoreSeries::higher_is_better)
            .ok_or_else(|| {
                HomscoreError::NotFound(format!(
                    "series index {} in a collection of {}",
                    index,
                    self.series.len()
                ))
            })
    }

    /// The worst-to-best scaling of every series, in name order.
    pub fn scalings(&self) -> Result<Vec<ValueListScaling>> {
        self.series.iter().map(NamedScoreSeries::scaling).collect()
    }

    /// Pair up two named series' scores per instance.
    pub fn correlated_data(&self, name_a: &str, name_b: &str) -> Result<Vec<(f64, f64)>> {
        series::correlated_data(self.get(name_a)?, self.get(name_b)?)
    }

    /// Sweep every series' threshold.
    pub fn confusion_sequences(&self) -> Vec<ConfusionMatrixSequence> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            self.series
                .par_iter()
                .map(ConfusionMatrixSequence::build)
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            self.series
                .iter()
                .map(ConfusionMatrixSequence::build)
                .collect()
        }
    }

    /// One curve of `x_statistic` against `y_statistic` per series.
    pub fn curve_series_list(
        &self,
        x_statistic: RateStatistic,
        y_statistic: RateStatistic,
    ) -> Vec<CurveSeries> {
        self.confusion_sequences()
            .iter()
            .map(|seq| make_series(seq, x_statistic, y_statistic))
            .collect()
    }

    /// ROC curve of every series.
    pub fn roc_series_list(&self) -> Vec<CurveSeries> {
        self.curve_series_list(ROC_RATES.0, ROC_RATES.1)
    }

    /// Precision-recall curve of every series.
    pub fn precision_recall_series_list(&self) -> Vec<CurveSeries> {
        self.curve_series_list(PRECISION_RECALL_RATES.0, PRECISION_RECALL_RATES.1)
    }
}

impl<'a> IntoIterator for &'a ScoreSeriesCollection {
    type Item = &'a NamedScoreSeries;
    type IntoIter = std::slice::Iter<'a, NamedScoreSeries>;

    fn into_iter(self) -> Self::IntoIter {
        self.series.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homscore_core::Scored;

    fn series(name: &str, higher: bool, values: &[(f64, bool, &str)]) -> NamedScoreSeries {
        NamedScoreSeries::from_values(
            name,
            higher,
            values
                .iter()
                .map(|&(s, p, id)| ScoredInstance::new(s, p, id))
                .collect(),
        )
    }

    fn ssap() -> NamedScoreSeries {
        series(
            "ssap",
            true,
            &[(80.0, true, "a"), (60.0, false, "b"), (70.0, true, "c")],
        )
    }

    fn rmsd() -> NamedScoreSeries {
        series(
            "rmsd",
            false,
            &[(1.5, true, "a"), (4.0, false, "b"), (2.5, true, "c")],
        )
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter("homscore_classn=debug")
            .try_init();
    }

    fn collection() -> ScoreSeriesCollection {
        let mut c = ScoreSeriesCollection::new();
        c.add(ssap()).unwrap();
        c.add(rmsd()).unwrap();
        c
    }

    #[test]
    fn kept_sorted_on_name() {
        let c = collection();
        assert_eq!(c.names(), vec!["rmsd", "ssap"]);
        assert_eq!(c.len(), 2);
        assert_eq!(c.num_instances(), 3);
        assert_eq!(c.instance_ids(), vec!["a", "b", "c"]);
        assert!(!c.higher_is_better_of_index(0).unwrap());
        assert!(c.higher_is_better_of_index(1).unwrap());
        assert!(c.higher_is_better_of_index(2).is_err());
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut c = collection();
        let before = c.clone();
        assert!(matches!(
            c.add(ssap()),
            Err(HomscoreError::DuplicateSeriesName(name)) if name == "ssap"
        ));
        assert_eq!(c, before);
    }

    #[test]
    fn inconsistent_instances_rejected() {
        let mut c = collection();
        let before = c.clone();
        let other = series("dali", true, &[(1.0, true, "a"), (2.0, false, "z"), (3.0, true, "c")]);
        assert!(matches!(
            c.add(other),
            Err(HomscoreError::InconsistentInstanceSet(_))
        ));
        assert_eq!(c, before);
    }

    #[test]
    fn get_by_name() {
        let c = collection();
        assert_eq!(c.get("rmsd").unwrap().name(), "rmsd");
        assert!(matches!(c.get("tmscore"), Err(HomscoreError::NotFound(_))));
    }

    #[test]
    fn imputes_missing_ids_from_front_labels() {
        init_tracing();
        let mut c = collection();
        let partial = series("dali", true, &[(9.0, false, "b")]);
        let added = c.add_and_impute_missing(partial, -1.0).unwrap();
        assert_eq!(added.value, 2);
        assert_eq!(added.diagnostics.len(), 1);
        match &added.diagnostics[0] {
            Diagnostic::ImputedMissingInstances { series, count, examples } => {
                assert_eq!(series, "dali");
                assert_eq!(*count, 2);
                assert_eq!(examples, &vec!["a".to_string(), "c".to_string()]);
            }
            other => panic!("unexpected diagnostic {:?}", other),
        }

        let dali = c.get("dali").unwrap();
        assert_eq!(dali.len(), 3);
        let imputed = dali.values_of_instance_ids(&["a", "c"]).unwrap();
        assert!(imputed.iter().all(|v| v.score() == -1.0 && v.is_positive()));
        assert_eq!(dali.instance_ids()[0], "b");
    }

    #[test]
    fn imputation_rejects_unknown_ids() {
        let mut c = collection();
        let before = c.clone();
        let extra = series("dali", true, &[(9.0, false, "b"), (1.0, true, "new")]);
        assert!(matches!(
            c.add_and_impute_missing(extra, 0.0),
            Err(HomscoreError::InconsistentInstanceSet(msg)) if msg.contains("new")
        ));
        assert_eq!(c, before);
    }

    #[test]
    fn imputation_is_idempotent_when_nothing_is_missing() {
        let original = collection();
        let mut rebuilt = ScoreSeriesCollection::new();
        for s in original.iter().cloned() {
            let fallback = s.worst_possible_score();
            let added = rebuilt.add_and_impute_missing(s, fallback).unwrap();
            assert_eq!(added.value, 0);
            assert!(added.is_clean());
        }
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn from_series_list_imputes_at_worst_possible() {
        let built = ScoreSeriesCollection::from_series_list(vec![
            ssap(),
            series("rmsd", false, &[(1.5, true, "a")]),
        ])
        .unwrap();
        assert_eq!(built.diagnostics.len(), 1);
        let rmsd = built.value.get("rmsd").unwrap();
        assert_eq!(rmsd.worst_score().unwrap(), 1.5);
        assert_eq!(rmsd.values().last().unwrap().score(), f64::MAX);
    }

    #[test]
    fn per_instance_scores_fan_out() {
        let mut c = ScoreSeriesCollection::new();
        c.add_from_per_instance_scores(
            &[MetricScore::new("ssap", 80.0, true), MetricScore::new("rmsd", 1.5, false)],
            true,
            "a",
        )
        .unwrap();
        c.add_from_per_instance_scores(
            &[MetricScore::new("rmsd", 4.0, false), MetricScore::new("ssap", 60.0, true)],
            false,
            "b",
        )
        .unwrap();
        assert_eq!(c.names(), vec!["rmsd", "ssap"]);
        assert_eq!(c.get("ssap").unwrap().instance_ids(), vec!["a", "b"]);
        assert_eq!(c.get("rmsd").unwrap().instance_ids(), vec!["a", "b"]);
    }

    #[test]
    fn per_instance_scores_reject_metric_mismatch() {
        let mut c = ScoreSeriesCollection::new();
        c.add_from_per_instance_scores(&[MetricScore::new("ssap", 80.0, true)], true, "a")
            .unwrap();
        let before = c.clone();

        let extra = [MetricScore::new("ssap", 1.0, true), MetricScore::new("rmsd", 1.0, false)];
        assert!(matches!(
            c.add_from_per_instance_scores(&extra, true, "b"),
            Err(HomscoreError::InconsistentMetricSet(_))
        ));
        let flipped = [MetricScore::new("ssap", 1.0, false)];
        assert!(matches!(
            c.add_from_per_instance_scores(&flipped, true, "b"),
            Err(HomscoreError::InconsistentMetricSet(_))
        ));
        let repeated = [MetricScore::new("ssap", 1.0, true), MetricScore::new("ssap", 2.0, true)];
        assert!(c.add_from_per_instance_scores(&repeated, true, "b").is_err());
        assert_eq!(c, before);
    }

    #[test]
    fn per_instance_scores_reject_repeated_instance() {
        let mut c = ScoreSeriesCollection::new();
        let scores = [MetricScore::new("ssap", 80.0, true), MetricScore::new("rmsd", 1.5, false)];
        c.add_from_per_instance_scores(&scores, true, "a").unwrap();
        let before = c.clone();

        assert!(matches!(
            c.add_from_per_instance_scores(&scores, false, "a"),
            Err(HomscoreError::InconsistentInstanceSet(_))
        ));
        assert_eq!(c, before);

        c.add(series("ssap2", true, &[(5.0, true, "a")])).unwrap();
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn scalings_and_correlation() {
        let c = collection();
        let scalings = c.scalings().unwrap();
        assert_eq!(scalings.len(), 2);
        // rmsd: worst 4.0 -> 0, best 1.5 -> 1
        assert!(scalings[0].scale(4.0).abs() < 1e-12);
        assert!((scalings[0].scale(1.5) - 1.0).abs() < 1e-12);

        let pairs = c.correlated_data("ssap", "rmsd").unwrap();
        assert_eq!(pairs, vec![(80.0, 1.5), (70.0, 2.5), (60.0, 4.0)]);
    }

    #[test]
    fn curves_per_series() {
        let c = collection();
        let rocs = c.roc_series_list();
        assert_eq!(rocs.len(), 2);
        assert_eq!(rocs[0].name(), "rmsd");
        for roc in &rocs {
            assert!((roc.area() - 1.0).abs() < 1e-12);
        }
        let prs = c.precision_recall_series_list();
        assert_eq!(prs[1].axis_labels(), ("Recall", "Precision"));
        assert_eq!(c.confusion_sequences()[1].len(), 3);
    }
}
