//! Named series of scored instances, kept sorted from best to worst.

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;

use homscore_core::{Annotated, HomscoreError, Result, Scored, Summarizable};

use crate::curve::area_under_roc_curve_of_series;
use crate::instance::{ScoreOrder, ScoredInstance};
use crate::scaling::ValueListScaling;

/// The scores one method assigned to a set of labelled instances.
///
/// Invariant: `values` is sorted best-first under the series' [`ScoreOrder`],
/// with equal scores kept in insertion order. The only ways to add values
/// are [`from_values`](Self::from_values) and [`add`](Self::add), which both
/// maintain it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamedScoreSeries {
    name: String,
    order: ScoreOrder,
    values: Vec<ScoredInstance>,
}

impl NamedScoreSeries {
    /// Create an empty series.
    pub fn new(name: impl Into<String>, higher_is_better: bool) -> Self {
        Self {
            name: name.into(),
            order: ScoreOrder::new(higher_is_better),
            values: Vec::new(),
        }
    }

    /// Create a series from unsorted values, sorting them best-first.
    ///
    /// The sort is stable, so equal scores keep their input order.
    pub fn from_values(
        name: impl Into<String>,
        higher_is_better: bool,
        mut values: Vec<ScoredInstance>,
    ) -> Self {
        let order = ScoreOrder::new(higher_is_better);
        values.sort_by(|a, b| order.compare(a.score(), b.score()));
        Self {
            name: name.into(),
            order,
            values,
        }
    }

    /// Insert a value at its sorted position, after any equal scores.
    pub fn add(&mut self, value: ScoredInstance) {
        let order = self.order;
        let idx = self
            .values
            .partition_point(|v| !order.is_better(value.score(), v.score()));
        self.values.insert(idx, value);
    }

    /// The ordering used by this series.
    pub fn order(&self) -> ScoreOrder {
        self.order
    }

    /// Whether higher scores are better.
    pub fn higher_is_better(&self) -> bool {
        self.order.higher_is_better()
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no instances.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The values, best first.
    pub fn values(&self) -> &[ScoredInstance] {
        &self.values
    }

    /// The value at `index` (0 is the best).
    pub fn get(&self, index: usize) -> Option<&ScoredInstance> {
        self.values.get(index)
    }

    /// Iterate the values, best first.
    pub fn iter(&self) -> std::slice::Iter<'_, ScoredInstance> {
        self.values.iter()
    }

    /// A score that nothing real can be worse than under this ordering.
    pub fn worst_possible_score(&self) -> f64 {
        self.order.worst_possible_score()
    }

    /// The best score.
    ///
    /// # Errors
    ///
    /// Returns an error if the series is empty.
    pub fn best_score(&self) -> Result<f64> {
        self.values
            .first()
            .map(Scored::score)
            .ok_or_else(|| HomscoreError::NotFound(format!("best score of empty series {}", self.name)))
    }

    /// The worst score that is not the worst-possible sentinel.
    ///
    /// Imputed values sit at the sentinel, so they are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the series is empty or holds only sentinel scores.
    pub fn worst_score(&self) -> Result<f64> {
        let sentinel = self.worst_possible_score();
        self.values
            .iter()
            .rev()
            .map(Scored::score)
            .find(|&s| s != sentinel)
            .ok_or_else(|| {
                HomscoreError::NotFound(format!(
                    "worst score other than the worst possible in series {}",
                    self.name
                ))
            })
    }

    /// Scaling that maps the worst real score to 0 and the best to 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the series has no real scores.
    pub fn scaling(&self) -> Result<ValueListScaling> {
        Ok(ValueListScaling::from_worst_and_best(
            self.worst_score()?,
            self.best_score()?,
        ))
    }

    fn find_first(&self, positive: bool, from_best: bool) -> Result<&ScoredInstance> {
        let found = if from_best {
            self.values.iter().find(|v| v.is_positive() == positive)
        } else {
            self.values.iter().rev().find(|v| v.is_positive() == positive)
        };
        found.ok_or_else(|| {
            HomscoreError::NotFound(format!(
                "no actual {} in series {}",
                if positive { "positive" } else { "negative" },
                self.name
            ))
        })
    }

    /// The best-scoring instance that is actually positive.
    pub fn best_scoring_actual_positive(&self) -> Result<&ScoredInstance> {
        self.find_first(true, true)
    }

    /// The best-scoring instance that is actually negative.
    pub fn best_scoring_actual_negative(&self) -> Result<&ScoredInstance> {
        self.find_first(false, true)
    }

    /// The worst-scoring instance that is actually positive.
    pub fn worst_scoring_actual_positive(&self) -> Result<&ScoredInstance> {
        self.find_first(true, false)
    }

    /// The worst-scoring instance that is actually negative.
    pub fn worst_scoring_actual_negative(&self) -> Result<&ScoredInstance> {
        self.find_first(false, false)
    }

    /// Instance ids in stored (best-first) order.
    pub fn instance_ids(&self) -> Vec<&str> {
        self.values.iter().map(ScoredInstance::instance_id).collect()
    }

    /// Distinct instance ids in lexicographic order.
    pub fn sorted_instance_ids(&self) -> BTreeSet<&str> {
        self.values.iter().map(ScoredInstance::instance_id).collect()
    }

    /// Look up the values for `ids`, in the order given.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first id not present in the series.
    pub fn values_of_instance_ids<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<&ScoredInstance>> {
        let index: HashMap<&str, &ScoredInstance> = self
            .values
            .iter()
            .map(|v| (v.instance_id(), v))
            .collect();
        ids.iter()
            .map(|id| {
                index.get(id.as_ref()).copied().ok_or_else(|| {
                    HomscoreError::NotFound(format!(
                        "instance {} in series {}",
                        id.as_ref(),
                        self.name
                    ))
                })
            })
            .collect()
    }

    /// Whether both series hold exactly the same distinct instance ids, with
    /// no id repeated in either.
    pub fn instance_ids_match(&self, other: &NamedScoreSeries) -> bool {
        let ids_a = self.sorted_instance_ids();
        let ids_b = other.sorted_instance_ids();
        ids_a.len() == self.len() && ids_b.len() == other.len() && ids_a == ids_b
    }
}

/// Pair up the scores two series gave each instance, in `a`'s order.
///
/// # Errors
///
/// Returns [`HomscoreError::InconsistentInstanceSet`] if the series cover
/// different instances.
pub fn correlated_data(a: &NamedScoreSeries, b: &NamedScoreSeries) -> Result<Vec<(f64, f64)>> {
    if !a.instance_ids_match(b) {
        return Err(HomscoreError::InconsistentInstanceSet(format!(
            "cannot correlate series {} and {} with mismatching instance ids",
            a.name, b.name
        )));
    }
    let b_by_id: HashMap<&str, f64> = b
        .values
        .iter()
        .map(|v| (v.instance_id(), v.score()))
        .collect();
    a.values
        .iter()
        .map(|v| {
            b_by_id
                .get(v.instance_id())
                .map(|&score_b| (v.score(), score_b))
                .ok_or_else(|| HomscoreError::NotFound(format!("instance {} in series {}", v.instance_id(), b.name)))
        })
        .collect()
}

impl Annotated for NamedScoreSeries {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Summarizable for NamedScoreSeries {
    fn summary(&self) -> String {
        const RULE: &str = "###############################################\n";
        let mut out = String::new();
        out.push_str(RULE);
        out.push_str("# Summary of named score series\n");
        out.push_str(RULE);
        let _ = writeln!(out, "# Name                          : {}", self.name);
        let _ = writeln!(out, "# Higher is better              : {}", self.higher_is_better());
        let _ = writeln!(out, "# Size                          : {}", self.len());
        if let (Some(best), Some(worst)) = (self.values.first(), self.values.last()) {
            out.push_str(RULE);
            let _ = writeln!(
                out,
                "# Area under ROC curve          : {}",
                area_under_roc_curve_of_series(self)
            );
            let _ = writeln!(out, "# Best score                    : {}", best.score());
            let _ = writeln!(out, "# Worst score                   : {}", worst.score());
            let described = |r: Result<&ScoredInstance>| match r {
                Ok(v) => v.to_string(),
                Err(_) => "none".to_string(),
            };
            let _ = writeln!(
                out,
                "# Best scoring actual positive  : {}",
                described(self.best_scoring_actual_positive())
            );
            let _ = writeln!(
                out,
                "# Best scoring actual negative  : {}",
                described(self.best_scoring_actual_negative())
            );
            let _ = writeln!(
                out,
                "# Worst scoring actual positive : {}",
                described(self.worst_scoring_actual_positive())
            );
            let _ = writeln!(
                out,
                "# Worst scoring actual negative : {}",
                described(self.worst_scoring_actual_negative())
            );
        }
        out.push_str(RULE);
        out
    }
}

impl<'a> IntoIterator for &'a NamedScoreSeries {
    type Item = &'a ScoredInstance;
    type IntoIter = std::slice::Iter<'a, ScoredInstance>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
