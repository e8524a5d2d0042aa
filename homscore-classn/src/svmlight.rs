//! SVM-light training data written from a score-series collection.
//!
//! Each instance becomes one row:
//!
//! ```text
//! +1 1:0.75 2:0.10000000000000001 # 1cukA01 1hyuA02
//! ```
//!
//! The label is `+1` for positives and `-1` for negatives. Feature `k` is the
//! score of the `k`-th series in name order, rescaled so the series' worst
//! score is 0 and its best is 1. Numbers are written with 17 significant
//! digits in `%.17g` style, so the files match those produced by other
//! SVM-light tooling byte for byte.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use homscore_core::{Annotated, HomscoreError, Result, Scored};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::collection::ScoreSeriesCollection;
use crate::instance::ScoredInstance;

/// Parameters for writing repeated random train/test splits.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SvmLightSplitConfig {
    /// Number of train/test file pairs to write.
    pub num_repeats: usize,
    /// Fraction of instances placed in each training file.
    pub fraction_train: f64,
    /// RNG seed for the splits.
    pub seed: u64,
}

impl Default for SvmLightSplitConfig {
    fn default() -> Self {
        Self {
            num_repeats: 1,
            fraction_train: 0.5,
            seed: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Number formatting
// ---------------------------------------------------------------------------

const SIGNIFICANT_DIGITS: i32 = 17;

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Format like C's `%.17g`: shortest of fixed or exponent notation at 17
/// significant digits, with trailing zeros removed.
pub fn format_g17(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let sci = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, value);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS {
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            if exponent < 0 { '-' } else { '+' },
            exponent.abs()
        )
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exponent) as usize;
        let fixed = format!("{:.*}", decimals, value);
        trim_fraction(&fixed).to_string()
    }
}

// ---------------------------------------------------------------------------
// Row writing
// ---------------------------------------------------------------------------

/// The values of each series (in name order) aligned on the collection's
/// sorted instance ids.
fn aligned_values(collection: &ScoreSeriesCollection) -> Result<Vec<Vec<&ScoredInstance>>> {
    let ids = collection.instance_ids();
    collection
        .iter()
        .map(|series| series.values_of_instance_ids(&ids))
        .collect()
}

fn write_rows<W: Write>(
    aligned: &[Vec<&ScoredInstance>],
    scalings: &[crate::scaling::ValueListScaling],
    indices: &[usize],
    writer: &mut W,
) -> Result<()> {
    if indices.windows(2).any(|w| w[0] > w[1]) {
        return Err(HomscoreError::InvalidInput(
            "cannot write SVM-light rows for unsorted indices".into(),
        ));
    }
    let num_instances = aligned.first().map_or(0, Vec::len);
    if let Some(&last) = indices.last() {
        if !aligned.is_empty() && last >= num_instances {
            return Err(HomscoreError::InvalidInput(format!(
                "index {} out of range for {} instances",
                last, num_instances
            )));
        }
    }

    for &index in indices {
        let Some(first) = aligned.first().map(|values| values[index]) else {
            break;
        };
        let mismatched = aligned.windows(2).any(|w| {
            w[0][index].is_positive() != w[1][index].is_positive()
                || w[0][index].instance_id() != w[1][index].instance_id()
        });
        if mismatched {
            return Err(HomscoreError::InconsistentInstanceSet(format!(
                "series disagree on the label of instance {}",
                first.instance_id()
            )));
        }

        let features: Vec<String> = aligned
            .iter()
            .zip(scalings)
            .enumerate()
            .map(|(k, (values, scaling))| {
                format!("{}:{}", k + 1, format_g17(scaling.scale(values[index].score())))
            })
            .collect();
        writeln!(
            writer,
            "{}{} # {}",
            if first.is_positive() { "+1 " } else { "-1 " },
            features.join(" "),
            first.instance_id()
        )?;
    }
    Ok(())
}

/// Write the rows for the instances at `indices` (positions in the
/// collection's sorted instance ids).
///
/// # Errors
///
/// [`HomscoreError::InvalidInput`] if `indices` is unsorted or out of range,
/// [`HomscoreError::InconsistentInstanceSet`] if series disagree on an
/// instance's label, plus scaling and I/O errors.
pub fn write_svm_light_rows<W: Write>(
    collection: &ScoreSeriesCollection,
    indices: &[usize],
    writer: &mut W,
) -> Result<()> {
    let aligned = aligned_values(collection)?;
    let scalings = collection.scalings()?;
    write_rows(&aligned, &scalings, indices, writer)
}

/// Randomly split `0..num_instances` into sorted train and test indices.
///
/// The training set gets `round(fraction_train * num_instances)` indices.
///
/// # Errors
///
/// [`HomscoreError::InvalidInput`] if `fraction_train` is not in `[0, 1]`.
pub fn random_split(
    rng: &mut StdRng,
    num_instances: usize,
    fraction_train: f64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(0.0..=1.0).contains(&fraction_train) {
        return Err(HomscoreError::InvalidInput(format!(
            "training fraction {} is not in [0, 1]",
            fraction_train
        )));
    }
    let mut indices: Vec<usize> = (0..num_instances).collect();
    indices.shuffle(rng);
    let num_train = ((num_instances as f64) * fraction_train).round() as usize;
    let mut test = indices.split_off(num_train.min(num_instances));
    indices.sort_unstable();
    test.sort_unstable();
    Ok((indices, test))
}

/// Paths of the train and test files for repeat `repeat` of `stem`.
///
/// The stem's extension (if any) is replaced, so `data.txt` gives
/// `data.1.train` and `data.1.test`.
pub fn split_file_paths(stem: &Path, repeat: usize) -> (PathBuf, PathBuf) {
    (
        stem.with_extension(format!("{}.train", repeat)),
        stem.with_extension(format!("{}.test", repeat)),
    )
}

fn create_file(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        HomscoreError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    Ok(BufWriter::new(file))
}

/// Write `config.num_repeats` random train/test splits of the collection.
///
/// Returns the paths written, train then test for each repeat.
pub fn write_svm_light_data_files(
    collection: &ScoreSeriesCollection,
    stem: impl AsRef<Path>,
    config: &SvmLightSplitConfig,
) -> Result<Vec<PathBuf>> {
    let stem = stem.as_ref();
    let aligned = aligned_values(collection)?;
    let scalings = collection.scalings()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut written = Vec::with_capacity(2 * config.num_repeats);

    for repeat in 1..=config.num_repeats {
        let (train, test) = random_split(&mut rng, collection.num_instances(), config.fraction_train)?;
        let (train_path, test_path) = split_file_paths(stem, repeat);
        for (path, indices) in [(train_path, &train), (test_path, &test)] {
            let mut out = create_file(&path)?;
            write_rows(&aligned, &scalings, indices, &mut out)?;
            out.flush()?;
            debug!(path = %path.display(), rows = indices.len(), "wrote SVM-light data");
            written.push(path);
        }
    }
    debug!(
        series = ?collection.iter().map(Annotated::name).collect::<Vec<_>>(),
        repeats = config.num_repeats,
        "finished SVM-light data files"
    );
    Ok(written)
}
