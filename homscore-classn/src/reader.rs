//! Readers for whole-series score files.
//!
//! Each data line is `id1 id2 score [more fields...]`, whitespace separated.
//! The instance id is `"id1 id2"`. Blank lines and lines starting with `#`
//! are skipped. Whether an instance is positive is decided by a caller
//! predicate over the line's fields, since score files rarely carry the
//! label themselves.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use homscore_core::{HomscoreError, Result};
use tracing::debug;

use crate::instance::ScoredInstance;
use crate::series::NamedScoreSeries;

/// Field of an SVM-light prediction line whose sign gives the label.
const PREDICTION_LABEL_FIELD: usize = 3;

/// Read a series from `id1 id2 score ...` lines.
///
/// `is_positive` receives all whitespace-separated fields of a line.
///
/// # Errors
///
/// [`HomscoreError::MalformedInputLine`] for a line with fewer than three
/// fields or an unparseable score; [`HomscoreError::Io`] on read failure.
pub fn read_series<R, F>(
    reader: R,
    higher_is_better: bool,
    name: impl Into<String>,
    is_positive: F,
) -> Result<NamedScoreSeries>
where
    R: BufRead,
    F: Fn(&[&str]) -> bool,
{
    read_labelled_lines(reader, higher_is_better, name, |_, fields| {
        Ok(is_positive(fields))
    })
}

/// Shared line loop; `label` gets the 1-based line number and the fields.
fn read_labelled_lines<R, F>(
    reader: R,
    higher_is_better: bool,
    name: impl Into<String>,
    label: F,
) -> Result<NamedScoreSeries>
where
    R: BufRead,
    F: Fn(usize, &[&str]) -> Result<bool>,
{
    let name = name.into();
    let mut values = Vec::new();
    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() < 3 {
            return Err(HomscoreError::MalformedInputLine {
                line: line_num + 1,
                message: format!("expected at least 3 fields, got {}", fields.len()),
            });
        }
        let score: f64 = fields[2].parse().map_err(|_| HomscoreError::MalformedInputLine {
            line: line_num + 1,
            message: format!("invalid score: {}", fields[2]),
        })?;
        let is_positive = label(line_num + 1, &fields)?;
        values.push(ScoredInstance::new(
            score,
            is_positive,
            format!("{} {}", fields[0], fields[1]),
        ));
    }
    debug!(series = %name, instances = values.len(), "read score series");
    Ok(NamedScoreSeries::from_values(name, higher_is_better, values))
}

/// Read a series from a file path; see [`read_series`].
pub fn read_series_file<F>(
    path: impl AsRef<Path>,
    higher_is_better: bool,
    name: impl Into<String>,
    is_positive: F,
) -> Result<NamedScoreSeries>
where
    F: Fn(&[&str]) -> bool,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        HomscoreError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    read_series(BufReader::new(file), higher_is_better, name, is_positive)
}

/// Read SVM-light predictions: `id1 id2 prediction label ...`.
///
/// Higher predictions are better. An instance is positive when its fourth
/// field is non-negative.
///
/// # Errors
///
/// As [`read_series`], and [`HomscoreError::MalformedInputLine`] for a line
/// whose fourth field is missing or not a number.
pub fn read_svm_light_predictions<R: BufRead>(
    reader: R,
    name: impl Into<String>,
) -> Result<NamedScoreSeries> {
    read_labelled_lines(reader, true, name, |line, fields| {
        let field = fields
            .get(PREDICTION_LABEL_FIELD)
            .ok_or_else(|| HomscoreError::MalformedInputLine {
                line,
                message: "missing label field".to_string(),
            })?;
        let label: f64 = field.parse().map_err(|_| HomscoreError::MalformedInputLine {
            line,
            message: format!("invalid label: {}", field),
        })?;
        Ok(label >= 0.0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use homscore_core::{Annotated, Scored};

    const SCORES: &str = "\
# id1 id2 score
1cukA01 1hyuA02 71.2
1cukA01 2aebB01 55.0 same

3lzmA00 1cukA01 80.5 same
";

    #[test]
    fn reads_series_sorted() {
        let s = read_series(SCORES.as_bytes(), true, "ssap", |f| {
            f.get(3) == Some(&"same")
        })
        .unwrap();
        assert_eq!(s.name(), "ssap");
        assert_eq!(s.len(), 3);
        assert_eq!(s.values()[0].instance_id(), "3lzmA00 1cukA01");
        assert!(s.values()[0].is_positive());
        assert_eq!(s.values()[1].score(), 71.2);
        assert!(!s.values()[1].is_positive());
    }

    #[test]
    fn too_few_fields_reports_line() {
        let err = read_series("a b 1.0\na b\n".as_bytes(), true, "x", |_| true).unwrap_err();
        assert!(matches!(err, HomscoreError::MalformedInputLine { line: 2, .. }));
    }

    #[test]
    fn bad_score_reports_line() {
        let err = read_series("a b nope\n".as_bytes(), false, "x", |_| true).unwrap_err();
        match err {
            HomscoreError::MalformedInputLine { line, message } => {
                assert_eq!(line, 1);
                assert!(message.contains("nope"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn predictions_label_from_fourth_field() {
        let input = "a b 0.7 1\nc d -0.2 -1\ne f 0.1 0\ng h 0.3 -1\n";
        let s = read_svm_light_predictions(input.as_bytes(), "svm").unwrap();
        assert!(s.higher_is_better());
        let labels: Vec<(&str, bool)> = s
            .iter()
            .map(|v| (v.instance_id(), v.is_positive()))
            .collect();
        assert_eq!(
            labels,
            vec![("a b", true), ("g h", false), ("e f", true), ("c d", false)]
        );
    }

    #[test]
    fn predictions_without_label_report_line() {
        let err = read_svm_light_predictions("a b 0.7 1\nc d 0.1\n".as_bytes(), "svm").unwrap_err();
        assert!(matches!(err, HomscoreError::MalformedInputLine { line: 2, .. }));
    }

    #[test]
    fn predictions_with_bad_label_report_line() {
        let err =
            read_svm_light_predictions("# header\na b 0.7\n".as_bytes(), "svm").unwrap_err();
        assert!(matches!(err, HomscoreError::MalformedInputLine { line: 2, .. }));

        let err = read_svm_light_predictions("c d 0.1 oops\n".as_bytes(), "svm").unwrap_err();
        match err {
            HomscoreError::MalformedInputLine { line, message } => {
                assert_eq!(line, 1);
                assert!(message.contains("oops"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_series_file("/nonexistent/scores.txt", true, "x", |_| true).unwrap_err();
        assert!(matches!(err, HomscoreError::Io(_)));
    }
}
