//! Scoring with a trained SVM-light RBF-kernel model.
//!
//! The model file starts with an `SVM-light Version V...` header, carries
//! `gamma` and `b` on lines commented `# kernel parameter -g` and
//! `# threshold b`, and lists one support vector per line after the
//! `# each following line is a SV` comment:
//!
//! ```text
//! 0.5 1:0.25 2:0.75 #
//! ```
//!
//! A feature vector `x` scores `sum(w_i * exp(-gamma * |x - sv_i|^2)) - b`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use homscore_core::{HomscoreError, Result};
use tracing::debug;

const HEADER: &str = "svm-light version v";
const GAMMA_COMMENT: &str = "kernel parameter -g";
const B_COMMENT: &str = "threshold b";
const SUPPORT_VECTORS_COMMENT: &str = "each following line is a SV";

/// One support vector and its weight (`alpha * y`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupportVector {
    pub weight: f64,
    pub components: Vec<f64>,
}

/// An RBF-kernel SVM decision function.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RbfModel {
    gamma: f64,
    b: f64,
    support_vectors: Vec<SupportVector>,
}

fn malformed(line: usize, message: impl Into<String>) -> HomscoreError {
    HomscoreError::MalformedInputLine {
        line,
        message: message.into(),
    }
}

fn leading_number(line: &str, line_num: usize) -> Result<f64> {
    line.split_whitespace()
        .next()
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| malformed(line_num, format!("expected a leading number in: {}", line)))
}

fn parse_support_vector(line: &str, line_num: usize) -> Result<SupportVector> {
    let mut parts = line.split_whitespace();
    let weight: f64 = parts
        .next()
        .and_then(|w| w.parse().ok())
        .ok_or_else(|| malformed(line_num, "support vector has no weight"))?;

    let mut components = Vec::new();
    for part in parts {
        if part.starts_with('#') {
            break;
        }
        let (index, value) = part
            .split_once(':')
            .ok_or_else(|| malformed(line_num, format!("component {} is not index:value", part)))?;
        let index: usize = index
            .parse()
            .map_err(|_| malformed(line_num, format!("invalid component index {}", index)))?;
        if index != components.len() + 1 {
            return Err(malformed(
                line_num,
                format!("expected component {} but found {}", components.len() + 1, index),
            ));
        }
        let value: f64 = value
            .parse()
            .map_err(|_| malformed(line_num, format!("invalid component value {}", value)))?;
        components.push(value);
    }
    Ok(SupportVector { weight, components })
}

impl RbfModel {
    /// Build a model directly.
    ///
    /// # Errors
    ///
    /// [`HomscoreError::InvalidInput`] if the support vectors differ in
    /// dimension.
    pub fn new(gamma: f64, b: f64, support_vectors: Vec<SupportVector>) -> Result<Self> {
        if let Some(first) = support_vectors.first() {
            let dim = first.components.len();
            if let Some(sv) = support_vectors.iter().find(|sv| sv.components.len() != dim) {
                return Err(HomscoreError::InvalidInput(format!(
                    "support vectors have {} and {} components",
                    dim,
                    sv.components.len()
                )));
            }
        }
        Ok(Self {
            gamma,
            b,
            support_vectors,
        })
    }

    /// Parse an SVM-light RBF model.
    ///
    /// # Errors
    ///
    /// [`HomscoreError::MalformedInputLine`] for a missing header, missing
    /// `gamma`/`b`, or an unparseable support vector.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader.lines().enumerate();

        let header = lines.next().map(|(_, l)| l).transpose()?.unwrap_or_default();
        if !header.to_lowercase().contains(HEADER) {
            return Err(malformed(1, "missing SVM-light header"));
        }

        let mut gamma = None;
        let mut b = None;
        for (idx, line) in lines.by_ref() {
            let line = line?;
            if line.contains(GAMMA_COMMENT) {
                gamma = Some(leading_number(&line, idx + 1)?);
            }
            if line.contains(B_COMMENT) {
                b = Some(leading_number(&line, idx + 1)?);
            }
            if line.contains(SUPPORT_VECTORS_COMMENT) {
                break;
            }
        }
        let (Some(gamma), Some(b)) = (gamma, b) else {
            return Err(malformed(1, "model does not give both gamma and b"));
        };

        let mut support_vectors = Vec::new();
        for (idx, line) in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            support_vectors.push(parse_support_vector(&line, idx + 1)?);
        }
        debug!(gamma, b, support_vectors = support_vectors.len(), "parsed RBF model");
        Self::new(gamma, b, support_vectors)
    }

    /// Parse an SVM-light RBF model from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            HomscoreError::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", path.display(), e),
            ))
        })?;
        Self::parse(BufReader::new(file))
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn support_vectors(&self) -> &[SupportVector] {
        &self.support_vectors
    }

    /// Number of features the model expects (0 if it has no support vectors).
    pub fn dimension(&self) -> usize {
        self.support_vectors
            .first()
            .map_or(0, |sv| sv.components.len())
    }

    /// The decision value for `features`.
    ///
    /// # Errors
    ///
    /// [`HomscoreError::InvalidInput`] if `features` has the wrong length.
    pub fn score(&self, features: &[f64]) -> Result<f64> {
        if !self.support_vectors.is_empty() && features.len() != self.dimension() {
            return Err(HomscoreError::InvalidInput(format!(
                "model expects {} features, got {}",
                self.dimension(),
                features.len()
            )));
        }
        let sum: f64 = self
            .support_vectors
            .iter()
            .map(|sv| {
                let dist_sq: f64 = features
                    .iter()
                    .zip(&sv.components)
                    .map(|(x, s)| (x - s) * (x - s))
                    .sum();
                sv.weight * (-self.gamma * dist_sq).exp()
            })
            .sum();
        Ok(sum - self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = "\
SVM-light Version V6.02
2 # kernel type
3 # kernel parameter -d
0.5 # kernel parameter -g
1 # kernel parameter -s
1 # kernel parameter -r
empty# kernel parameter -u
2 # highest feature index
4 # number of training documents
3 # number of support vectors plus 1
0.25 # threshold b, each following line is a SV (starting with alpha*y)
1.5 1:0 2:0 #
-0.5 1:1 2:1 #
";

    #[test]
    fn parses_parameters_and_vectors() {
        let model = RbfModel::parse(MODEL.as_bytes()).unwrap();
        assert_eq!(model.gamma(), 0.5);
        assert_eq!(model.b(), 0.25);
        assert_eq!(model.dimension(), 2);
        assert_eq!(model.support_vectors().len(), 2);
        assert_eq!(model.support_vectors()[1].weight, -0.5);
    }

    #[test]
    fn scores_with_rbf_kernel() {
        let model = RbfModel::parse(MODEL.as_bytes()).unwrap();
        // At the first SV: 1.5 * 1 - 0.5 * exp(-0.5 * 2) - 0.25
        let expected = 1.5 - 0.5 * (-1.0f64).exp() - 0.25;
        assert!((model.score(&[0.0, 0.0]).unwrap() - expected).abs() < 1e-12);
        assert!(model.score(&[0.0]).is_err());
    }

    #[test]
    fn rejects_missing_header() {
        let err = RbfModel::parse("not a model\n".as_bytes()).unwrap_err();
        assert!(matches!(err, HomscoreError::MalformedInputLine { line: 1, .. }));
    }

    #[test]
    fn rejects_missing_gamma() {
        let text = "SVM-light Version V6.02\n0.25 # threshold b, each following line is a SV\n";
        assert!(RbfModel::parse(text.as_bytes()).is_err());
    }

    #[test]
    fn rejects_out_of_order_component() {
        let text = format!("{}1.0 2:0 1:0 #\n", MODEL);
        let err = RbfModel::parse(text.as_bytes()).unwrap_err();
        assert!(matches!(err, HomscoreError::MalformedInputLine { line: 14, .. }));
    }

    #[test]
    fn rejects_mixed_dimensions() {
        let svs = vec![
            SupportVector { weight: 1.0, components: vec![0.0, 1.0] },
            SupportVector { weight: 1.0, components: vec![0.0] },
        ];
        assert!(matches!(
            RbfModel::new(1.0, 0.0, svs),
            Err(HomscoreError::InvalidInput(_))
        ));
    }
}
