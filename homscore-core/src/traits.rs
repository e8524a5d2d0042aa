//! Traits shared by score series, curves and their elements.

/// Something with a single numeric score, such as one method's score for
/// one compared pair.
pub trait Scored {
    fn score(&self) -> f64;
}

/// Something identified by name: a score series, a sweep, a curve.
pub trait Annotated {
    fn name(&self) -> &str;
}

/// Something that can describe itself in a multi-line, `#`-prefixed report.
pub trait Summarizable {
    fn summary(&self) -> String;
}
