//! Shared primitives for the homscore crates.
//!
//! `homscore-core` provides the foundation the other homscore crates build on:
//!
//! - **Error types**: [`HomscoreError`] and [`Result`] for structured error handling
//! - **Diagnostics**: [`Diagnostic`] and [`Diagnosed`] for non-fatal conditions
//! - **Exact ratios**: [`SizeRatio`] for rate statistics over counts
//! - **Traits**: [`Scored`], [`Annotated`], [`Summarizable`]

pub mod diagnostic;
pub mod error;
pub mod ratio;
pub mod traits;

pub use diagnostic::{Diagnosed, Diagnostic};
pub use error::{HomscoreError, Result};
pub use ratio::SizeRatio;
pub use traits::*;
