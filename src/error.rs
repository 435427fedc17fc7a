//! Error types for the skewed Student-t distribution.

use thiserror::Error;

/// Errors surfaced by construction and elementwise evaluation.
///
/// Numeric domain problems (e.g. `tau <= 2`) are not errors by default; they
/// propagate as NaN through the closed-form expressions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SstError {
    /// Two shapes could not be broadcast against each other.
    #[error("incompatible shapes: {lhs:?} cannot be broadcast with {rhs:?}")]
    IncompatibleShapes { lhs: Vec<usize>, rhs: Vec<usize> },

    /// A parameter element lies outside its domain (strict validation only).
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A probability lies outside the open unit interval (strict validation only).
    #[error("invalid probability {value}: must lie in (0, 1)")]
    InvalidProbability { value: f64 },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SstError>;
