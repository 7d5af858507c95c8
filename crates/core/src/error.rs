use thiserror::Error;

/// Errors that can occur when evaluating a [`Problem`](crate::Problem).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("expected {expected} input variables, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

/// Errors that can occur when building a [`Problem`](crate::Problem).
///
/// These are configuration errors: they are detected once, when the problem
/// is built, and never during evaluation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProblemError {
    #[error("a problem needs at least one {what}")]
    Empty { what: &'static str },

    #[error("objective map is not defined")]
    MissingObjectives,

    #[error("jacobian map is not defined")]
    MissingJacobian,

    #[error("objective map returned {found} values, expected {expected}")]
    ObjectivesShape { expected: usize, found: usize },

    #[error("jacobian map returned shape {found:?}, expected {expected:?}")]
    JacobianShape {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("hessian map returned shape {found:?}, expected {expected:?}")]
    HessianShape {
        expected: (usize, usize, usize),
        found: (usize, usize, usize),
    },

    #[error("expected one display equation per objective ({expected}), found {found}")]
    EquationCount { expected: usize, found: usize },
}
