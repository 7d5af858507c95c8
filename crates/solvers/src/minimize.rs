//! Unconstrained scalar minimization.
//!
//! The steepest multi-objective descent finds its direction by minimizing a
//! scalar function of the direction vector. That inner minimization is
//! delegated to a [`Minimizer`], so alternative algorithms (or test stubs)
//! can be swapped in.
//!
//! # Minimizers
//!
//! - [`Lbfgs`]: `argmin`'s L-BFGS with a proximal bundle fallback for kinks
//!   in piecewise-smooth objectives

pub mod lbfgs;

pub use lbfgs::Lbfgs;

use ndarray::{Array1, ArrayView1};

/// Per-call settings passed to a [`Minimizer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Stop once the gradient norm is at most this value.
    pub gradient_tolerance: f64,

    /// Maximum number of major iterations.
    pub max_iters: usize,
}

/// The outcome of a scalar minimization.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// Best point found.
    pub x: Array1<f64>,

    /// Objective value at `x`.
    pub value: f64,

    /// Whether the minimizer considers `x` a solution.
    pub converged: bool,

    /// Major iterations performed.
    pub iters: usize,
}

/// Minimizes a scalar function given its value and gradient.
pub trait Minimizer {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Minimizes `objective` starting from `x0`.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the minimization fails outright, for example
    /// on a non-finite objective. Running out of iterations is reported
    /// through [`Minimum::converged`] instead.
    fn minimize<F, G>(
        &self,
        objective: F,
        gradient: G,
        x0: Array1<f64>,
        settings: &Settings,
    ) -> Result<Minimum, Self::Error>
    where
        F: Fn(ArrayView1<'_, f64>) -> f64,
        G: Fn(ArrayView1<'_, f64>) -> Array1<f64>;
}
