use ndarray::{Array1, Array2, ArrayView1};

use crate::Problem;

/// The evaluated state of a [`Problem`] at one input vector.
///
/// A point is produced only by [`Problem::evaluate`] and is immutable: moving
/// to a new state always evaluates a new point.
#[derive(Debug, Clone)]
pub struct Point {
    inputs: Array1<f64>,
    objective_values: Array1<f64>,
    jacobian: Array2<f64>,
    gradient_norms: Array1<f64>,
    problem: Problem,
}

impl Point {
    pub(crate) fn new(
        inputs: Array1<f64>,
        objective_values: Array1<f64>,
        jacobian: Array2<f64>,
        gradient_norms: Array1<f64>,
        problem: Problem,
    ) -> Self {
        Self {
            inputs,
            objective_values,
            jacobian,
            gradient_norms,
            problem,
        }
    }

    /// The input vector this point was evaluated at.
    #[must_use]
    pub fn inputs(&self) -> &Array1<f64> {
        &self.inputs
    }

    /// The objective values, one per objective.
    #[must_use]
    pub fn objective_values(&self) -> &Array1<f64> {
        &self.objective_values
    }

    /// The Jacobian, shaped `(n_objectives, n_vars)`.
    #[must_use]
    pub fn jacobian(&self) -> &Array2<f64> {
        &self.jacobian
    }

    /// The gradient of objective `index` (row `index` of the Jacobian).
    ///
    /// # Panics
    ///
    /// Panics if `index` is not less than the number of objectives.
    #[must_use]
    pub fn gradient(&self, index: usize) -> ArrayView1<'_, f64> {
        self.jacobian.row(index)
    }

    /// The Euclidean norm of each Jacobian row.
    #[must_use]
    pub fn gradient_norms(&self) -> &Array1<f64> {
        &self.gradient_norms
    }

    /// The problem that produced this point.
    #[must_use]
    pub fn problem(&self) -> &Problem {
        &self.problem
    }
}
