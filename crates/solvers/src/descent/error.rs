use std::error::Error as StdError;

use ndarray::Array1;
use thiserror::Error;

/// Errors that abort a descent run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("evaluation failed: {0}")]
    Evaluation(#[from] descent_core::Error),

    #[error("direction search failed at {inputs} (direction {direction}): {source}")]
    InnerSolverFailure {
        /// Inputs of the point whose direction was being searched.
        inputs: Array1<f64>,

        /// The direction the minimizer was working with when it failed.
        direction: Array1<f64>,

        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl Error {
    pub(crate) fn inner_solver<E: StdError + Send + Sync + 'static>(
        inputs: Array1<f64>,
        direction: Array1<f64>,
        source: E,
    ) -> Self {
        Self::InnerSolverFailure {
            inputs,
            direction,
            source: Box::new(source),
        }
    }
}

/// The inner minimizer exhausted its iteration budget.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("minimizer did not converge within {iters} iterations")]
pub struct NotConverged {
    pub iters: usize,
}
