use descent_core::Point;

use super::{Config, ConfigError, Termination, termination::gradient_within};

/// Fixed-step gradient descent on one selected objective.
///
/// Each advance moves the inputs against the gradient of the selected
/// objective and evaluates the problem at the new inputs. Convergence is
/// checked against every objective's gradient norm, not just the selected one.
#[derive(Debug, Clone)]
pub struct SingleObjectiveDescent {
    current: Point,
    objective: usize,
    config: Config,
}

impl SingleObjectiveDescent {
    /// Creates a descent on `objective` starting from `start`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Objective`] if `objective` is not a valid
    /// objective index for the start point's problem.
    pub fn new(start: Point, objective: usize, config: Config) -> Result<Self, ConfigError> {
        let n_objectives = start.problem().n_objectives();
        if objective >= n_objectives {
            return Err(ConfigError::Objective {
                index: objective,
                n_objectives,
            });
        }

        Ok(Self {
            current: start,
            objective,
            config,
        })
    }

    /// The current point.
    #[must_use]
    pub fn current(&self) -> &Point {
        &self.current
    }

    /// The index of the objective being descended.
    #[must_use]
    pub fn objective(&self) -> usize {
        self.objective
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Takes one step `x ← x - t·∇f_k(x)` and returns the new point.
    ///
    /// # Errors
    ///
    /// Returns an error if the problem cannot be evaluated at the new inputs.
    pub fn advance(&mut self) -> Result<&Point, descent_core::Error> {
        let mut x = self.current.inputs().clone();
        x.scaled_add(
            -self.config.step_length(),
            &self.current.gradient(self.objective),
        );

        self.current = self.current.problem().evaluate(x)?;
        Ok(&self.current)
    }

    /// Reports whether the descent should stop after `iter` advances.
    ///
    /// The iteration cap is checked first, then every objective's gradient
    /// norm against the tolerance.
    #[must_use]
    pub fn check(&self, iter: usize) -> Option<Termination> {
        if iter > self.config.max_iters() {
            return Some(Termination::MaxIters);
        }
        gradient_within(&self.current, self.config.tolerance())
    }
}
