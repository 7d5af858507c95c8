use thiserror::Error;

/// Configuration shared by the descent optimizers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    tolerance: f64,
    max_iters: usize,
    step_length: f64,
}

/// Errors that can occur when configuring a descent optimizer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tolerance must be finite and non-negative")]
    Tolerance,

    #[error("step_length must be finite and positive")]
    StepLength,

    #[error("objective index {index} is out of range for {n_objectives} objectives")]
    Objective { index: usize, n_objectives: usize },
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(1e-6, 10_000, 0.01).unwrap()
    }
}

impl Config {
    /// Creates a new config with a validated tolerance and step length.
    ///
    /// # Errors
    ///
    /// Returns an error if `tolerance` is negative or non-finite, or if
    /// `step_length` is not finite and positive.
    pub fn new(tolerance: f64, max_iters: usize, step_length: f64) -> Result<Self, ConfigError> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::Tolerance);
        }
        if !step_length.is_finite() || step_length <= 0.0 {
            return Err(ConfigError::StepLength);
        }

        Ok(Self {
            tolerance,
            max_iters,
            step_length,
        })
    }

    /// Returns the gradient-norm tolerance.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the maximum number of advances before reporting non-convergence.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Returns the fixed step length.
    #[must_use]
    pub fn step_length(&self) -> f64 {
        self.step_length
    }
}

/// How the steepest multi-objective variant moves along a found direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Update {
    /// `x ← t·d`: the scaled direction replaces the inputs.
    #[default]
    Replace,

    /// `x ← x + t·d`: the standard descent step.
    Additive,
}
