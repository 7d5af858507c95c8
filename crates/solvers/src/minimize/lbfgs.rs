//! L-BFGS with a More-Thuente line search, run through `argmin`.
//!
//! Quasi-Newton steps stall on the kinks of piecewise-smooth objectives, such
//! as a pointwise maximum of smooth terms, where the line search can no longer
//! satisfy the Wolfe conditions. When `argmin` stops with the gradient still
//! above tolerance, a proximal bundle method continues from the best point it
//! found (see [`bundle`]). The result is reported as converged only if a
//! gradient, or an aggregate of nearby gradients, is within tolerance.

use argmin::{
    core::{CostFunction, Error as ArgminError, Executor, Gradient, State},
    solver::{linesearch::MoreThuenteLineSearch, quasinewton::LBFGS},
};
use argmin_math::ArgminL2Norm;
use ndarray::{Array1, ArrayView1};
use thiserror::Error;
use tracing::trace;

use super::{Minimizer, Minimum, Settings};

mod bundle;

/// History size used by [`Config::default`].
pub const DEFAULT_MEMORY: usize = 7;

type LineSearch = MoreThuenteLineSearch<Array1<f64>, Array1<f64>, f64>;
type Solver = LBFGS<LineSearch, Array1<f64>, Array1<f64>, f64>;

/// Configuration for the [`Lbfgs`] minimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    memory: usize,
}

/// Errors that can occur when validating a [`Config`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("memory must keep at least one correction pair")]
    Memory,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(DEFAULT_MEMORY).unwrap()
    }
}

impl Config {
    /// Creates a new config keeping `memory` correction pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if `memory` is zero.
    pub fn new(memory: usize) -> Result<Self, ConfigError> {
        if memory == 0 {
            return Err(ConfigError::Memory);
        }
        Ok(Self { memory })
    }

    /// Returns the number of correction pairs kept by L-BFGS.
    #[must_use]
    pub fn memory(&self) -> usize {
        self.memory
    }
}

/// Errors that can occur during an [`Lbfgs`] minimization.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("objective is not finite at the starting point: {value}")]
    NonFiniteStart { value: f64 },

    #[error("gradient is not finite at iteration {iter}")]
    NonFiniteGradient { iter: usize },

    #[error("cannot set up L-BFGS: {message}")]
    Setup { message: String },
}

/// The default [`Minimizer`]: `argmin`'s L-BFGS with a bundle fallback.
///
/// See the [module docs](self) for how kinks are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lbfgs {
    config: Config,
}

impl Lbfgs {
    /// Creates a minimizer with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs L-BFGS from `x0` and returns its best point and iteration count.
    ///
    /// A run that `argmin` aborts, typically a line search that cannot make
    /// progress, hands back `x0` so the bundle method can start from there.
    fn run_lbfgs<F, G>(
        &self,
        objective: &F,
        gradient: &G,
        x0: Array1<f64>,
        settings: &Settings,
    ) -> Result<(Array1<f64>, usize), Error>
    where
        F: Fn(ArrayView1<'_, f64>) -> f64,
        G: Fn(ArrayView1<'_, f64>) -> Array1<f64>,
    {
        let solver: Solver = LBFGS::new(MoreThuenteLineSearch::new(), self.config.memory)
            .with_tolerance_grad(settings.gradient_tolerance)
            .map_err(|error| Error::Setup {
                message: error.to_string(),
            })?;
        let problem = ArgminProblem {
            objective,
            gradient,
        };
        let max_iters = u64::try_from(settings.max_iters).unwrap_or(u64::MAX);

        let result = Executor::new(problem, solver)
            .configure(|state| state.param(x0.clone()).max_iters(max_iters))
            .run();

        match result {
            Ok(result) => {
                let state = result.state();
                let iters = usize::try_from(state.get_iter()).unwrap_or(usize::MAX);
                trace!(
                    iters,
                    termination = %state.get_termination_status(),
                    "L-BFGS finished"
                );
                let best = state.get_best_param().cloned().unwrap_or(x0);
                Ok((best, iters))
            }
            Err(error) => {
                trace!(%error, "L-BFGS aborted");
                Ok((x0, 0))
            }
        }
    }
}

impl Minimizer for Lbfgs {
    type Error = Error;

    fn minimize<F, G>(
        &self,
        objective: F,
        gradient: G,
        x0: Array1<f64>,
        settings: &Settings,
    ) -> Result<Minimum, Error>
    where
        F: Fn(ArrayView1<'_, f64>) -> f64,
        G: Fn(ArrayView1<'_, f64>) -> Array1<f64>,
    {
        let value = objective(x0.view());
        if !value.is_finite() {
            return Err(Error::NonFiniteStart { value });
        }
        if !gradient(x0.view()).l2_norm().is_finite() {
            return Err(Error::NonFiniteGradient { iter: 0 });
        }

        let (x, iters) = self.run_lbfgs(&objective, &gradient, x0, settings)?;
        let value = objective(x.view());
        let grad_norm = gradient(x.view()).l2_norm();
        if !grad_norm.is_finite() {
            return Err(Error::NonFiniteGradient { iter: iters });
        }
        if grad_norm <= settings.gradient_tolerance {
            return Ok(Minimum {
                x,
                value,
                converged: true,
                iters,
            });
        }

        let refined = bundle::refine(
            &objective,
            &gradient,
            x,
            value,
            settings.gradient_tolerance,
            iters..settings.max_iters.max(iters),
        )?;
        trace!(
            iters = refined.iters,
            value = refined.value,
            stationary = refined.stationary,
            "bundle refinement finished"
        );

        Ok(Minimum {
            x: refined.x,
            value: refined.value,
            converged: refined.stationary,
            iters: refined.iters,
        })
    }
}

/// Exposes a value and gradient pair to `argmin`.
struct ArgminProblem<'a, F, G> {
    objective: &'a F,
    gradient: &'a G,
}

impl<F, G> CostFunction for ArgminProblem<'_, F, G>
where
    F: Fn(ArrayView1<'_, f64>) -> f64,
{
    type Param = Array1<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, ArgminError> {
        Ok((self.objective)(param.view()))
    }
}

impl<F, G> Gradient for ArgminProblem<'_, F, G>
where
    G: Fn(ArrayView1<'_, f64>) -> Array1<f64>,
{
    type Param = Array1<f64>;
    type Gradient = Array1<f64>;

    fn gradient(&self, param: &Self::Param) -> Result<Self::Gradient, ArgminError> {
        Ok((self.gradient)(param.view()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::array;

    fn settings(gradient_tolerance: f64, max_iters: usize) -> Settings {
        Settings {
            gradient_tolerance,
            max_iters,
        }
    }

    /// f(x, y) = (x - 1)² + 2(y + 2)²
    fn bowl(v: ArrayView1<'_, f64>) -> f64 {
        (v[0] - 1.0).powi(2) + 2.0 * (v[1] + 2.0).powi(2)
    }

    fn bowl_gradient(v: ArrayView1<'_, f64>) -> Array1<f64> {
        array![2.0 * (v[0] - 1.0), 4.0 * (v[1] + 2.0)]
    }

    /// f(x) = max(x, -x) + x²/2, minimized on the kink at x = 0.
    fn kinked(v: ArrayView1<'_, f64>) -> f64 {
        v[0].max(-v[0]) + 0.5 * v[0] * v[0]
    }

    fn kinked_gradient(v: ArrayView1<'_, f64>) -> Array1<f64> {
        let slope = if v[0] >= 0.0 { 1.0 } else { -1.0 };
        array![v[0] + slope]
    }

    /// f(v) = max(v₀, v₁, v₂) + ½‖v‖², minimized where all three terms tie.
    fn three_way(v: ArrayView1<'_, f64>) -> f64 {
        v.fold(f64::NEG_INFINITY, |worst, &x| worst.max(x)) + 0.5 * v.dot(&v)
    }

    fn three_way_gradient(v: ArrayView1<'_, f64>) -> Array1<f64> {
        let mut active = 0;
        for (index, &x) in v.iter().enumerate() {
            if x > v[active] {
                active = index;
            }
        }
        let mut gradient = v.to_owned();
        gradient[active] += 1.0;
        gradient
    }

    fn rosenbrock(v: ArrayView1<'_, f64>) -> f64 {
        (1.0 - v[0]).powi(2) + 100.0 * (v[1] - v[0] * v[0]).powi(2)
    }

    fn rosenbrock_gradient(v: ArrayView1<'_, f64>) -> Array1<f64> {
        array![
            -2.0 * (1.0 - v[0]) - 400.0 * v[0] * (v[1] - v[0] * v[0]),
            200.0 * (v[1] - v[0] * v[0])
        ]
    }

    #[test]
    fn minimizes_quadratic_bowl() {
        let minimum = Lbfgs::default()
            .minimize(bowl, bowl_gradient, array![0.0, 0.0], &settings(1e-8, 1_000))
            .expect("should minimize");

        assert!(minimum.converged);
        assert_relative_eq!(minimum.x[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(minimum.x[1], -2.0, epsilon = 1e-6);
        assert_relative_eq!(minimum.value, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn minimizes_rosenbrock() {
        let minimum = Lbfgs::default()
            .minimize(
                rosenbrock,
                rosenbrock_gradient,
                array![-1.2, 1.0],
                &settings(1e-6, 1_000),
            )
            .expect("should minimize");

        assert!(minimum.converged);
        assert_relative_eq!(minimum.x[0], 1.0, epsilon = 1e-5);
        assert_relative_eq!(minimum.x[1], 1.0, epsilon = 1e-5);
    }

    #[test]
    fn stops_at_kink_of_absolute_value() {
        let minimum = Lbfgs::default()
            .minimize(kinked, kinked_gradient, array![-1.0], &settings(1e-6, 10_000))
            .expect("should minimize");

        assert!(minimum.converged);
        assert!(minimum.x[0].abs() < 1e-6);
        assert!(minimum.value.abs() < 1e-6);
    }

    #[test]
    fn finds_the_point_where_three_terms_tie() {
        let minimum = Lbfgs::default()
            .minimize(
                three_way,
                three_way_gradient,
                array![-1.0, -1.0, -1.0],
                &settings(1e-6, 10_000),
            )
            .expect("should minimize");

        assert!(minimum.converged);
        for &x in &minimum.x {
            assert_relative_eq!(x, -1.0 / 3.0, epsilon = 1e-5);
        }
        assert_relative_eq!(minimum.value, -1.0 / 6.0, epsilon = 1e-9);
    }

    #[test]
    fn stall_at_a_kink_is_not_converged() {
        // One iteration cannot settle a three-way kink.
        let minimum = Lbfgs::default()
            .minimize(
                three_way,
                three_way_gradient,
                array![-1.0, -1.0, -1.0],
                &settings(1e-6, 1),
            )
            .expect("should run");

        assert!(!minimum.converged);
        assert!(minimum.iters <= 1);
    }

    #[test]
    fn reports_iteration_limit_as_not_converged() {
        // Rosenbrock needs far more than three iterations from here.
        let minimum = Lbfgs::default()
            .minimize(
                rosenbrock,
                rosenbrock_gradient,
                array![-1.2, 1.0],
                &settings(1e-8, 3),
            )
            .expect("should run");

        assert!(!minimum.converged);
        assert_eq!(minimum.iters, 3);
    }

    #[test]
    fn rejects_non_finite_start() {
        let result = Lbfgs::default().minimize(
            |_: ArrayView1<'_, f64>| f64::NAN,
            |v: ArrayView1<'_, f64>| v.to_owned(),
            array![1.0],
            &settings(1e-6, 10),
        );

        assert!(matches!(result, Err(Error::NonFiniteStart { .. })));
    }

    #[test]
    fn rejects_non_finite_gradient() {
        let result = Lbfgs::default().minimize(
            |v: ArrayView1<'_, f64>| v[0] * v[0],
            |_: ArrayView1<'_, f64>| array![f64::INFINITY],
            array![1.0],
            &settings(1e-6, 10),
        );

        assert_eq!(result, Err(Error::NonFiniteGradient { iter: 0 }));
    }

    #[test]
    fn config_validation() {
        assert_eq!(Config::new(0), Err(ConfigError::Memory));
        assert_eq!(Config::new(3).unwrap().memory(), 3);
        assert_eq!(Config::default().memory(), DEFAULT_MEMORY);
    }
}
