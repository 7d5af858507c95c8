use descent_core::Point;
use ndarray::{Array1, ArrayView1, ArrayView2};
use tracing::debug;

use crate::minimize::{Minimizer, Settings};

use super::{Error, NotConverged};

/// Seed value for every coordinate of the initial direction.
const SEED: f64 = -1.0;

/// The outcome of one direction search.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionSearch {
    /// The minimizing direction found by the inner minimizer.
    pub direction: Array1<f64>,

    /// The inner objective `θ(direction)`.
    pub value: f64,

    /// Iterations used by the inner minimizer.
    pub iters: usize,

    /// Whether the search point is Pareto-critical.
    pub critical: bool,
}

/// Evaluates `θ(d) = max_i (J_i · d) + ½‖d‖²`.
///
/// The max term is the worst directional derivative along `d` over all
/// objectives. A NaN directional derivative propagates into the result.
#[must_use]
pub fn inner_value(jacobian: ArrayView2<'_, f64>, d: ArrayView1<'_, f64>) -> f64 {
    let (_, worst) = worst_objective(jacobian, d);
    worst + 0.5 * d.dot(&d)
}

/// Returns a subgradient of [`inner_value`] at `d`.
///
/// `θ` is differentiable wherever a single objective attains the max, with
/// gradient `d + J_k` for that active objective `k`. At ties the first
/// maximal objective is used.
#[must_use]
pub fn inner_gradient(jacobian: ArrayView2<'_, f64>, d: ArrayView1<'_, f64>) -> Array1<f64> {
    let (active, _) = worst_objective(jacobian, d);
    let mut gradient = d.to_owned();
    gradient += &jacobian.row(active);
    gradient
}

/// Finds the objective with the largest directional derivative along `d`.
fn worst_objective(jacobian: ArrayView2<'_, f64>, d: ArrayView1<'_, f64>) -> (usize, f64) {
    jacobian
        .outer_iter()
        .map(|row| row.dot(&d))
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |worst, (index, slope)| {
            if slope.is_nan() || slope > worst.1 {
                (index, slope)
            } else {
                worst
            }
        })
}

/// Minimizes `θ` for the Jacobian at `point`.
///
/// The point is Pareto-critical when the minimal value is above
/// `-½ tolerance²`, that is when the steepest common descent direction is
/// no longer than the tolerance. With a zero tolerance this reduces to
/// `θ* > 0`.
pub(super) fn search<Mz: Minimizer>(
    point: &Point,
    minimizer: &Mz,
    settings: &Settings,
) -> Result<DirectionSearch, Error> {
    let jacobian = point.jacobian().view();
    let seed = Array1::from_elem(point.inputs().len(), SEED);

    let minimum = minimizer
        .minimize(
            |d| inner_value(jacobian, d),
            |d| inner_gradient(jacobian, d),
            seed.clone(),
            settings,
        )
        .map_err(|source| Error::inner_solver(point.inputs().clone(), seed, source))?;

    if !minimum.converged {
        return Err(Error::inner_solver(
            point.inputs().clone(),
            minimum.x,
            NotConverged {
                iters: minimum.iters,
            },
        ));
    }

    let critical = minimum.value > -0.5 * settings.gradient_tolerance.powi(2);
    debug!(
        value = minimum.value,
        iters = minimum.iters,
        critical,
        direction = %minimum.x,
        "direction search finished"
    );

    Ok(DirectionSearch {
        direction: minimum.x,
        value: minimum.value,
        iters: minimum.iters,
        critical,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use descent_core::Problem;
    use ndarray::{Array2, array};

    use crate::minimize::Lbfgs;

    /// A problem with a constant Jacobian `rows` and linear objectives.
    fn linear(rows: Array2<f64>) -> Problem {
        let (n_objectives, n_vars) = rows.dim();
        let jacobian = rows.clone();
        Problem::builder(n_vars, n_objectives)
            .objectives(move |x| rows.dot(&x))
            .jacobian(move |_| jacobian.clone())
            .build()
            .expect("linear problem is consistent")
    }

    fn settings() -> Settings {
        Settings {
            gradient_tolerance: 1e-6,
            max_iters: 100_000,
        }
    }

    #[test]
    fn inner_value_takes_worst_slope() {
        let jacobian = array![[1.0, 0.0], [0.0, 2.0]];
        let d = array![3.0, 1.0];

        // max(3, 2) + ½(9 + 1)
        assert_relative_eq!(inner_value(jacobian.view(), d.view()), 8.0);
    }

    #[test]
    fn inner_gradient_adds_active_row() {
        let jacobian = array![[1.0, 0.0], [0.0, 2.0]];

        let gradient = inner_gradient(jacobian.view(), array![3.0, 1.0].view());
        assert_eq!(gradient, array![4.0, 1.0]);

        let gradient = inner_gradient(jacobian.view(), array![1.0, 3.0].view());
        assert_eq!(gradient, array![1.0, 5.0]);
    }

    #[test]
    fn inner_gradient_handles_more_objectives_than_variables() {
        let jacobian = array![[1.0], [-1.0]];

        let gradient = inner_gradient(jacobian.view(), array![-1.0].view());
        assert_eq!(gradient, array![-2.0]);
    }

    #[test]
    fn ties_go_to_the_first_objective() {
        let jacobian = array![[1.0, 1.0], [2.0, 0.0]];

        let gradient = inner_gradient(jacobian.view(), array![1.0, 1.0].view());
        assert_eq!(gradient, array![2.0, 2.0]);
    }

    #[test]
    fn nan_slope_propagates() {
        let jacobian = array![[1.0, 0.0], [f64::NAN, 0.0]];

        assert!(inner_value(jacobian.view(), array![1.0, 0.0].view()).is_nan());
    }

    #[test]
    fn identical_rows_have_a_common_descent_direction() {
        let point = linear(array![[1.0, 2.0], [1.0, 2.0]])
            .evaluate(vec![0.5, 0.5])
            .unwrap();

        let found = search(&point, &Lbfgs::default(), &settings()).unwrap();

        assert!(!found.critical);
        assert_relative_eq!(found.direction[0], -1.0, epsilon = 1e-6);
        assert_relative_eq!(found.direction[1], -2.0, epsilon = 1e-6);
        assert_relative_eq!(found.value, -2.5, epsilon = 1e-9);
    }

    #[test]
    fn three_active_objectives_share_the_min_norm_direction() {
        // Every unit row ties at the optimum d = -(1/3, 1/3, 1/3).
        let point = linear(Array2::eye(3)).evaluate(vec![0.0; 3]).unwrap();

        let found = search(&point, &Lbfgs::default(), &settings()).unwrap();

        assert!(!found.critical);
        for &component in &found.direction {
            assert_relative_eq!(component, -1.0 / 3.0, epsilon = 1e-5);
        }
        assert_relative_eq!(found.value, -1.0 / 6.0, epsilon = 1e-9);
    }

    #[test]
    fn four_active_objectives_share_the_min_norm_direction() {
        let point = linear(Array2::eye(4)).evaluate(vec![1.0; 4]).unwrap();

        let found = search(&point, &Lbfgs::default(), &settings()).unwrap();

        for &component in &found.direction {
            assert_relative_eq!(component, -0.25, epsilon = 1e-5);
        }
        assert_relative_eq!(found.value, -0.125, epsilon = 1e-9);
    }

    #[test]
    fn exhausted_budget_is_an_inner_solver_failure() {
        let point = linear(Array2::eye(3)).evaluate(vec![0.0; 3]).unwrap();
        let settings = Settings {
            gradient_tolerance: 1e-6,
            max_iters: 1,
        };

        let error = search(&point, &Lbfgs::default(), &settings).unwrap_err();

        assert!(matches!(error, Error::InnerSolverFailure { .. }));
    }

    #[test]
    fn opposing_rows_are_pareto_critical() {
        let point = linear(array![[1.0], [-1.0]]).evaluate(vec![2.0]).unwrap();

        let found = search(&point, &Lbfgs::default(), &settings()).unwrap();

        assert!(found.critical);
        assert_relative_eq!(found.direction[0], 0.0, epsilon = 1e-6);
    }
}
