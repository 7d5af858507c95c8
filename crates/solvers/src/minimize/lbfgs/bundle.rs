//! Proximal bundle steps for kinks.
//!
//! The bundle keeps the value and gradient at recently sampled points. Their
//! linearizations give a cutting-plane model of the objective around the
//! current center, and each step minimizes that model plus `½‖step‖²`. The
//! dual of this subproblem weights the bundle gradients on the unit simplex;
//! the weighted sum is an approximate subgradient at the center, so the
//! center is stationary once that sum and the weighted linearization error
//! are both small.

use std::ops::Range;

use argmin_math::ArgminL2Norm;
use ndarray::{Array1, ArrayView1};

use super::Error;

/// Fraction of the model decrease a trial must achieve to become the center.
const DESCENT_FRACTION: f64 = 0.1;

/// Pairwise exchanges allowed per dual solve.
const DUAL_ITERS: usize = 1_000;

/// Relative slope gap at which a dual solve stops.
const DUAL_GAP: f64 = 1e-12;

/// The center reached by [`refine`].
#[derive(Debug)]
pub(super) struct Refined {
    pub x: Array1<f64>,
    pub value: f64,
    pub stationary: bool,
    pub iters: usize,
}

/// A sampled point with the error of its linearization at the center.
#[derive(Debug)]
struct Cut {
    point: Array1<f64>,
    value: f64,
    gradient: Array1<f64>,
    error: f64,
}

impl Cut {
    fn new(
        point: Array1<f64>,
        value: f64,
        gradient: Array1<f64>,
        center: &Array1<f64>,
        center_value: f64,
    ) -> Self {
        let mut cut = Self {
            point,
            value,
            gradient,
            error: 0.0,
        };
        cut.error = cut.linearization_error(center, center_value);
        cut
    }

    /// How far the linearization at this cut lies below `center_value`.
    fn linearization_error(&self, center: &Array1<f64>, center_value: f64) -> f64 {
        let shift = center - &self.point;
        (center_value - self.value - self.gradient.dot(&shift)).max(0.0)
    }
}

/// Runs bundle iterations from `x`, numbering them over `iters`.
///
/// The center only moves when a trial point decreases the objective by a
/// fraction of the model's prediction, so the returned value never exceeds
/// `value`.
pub(super) fn refine<F, G>(
    objective: &F,
    gradient: &G,
    x: Array1<f64>,
    value: f64,
    tolerance: f64,
    iters: Range<usize>,
) -> Result<Refined, Error>
where
    F: Fn(ArrayView1<'_, f64>) -> f64,
    G: Fn(ArrayView1<'_, f64>) -> Array1<f64>,
{
    let capacity = 2 * x.len() + 4;
    let mut center_value = value;
    let mut bundle = vec![Cut {
        gradient: gradient(x.view()),
        point: x.clone(),
        value,
        error: 0.0,
    }];
    let mut center = x;

    for iter in iters.clone() {
        let (weights, aggregate) = solve_dual(&bundle, center.len());
        let aggregate_error: f64 = weights
            .iter()
            .zip(&bundle)
            .map(|(weight, cut)| weight * cut.error)
            .sum();
        let norm = aggregate.l2_norm();

        if norm <= tolerance && aggregate_error <= 0.5 * tolerance * tolerance {
            return Ok(Refined {
                x: center,
                value: center_value,
                stationary: true,
                iters: iter,
            });
        }

        let predicted = aggregate_error + 0.5 * norm * norm;
        let trial = &center - &aggregate;
        let trial_value = objective(trial.view());
        let trial_gradient = gradient(trial.view());
        if !trial_gradient.l2_norm().is_finite() {
            return Err(Error::NonFiniteGradient { iter });
        }

        let mut kept: Vec<Cut> = bundle
            .into_iter()
            .zip(&weights)
            .filter_map(|(cut, &weight)| (weight > 0.0).then_some(cut))
            .collect();

        if trial_value <= center_value - DESCENT_FRACTION * predicted {
            center = trial.clone();
            center_value = trial_value;
            for cut in &mut kept {
                cut.error = cut.linearization_error(&center, center_value);
            }
        }

        kept.push(Cut::new(
            trial,
            trial_value,
            trial_gradient,
            &center,
            center_value,
        ));
        if kept.len() > capacity {
            kept.drain(..kept.len() - capacity);
        }
        bundle = kept;
    }

    Ok(Refined {
        x: center,
        value: center_value,
        stationary: false,
        iters: iters.end,
    })
}

/// Weights the bundle on the unit simplex to minimize
/// `½‖Σ wᵢ gᵢ‖² + Σ wᵢ eᵢ`, returning the weights and `Σ wᵢ gᵢ`.
///
/// Each exchange moves weight from the weighted cut with the largest slope
/// to the cut with the smallest, by the amount that minimizes along that
/// pair.
fn solve_dual(bundle: &[Cut], n_vars: usize) -> (Vec<f64>, Array1<f64>) {
    let mut weights = vec![1.0 / bundle.len() as f64; bundle.len()];
    let mut aggregate = Array1::zeros(n_vars);
    for (weight, cut) in weights.iter().zip(bundle) {
        aggregate.scaled_add(*weight, &cut.gradient);
    }

    for _ in 0..DUAL_ITERS {
        let slopes: Vec<f64> = bundle
            .iter()
            .map(|cut| cut.gradient.dot(&aggregate) + cut.error)
            .collect();

        let mut up = 0;
        let mut down = None;
        for (index, &slope) in slopes.iter().enumerate() {
            if slope < slopes[up] {
                up = index;
            }
            if weights[index] > 0.0 && down.is_none_or(|down: usize| slope > slopes[down]) {
                down = Some(index);
            }
        }
        let Some(down) = down else {
            break;
        };

        let gap = slopes[down] - slopes[up];
        let scale = slopes[down].abs().max(slopes[up].abs()).max(1.0);
        if gap <= DUAL_GAP * scale {
            break;
        }

        let exchange = &bundle[up].gradient - &bundle[down].gradient;
        let curvature = exchange.dot(&exchange);
        let shift = if curvature > 0.0 {
            (gap / curvature).min(weights[down])
        } else {
            weights[down]
        };
        weights[up] += shift;
        weights[down] -= shift;
        aggregate.scaled_add(shift, &exchange);
    }

    (weights, aggregate)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::array;

    fn cut(gradient: Array1<f64>, error: f64) -> Cut {
        Cut {
            point: Array1::zeros(gradient.len()),
            value: 0.0,
            gradient,
            error,
        }
    }

    #[test]
    fn dual_finds_the_min_norm_combination() {
        // The closest point to the origin lies on the edge between the
        // first two gradients; the third gets no weight.
        let bundle = [
            cut(array![2.0, 0.0], 0.0),
            cut(array![0.0, 1.0], 0.0),
            cut(array![0.0, 3.0], 0.0),
        ];

        let (weights, aggregate) = solve_dual(&bundle, 2);

        assert_relative_eq!(weights[0], 0.2, epsilon = 1e-9);
        assert_relative_eq!(weights[1], 0.8, epsilon = 1e-9);
        assert_relative_eq!(weights[2], 0.0, epsilon = 1e-9);
        assert_relative_eq!(aggregate[0], 0.4, epsilon = 1e-9);
        assert_relative_eq!(aggregate[1], 0.8, epsilon = 1e-9);
    }

    #[test]
    fn dual_cancels_opposing_gradients() {
        let bundle = [cut(array![1.0, 0.0], 0.0), cut(array![-1.0, 0.0], 0.0)];

        let (_, aggregate) = solve_dual(&bundle, 2);

        assert_relative_eq!(aggregate[0], 0.0);
        assert_relative_eq!(aggregate[1], 0.0);
    }

    #[test]
    fn dual_penalizes_linearization_error() {
        // Equal and opposite gradients, but the second cut is stale.
        let bundle = [cut(array![1.0], 0.0), cut(array![-1.0], 1.0)];

        let (weights, aggregate) = solve_dual(&bundle, 1);

        // Minimizes ½(2w - 1)² + (1 - w) over w ∈ [0, 1].
        assert_relative_eq!(weights[0], 0.75, epsilon = 1e-9);
        assert_relative_eq!(aggregate[0], 0.5, epsilon = 1e-9);
    }

    #[test]
    fn refine_does_not_increase_the_value() {
        let objective = |v: ArrayView1<'_, f64>| v[0].abs() + v[1].abs();
        let gradient = |v: ArrayView1<'_, f64>| v.mapv(|x| if x >= 0.0 { 1.0 } else { -1.0 });
        let start = array![0.7, -0.2];
        let value = objective(start.view());

        let refined = refine(&objective, &gradient, start, value, 1e-6, 0..5).unwrap();

        assert!(refined.value <= value);
        assert!(refined.iters <= 5);
    }
}
