//! Ready-made test problems.
//!
//! Each problem carries display equations in gnuplot syntax, so callers can
//! hand them to a plotting tool alongside the trajectories they produce.

use ndarray::{Array3, array};

use crate::Problem;

/// Two competing polynomial objectives of two variables.
///
/// ```text
/// f1(x, y) = (x - y)³ + 2x² + y² - x + 2y - 500
/// f2(x, y) = x⁴ - x³ - 20x² + x + y⁴ - y³ - 20y² + y - 100
/// ```
///
/// `f1` has a local minimum near `(1/54, -0.537)`; `f2` is separable with
/// several local minima. The two disagree almost everywhere, which makes the
/// pair a useful multi-objective test.
#[must_use]
pub fn polynomial_pair() -> Problem {
    Problem::builder(2, 2)
        .objectives(|v| {
            let (x, y) = (v[0], v[1]);
            let f1 = (x - y).powi(3) + 2.0 * x * x + y * y - x + 2.0 * y - 500.0;
            let f2 = x.powi(4) - x.powi(3) - 20.0 * x * x + x + y.powi(4) - y.powi(3)
                - 20.0 * y * y
                + y
                - 100.0;
            array![f1, f2]
        })
        .jacobian(|v| {
            let (x, y) = (v[0], v[1]);
            let u2 = 3.0 * (x - y).powi(2);
            array![
                [u2 + 4.0 * x - 1.0, -u2 + 2.0 * y + 2.0],
                [
                    4.0 * x.powi(3) - 3.0 * x * x - 40.0 * x + 1.0,
                    4.0 * y.powi(3) - 3.0 * y * y - 40.0 * y + 1.0
                ],
            ]
        })
        .hessian(|v| {
            let (x, y) = (v[0], v[1]);
            let u6 = 6.0 * (x - y);
            let mut h = Array3::zeros((2, 2, 2));
            h[[0, 0, 0]] = u6 + 4.0;
            h[[0, 0, 1]] = -u6;
            h[[0, 1, 0]] = -u6;
            h[[0, 1, 1]] = u6 + 2.0;
            h[[1, 0, 0]] = 12.0 * x * x - 6.0 * x - 40.0;
            h[[1, 1, 1]] = 12.0 * y * y - 6.0 * y - 40.0;
            h
        })
        .equations([
            "(x-y)**3+2*x**2+y**2-x+2*y-500",
            "x**4 - x**3 -20*x**2 + x + y**4 - y**3 -20*y**2 + y - 100",
        ])
        .build()
        .expect("polynomial pair definition is consistent")
}

/// Beale's function, a single objective with its global minimum `f(3, 0.5) = 0`.
///
/// Standard starting points are `[1, 1]` (easy) and `[1, 4]` (hard).
///
/// References:
/// - Beale, E.: On an Iterative Method for Finding a Local Minimum of a
///   Function of More than One Variable. Technical Report 25, Statistical
///   Techniques Research Group, Princeton University (1958)
/// - More, J., Garbow, B.S., Hillstrom, K.E.: Testing unconstrained
///   optimization software. ACM Trans Math Softw 7 (1981), 17-41
#[must_use]
pub fn beale() -> Problem {
    Problem::builder(2, 1)
        .objectives(|v| {
            let [f1, f2, f3] = beale_terms(v[0], v[1]).residuals;
            array![f1 * f1 + f2 * f2 + f3 * f3]
        })
        .jacobian(|v| {
            let (x, y) = (v[0], v[1]);
            let BealeTerms {
                residuals: [f1, f2, f3],
                slopes: [t1, t2, t3],
            } = beale_terms(x, y);
            array![[
                -2.0 * (f1 * t1 + f2 * t2 + f3 * t3),
                2.0 * x * (f1 + 2.0 * f2 * y + 3.0 * f3 * y * y)
            ]]
        })
        .hessian(|v| {
            let (x, y) = (v[0], v[1]);
            let BealeTerms {
                residuals: [f1, f2, f3],
                slopes: [t1, t2, t3],
            } = beale_terms(x, y);
            let h00 = 2.0 * (t1 * t1 + t2 * t2 + t3 * t3);
            let h01 = 2.0
                * (f1 + y * (2.0 * f2 + 3.0 * y * f3)
                    - x * (t1 + y * (2.0 * t2 + 3.0 * y * t3)));
            let h11 = 2.0 * x * (x + 2.0 * f2 + y * (6.0 * f3 + x * y * (4.0 + 9.0 * y * y)));
            let mut h = Array3::zeros((1, 2, 2));
            h[[0, 0, 0]] = h00;
            h[[0, 0, 1]] = h01;
            h[[0, 1, 0]] = h01;
            h[[0, 1, 1]] = h11;
            h
        })
        .equations(["(1.5-x+x*y)**2+(2.25-x+x*y*y)**2+(2.625-x+x*y*y*y)**2"])
        .build()
        .expect("beale definition is consistent")
}

/// Residuals `c_k - x(1 - y^k)` and slopes `1 - y^k` for `k = 1, 2, 3`.
struct BealeTerms {
    residuals: [f64; 3],
    slopes: [f64; 3],
}

fn beale_terms(x: f64, y: f64) -> BealeTerms {
    let slopes = [1.0 - y, 1.0 - y * y, 1.0 - y * y * y];
    let residuals = [1.5 - x * slopes[0], 2.25 - x * slopes[1], 2.625 - x * slopes[2]];
    BealeTerms { residuals, slopes }
}
