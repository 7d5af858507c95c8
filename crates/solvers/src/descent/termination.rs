use descent_core::Point;

/// Why an optimizer considers itself done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The gradient norm of `objective` is within tolerance.
    GradientTolerance { objective: usize },

    /// No direction decreases every objective.
    ParetoCritical,

    /// The iteration cap was exceeded before any tolerance was met.
    MaxIters,
}

/// Returns the first objective whose gradient norm is within `tolerance`.
///
/// NaN norms never satisfy the comparison.
pub(super) fn gradient_within(point: &Point, tolerance: f64) -> Option<Termination> {
    point
        .gradient_norms()
        .iter()
        .position(|&norm| norm <= tolerance)
        .map(|objective| Termination::GradientTolerance { objective })
}
