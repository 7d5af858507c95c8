use descent_core::Point;

use super::Termination;

/// Indicates how a run terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The gradient norm of `objective` reached the tolerance.
    Converged { objective: usize },

    /// A Pareto-critical point was detected.
    ParetoCritical,

    /// The iteration cap was exceeded without convergence.
    MaxIters,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

impl From<Termination> for Status {
    fn from(termination: Termination) -> Self {
        match termination {
            Termination::GradientTolerance { objective } => Self::Converged { objective },
            Termination::ParetoCritical => Self::ParetoCritical,
            Termination::MaxIters => Self::MaxIters,
        }
    }
}

/// The result of a descent run.
#[derive(Debug, Clone)]
pub struct Solution {
    /// How the run terminated.
    pub status: Status,

    /// Every visited point, starting with the initial one.
    pub trajectory: Vec<Point>,

    /// Number of advances performed.
    pub iters: usize,
}

impl Solution {
    /// The last point of the trajectory.
    #[must_use]
    pub fn last(&self) -> &Point {
        // A trajectory always holds at least the starting point.
        &self.trajectory[self.trajectory.len() - 1]
    }
}
