//! Capability traits for cross-solver observers.
//!
//! These traits abstract over solver-specific event and action types, so an
//! observer can be written once and reused with any run that emits compatible
//! events.
//!
//! # Event traits
//!
//! - [`HasPoint`]: events that carry an evaluated [`Point`]
//!
//! # Action traits
//!
//! - [`CanStopEarly`]: actions that can signal early termination
//!
//! # Example
//!
//! ```rust
//! use descent_core::Observer;
//! use descent_observers::traits::{CanStopEarly, HasPoint};
//!
//! /// Stops once every objective is below a target.
//! struct BelowTarget {
//!     target: f64,
//! }
//!
//! impl<E: HasPoint, A: CanStopEarly> Observer<E, A> for BelowTarget {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         let values = event.point().objective_values();
//!         values
//!             .iter()
//!             .all(|&value| value < self.target)
//!             .then(A::stop_early)
//!     }
//! }
//! ```

use descent_core::Point;
use descent_solvers::descent;

/// An event that carries an evaluated point.
pub trait HasPoint {
    /// Returns the point reached at this event.
    fn point(&self) -> &Point;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the solver early.
    fn stop_early() -> Self;
}

impl HasPoint for descent::Event<'_> {
    fn point(&self) -> &Point {
        self.point
    }
}

impl CanStopEarly for descent::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use descent_core::{Observer, catalog};
    use descent_solvers::descent::{Action, Config, Optimizer, SingleObjectiveDescent, Status};

    /// Stops once objective 0 drops below `target`.
    struct BelowTarget {
        target: f64,
    }

    impl<E: HasPoint, A: CanStopEarly> Observer<E, A> for BelowTarget {
        fn observe(&mut self, event: &E) -> Option<A> {
            (event.point().objective_values()[0] < self.target).then(A::stop_early)
        }
    }

    #[test]
    fn generic_observer_stops_a_descent_run() {
        let start = catalog::polynomial_pair()
            .evaluate(vec![1.3, 0.7])
            .unwrap();
        let initial = start.objective_values()[0];
        let mut optimizer: Optimizer = SingleObjectiveDescent::new(start, 0, Config::default())
            .unwrap()
            .into();

        let observer = BelowTarget {
            target: initial - 1.0,
        };
        let solution = descent::run(&mut optimizer, observer).unwrap();

        assert_eq!(solution.status, Status::StoppedByObserver);
        assert!(solution.last().objective_values()[0] < initial - 1.0);
        assert!(solution.iters > 0);
    }

    #[test]
    fn stop_early_maps_to_the_descent_action() {
        assert_eq!(<Action as CanStopEarly>::stop_early(), Action::StopEarly);
    }
}
