//! Descent optimizers for vector-valued problems.
//!
//! Two strategies share one run loop:
//!
//! - [`SingleObjectiveDescent`] follows the negative gradient of one selected
//!   objective with a fixed step length:
//!
//!   ```text
//!   x_{k+1} = x_k - t * J_k(x_k)
//!   ```
//!
//! - [`SteepestMultiObjectiveDescent`] searches for a direction along which
//!   every objective decreases by minimizing
//!
//!   ```text
//!   θ(d) = max_i (J_i · d) + ½‖d‖²
//!   ```
//!
//!   and stops once no such direction exists (a Pareto-critical point).
//!
//! Both are wrapped in the closed [`Optimizer`] enum, which [`run`] drives
//! until [`Optimizer::check`] reports a [`Termination`].
//!
//! # Example
//!
//! ```ignore
//! use descent_core::catalog;
//! use descent_solvers::descent::{self, Config, Optimizer, SingleObjectiveDescent};
//!
//! let start = catalog::polynomial_pair().evaluate(vec![1.3, 0.7])?;
//! let mut optimizer: Optimizer =
//!     SingleObjectiveDescent::new(start, 0, Config::default())?.into();
//!
//! let solution = descent::run_unobserved(&mut optimizer)?;
//! for point in &solution.trajectory {
//!     println!("{} -> {}", point.inputs(), point.objective_values());
//! }
//! ```

mod action;
mod config;
mod direction;
mod error;
mod event;
mod optimizer;
mod single;
mod solution;
mod steepest;
mod termination;


pub use action::Action;
pub use config::{Config, ConfigError, Update};
pub use direction::{DirectionSearch, inner_gradient, inner_value};
pub use error::{Error, NotConverged};
pub use event::Event;
pub use optimizer::Optimizer;
pub use single::SingleObjectiveDescent;
pub use solution::{Solution, Status};
pub use steepest::{DEFAULT_INNER_MAX_ITERS, SteepestMultiObjectiveDescent};
pub use termination::Termination;

use descent_core::Observer;
use tracing::{debug, info, warn};

use crate::minimize::Minimizer;

/// Drives an optimizer until it reports a termination.
///
/// # Algorithm
///
/// 1. Seed the trajectory with the optimizer's current point and emit step 0.
/// 2. Loop:
///    - Ask the optimizer to [`check`](Optimizer::check) the number of
///      advances so far; stop if it reports a [`Termination`].
///    - [`advance`](Optimizer::advance) and append the new point.
///    - Emit an [`Event`]. If the observer returns [`Action::StopEarly`],
///      stop.
/// 3. Return the solution with the full trajectory.
///
/// Reaching the iteration cap is a normal outcome reported as
/// [`Status::MaxIters`], not an error.
///
/// # Errors
///
/// Returns an error if evaluating the problem fails or, for the steepest
/// variant, if the direction search fails. The run is aborted immediately.
pub fn run<Mz, Obs>(optimizer: &mut Optimizer<Mz>, mut observer: Obs) -> Result<Solution, Error>
where
    Mz: Minimizer,
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    let name = optimizer.name();
    let mut trajectory = vec![optimizer.current().clone()];

    let event = Event {
        step: 0,
        point: &trajectory[0],
        search: None,
    };
    if let Some(Action::StopEarly) = observer.observe(&event) {
        return Ok(Solution {
            status: Status::StoppedByObserver,
            trajectory,
            iters: 0,
        });
    }

    loop {
        let iters = trajectory.len() - 1;
        if let Some(termination) = optimizer.check(iters) {
            log_termination(name, termination, iters);
            return Ok(Solution {
                status: termination.into(),
                trajectory,
                iters,
            });
        }

        let next = optimizer
            .advance()
            .inspect_err(|err| warn!(optimizer = name, step = iters + 1, %err, "run aborted"))?
            .clone();
        let step = iters + 1;
        debug!(
            step,
            inputs = %next.inputs(),
            objectives = %next.objective_values(),
            "advanced"
        );
        trajectory.push(next);

        let event = Event {
            step,
            point: &trajectory[step],
            search: optimizer.last_search(),
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Ok(Solution {
                status: Status::StoppedByObserver,
                trajectory,
                iters: step,
            });
        }
    }
}

/// Drives an optimizer to termination without observation.
///
/// This is a convenience wrapper around [`run`] that discards events.
///
/// # Errors
///
/// Returns an error if evaluating the problem or the direction search fails.
pub fn run_unobserved<Mz: Minimizer>(optimizer: &mut Optimizer<Mz>) -> Result<Solution, Error> {
    run(optimizer, ())
}

fn log_termination(optimizer: &'static str, termination: Termination, iters: usize) {
    match termination {
        Termination::GradientTolerance { objective } => {
            info!(optimizer, iters, objective, "gradient norm within tolerance");
        }
        Termination::ParetoCritical => {
            info!(optimizer, iters, "reached a pareto-critical point");
        }
        Termination::MaxIters => {
            warn!(optimizer, iters, "iteration cap reached without convergence");
        }
    }
}
