use descent_core::Point;

use crate::minimize::{Lbfgs, Minimizer, Settings};

use super::{
    Config, DirectionSearch, Error, Termination, Update, direction, termination::gradient_within,
};

/// Default iteration budget for the inner direction search.
pub const DEFAULT_INNER_MAX_ITERS: usize = 100_000;

/// Steepest descent for several objectives at once.
///
/// Each advance minimizes `θ(d) = max_i (J_i · d) + ½‖d‖²` with the injected
/// [`Minimizer`], starting from a direction of all `-1`. A minimum of `θ`
/// close to zero means no direction decreases every objective; the point is
/// then flagged Pareto-critical. The flag is sticky: the move found by that
/// search is still applied, and the descent reports
/// [`Termination::ParetoCritical`] from then on.
#[derive(Debug, Clone)]
pub struct SteepestMultiObjectiveDescent<Mz = Lbfgs> {
    current: Point,
    config: Config,
    update: Update,
    inner_max_iters: usize,
    minimizer: Mz,
    critical_detected: bool,
    last_search: Option<DirectionSearch>,
}

impl SteepestMultiObjectiveDescent {
    /// Creates a descent from `start` using the default [`Lbfgs`]
    /// minimizer.
    #[must_use]
    pub fn new(start: Point, config: Config) -> Self {
        Self::with_minimizer(start, config, Lbfgs::default())
    }
}

impl<Mz: Minimizer> SteepestMultiObjectiveDescent<Mz> {
    /// Creates a descent from `start` that searches directions with `minimizer`.
    #[must_use]
    pub fn with_minimizer(start: Point, config: Config, minimizer: Mz) -> Self {
        Self {
            current: start,
            config,
            update: Update::default(),
            inner_max_iters: DEFAULT_INNER_MAX_ITERS,
            minimizer,
            critical_detected: false,
            last_search: None,
        }
    }

    /// Sets how found directions are applied to the inputs.
    #[must_use]
    pub fn with_update(mut self, update: Update) -> Self {
        self.update = update;
        self
    }

    /// Sets the iteration budget for each direction search.
    #[must_use]
    pub fn with_inner_max_iters(mut self, inner_max_iters: usize) -> Self {
        self.inner_max_iters = inner_max_iters;
        self
    }

    /// The current point.
    #[must_use]
    pub fn current(&self) -> &Point {
        &self.current
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn update(&self) -> Update {
        self.update
    }

    #[must_use]
    pub fn minimizer(&self) -> &Mz {
        &self.minimizer
    }

    /// Whether any direction search so far found a Pareto-critical point.
    #[must_use]
    pub fn critical_detected(&self) -> bool {
        self.critical_detected
    }

    /// The most recent direction search, if any advance has run.
    #[must_use]
    pub fn last_search(&self) -> Option<&DirectionSearch> {
        self.last_search.as_ref()
    }

    /// Searches for a direction, moves along it, and returns the new point.
    ///
    /// The descent is left unchanged if any step fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InnerSolverFailure`] if the minimizer fails or does
    /// not converge, and [`Error::Evaluation`] if the problem cannot be
    /// evaluated at the new inputs.
    pub fn advance(&mut self) -> Result<&Point, Error> {
        let settings = Settings {
            gradient_tolerance: self.config.tolerance(),
            max_iters: self.inner_max_iters,
        };
        let search = direction::search(&self.current, &self.minimizer, &settings)?;

        let step = self.config.step_length();
        let x = match self.update {
            Update::Replace => &search.direction * step,
            Update::Additive => {
                let mut x = self.current.inputs().clone();
                x.scaled_add(step, &search.direction);
                x
            }
        };

        self.current = self.current.problem().evaluate(x)?;
        self.critical_detected |= search.critical;
        self.last_search = Some(search);
        Ok(&self.current)
    }

    /// Reports whether the descent should stop after `iter` advances.
    ///
    /// A detected Pareto-critical point takes precedence over the iteration
    /// cap, which takes precedence over the gradient norms.
    #[must_use]
    pub fn check(&self, iter: usize) -> Option<Termination> {
        if self.critical_detected {
            return Some(Termination::ParetoCritical);
        }
        if iter > self.config.max_iters() {
            return Some(Termination::MaxIters);
        }
        gradient_within(&self.current, self.config.tolerance())
    }
}
