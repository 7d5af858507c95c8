use descent_core::Point;

use crate::minimize::{Lbfgs, Minimizer};

use super::{
    DirectionSearch, Error, SingleObjectiveDescent, SteepestMultiObjectiveDescent, Termination,
};

/// The descent strategies driven by [`run`](super::run).
#[derive(Debug, Clone)]
pub enum Optimizer<Mz = Lbfgs> {
    SingleObjective(SingleObjectiveDescent),
    SteepestMultiObjective(SteepestMultiObjectiveDescent<Mz>),
}

impl<Mz: Minimizer> Optimizer<Mz> {
    /// A short name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SingleObjective(_) => "single-objective descent",
            Self::SteepestMultiObjective(_) => "steepest multi-objective descent",
        }
    }

    /// The current point.
    #[must_use]
    pub fn current(&self) -> &Point {
        match self {
            Self::SingleObjective(descent) => descent.current(),
            Self::SteepestMultiObjective(descent) => descent.current(),
        }
    }

    /// Advances one step and returns the new current point.
    ///
    /// # Errors
    ///
    /// Returns an error if the step cannot be taken.
    pub fn advance(&mut self) -> Result<&Point, Error> {
        match self {
            Self::SingleObjective(descent) => Ok(descent.advance()?),
            Self::SteepestMultiObjective(descent) => descent.advance(),
        }
    }

    /// Reports whether the optimizer should stop after `iter` advances.
    #[must_use]
    pub fn check(&self, iter: usize) -> Option<Termination> {
        match self {
            Self::SingleObjective(descent) => descent.check(iter),
            Self::SteepestMultiObjective(descent) => descent.check(iter),
        }
    }

    /// Whether [`check`](Self::check) reports any termination.
    #[must_use]
    pub fn has_converged(&self, iter: usize) -> bool {
        self.check(iter).is_some()
    }

    /// The direction search behind the latest advance, if the variant has one.
    #[must_use]
    pub fn last_search(&self) -> Option<&DirectionSearch> {
        match self {
            Self::SingleObjective(_) => None,
            Self::SteepestMultiObjective(descent) => descent.last_search(),
        }
    }
}

impl<Mz> From<SingleObjectiveDescent> for Optimizer<Mz> {
    fn from(descent: SingleObjectiveDescent) -> Self {
        Self::SingleObjective(descent)
    }
}

impl<Mz> From<SteepestMultiObjectiveDescent<Mz>> for Optimizer<Mz> {
    fn from(descent: SteepestMultiObjectiveDescent<Mz>) -> Self {
        Self::SteepestMultiObjective(descent)
    }
}
