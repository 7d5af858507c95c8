use descent_core::Point;

use super::DirectionSearch;

/// Event emitted by the run loop for each trajectory point.
///
/// Step 0 is the starting point, before any advance.
/// Step `k` is emitted after the `k`-th advance.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    /// The step number (0 for the start, 1..N after each advance).
    pub step: usize,

    /// The point reached at this step.
    pub point: &'a Point,

    /// The direction search that produced this step.
    ///
    /// Only the steepest multi-objective variant searches for a direction;
    /// this is `None` for step 0 and for single-objective descent.
    pub search: Option<&'a DirectionSearch>,
}
