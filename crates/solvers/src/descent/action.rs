/// Control actions supported by the descent run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the run early and return the trajectory so far.
    StopEarly,
}
