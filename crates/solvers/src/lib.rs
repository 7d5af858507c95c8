//! Descent solvers for vector-valued problems.
//!
//! - [`descent`]: single-objective gradient descent and steepest
//!   multi-objective descent, driven by a shared run loop
//! - [`minimize`]: the unconstrained scalar minimizer seam used by the
//!   multi-objective direction search, with a default implementation

pub mod descent;
pub mod minimize;
