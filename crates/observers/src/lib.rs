//! Reusable observers and trajectory sinks for descent runs.
//!
//! # Modules
//!
//! - [`traits`]: Capability traits for cross-solver observers
//!   ([`HasPoint`], [`CanStopEarly`])
//! - [`trajectory`]: Writing trajectories as space-delimited rows and
//!   reading them back
//!
//! [`TrajectoryWriter`] streams rows while a run is in progress, using the
//! same format as [`trajectory::write_trajectory`].
//!
//! [`HasPoint`]: traits::HasPoint
//! [`CanStopEarly`]: traits::CanStopEarly

pub mod traits;
pub mod trajectory;

mod writer;

pub use writer::TrajectoryWriter;
