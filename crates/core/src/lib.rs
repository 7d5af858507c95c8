//! Core types for multi-objective descent.
//!
//! This crate defines the shared abstractions that solvers and observers
//! build on:
//!
//! - [`Problem`]: an immutable vector-valued map with its Jacobian and an
//!   optional Hessian
//! - [`Point`]: the evaluated state of a [`Problem`] at one input vector
//! - [`Observer`]: receives solver events and optionally returns control actions
//! - [`catalog`]: ready-made test problems

pub mod catalog;

mod error;
mod observer;
mod point;
mod problem;

pub use error::{Error, ProblemError};
pub use observer::Observer;
pub use point::Point;
pub use problem::{Problem, ProblemBuilder};
