#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Closed-form motion simulation for a stepper-like axis
//! (hardware-agnostic).
//!
//! Given kinematic limits and a target, this crate computes a
//! trapezoidal velocity profile (triangular when the move is too short
//! to sustain top velocity) and answers "where is the motor right now"
//! as a pure function of an explicitly supplied instant. Nothing here
//! blocks, sleeps or performs I/O; wall-clock time only enters through
//! the `motion_traits::Clock` the axis is built with, and every
//! operation accepts an explicit instant for deterministic use.
//!
//! ## Architecture
//!
//! - **Parameters**: validated kinematic limits and their derived ramp
//!   constants (`params` module)
//! - **Profile**: the pure trapezoidal/triangular plan for one move
//!   (`profile` module)
//! - **Axis**: the stateful motor-like entity with soft limits, power
//!   control, and lazy motion-completion detection (`axis` module)
//! - **Errors**: typed configuration and state errors (`error` module)
//!
//! Adapters over real devices feed kinematic limits in through
//! `motion_traits::KinematicSource`; the core never inspects concrete
//! device types.

pub mod axis;
pub mod error;
pub mod params;
pub mod profile;

pub use axis::{ActiveMotion, AxisBuilder, SimulatedAxis};
pub use error::{AxisError, ConfigError, Report, Result};
pub use params::MotionParameters;
pub use profile::MotionProfile;
