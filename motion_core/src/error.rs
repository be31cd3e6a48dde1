use thiserror::Error;

/// A kinematic parameter violates its invariant. Raised synchronously
/// by the setter or constructor that received the value; state is left
/// unchanged on failure.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("minimum velocity must be >= 0")]
    NegativeMinVelocity,
    #[error("maximum velocity must be > 0")]
    NonPositiveMaxVelocity,
    #[error("acceleration time must be >= 0")]
    NegativeAccelerationTime,
    #[error("deceleration time must be >= 0")]
    NegativeDecelerationTime,
    #[error("steps per unit must be > 0")]
    NonPositiveStepsPerUnit,
}

/// Runtime state errors raised from axis operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AxisError {
    #[error("motor is powered off")]
    PoweredOff,
    #[error("already in motion")]
    AlreadyMoving,
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
