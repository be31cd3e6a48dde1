pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// Read access to the kinematic limits of a motor-like device.
///
/// Adapters over real controllers implement this; the kinematics core
/// never inspects concrete device types. Velocities are in steps per
/// second, times in seconds. Reads are fallible because an adapter
/// typically queries device attributes.
pub trait KinematicSource {
    fn min_velocity(&self) -> Result<f64, Box<dyn std::error::Error + Send + Sync>>;
    fn max_velocity(&self) -> Result<f64, Box<dyn std::error::Error + Send + Sync>>;
    fn acceleration_time(&self) -> Result<f64, Box<dyn std::error::Error + Send + Sync>>;
    fn deceleration_time(&self) -> Result<f64, Box<dyn std::error::Error + Send + Sync>>;
}
