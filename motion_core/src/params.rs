//! Kinematic limits of an axis and the ramp constants derived from them.

use eyre::WrapErr;
use motion_traits::KinematicSource;

use crate::error::{ConfigError, Report, Result};

/// Validated kinematic configuration plus eagerly recomputed derived
/// constants.
///
/// Velocities are in steps/s, times in seconds. A zero acceleration or
/// deceleration time models an unset hardware limit: the ramp is
/// instantaneous and the corresponding acceleration is `+inf`.
///
/// `max_velocity < min_velocity` is deliberately not rejected; the
/// profile calculator tolerates it the same way the hardware emulation
/// it models does.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionParameters {
    min_velocity: f64,
    max_velocity: f64,
    acceleration_time: f64,
    deceleration_time: f64,

    // Derived; recomputed on every setter call.
    acceleration: f64,
    deceleration: f64,
    displacement_reach_max_vel: f64,
    displacement_reach_min_vel: f64,
}

impl Default for MotionParameters {
    /// Unbounded axis: base velocity 0, no velocity ceiling,
    /// instantaneous ramps.
    fn default() -> Self {
        let mut p = Self {
            min_velocity: 0.0,
            max_velocity: f64::INFINITY,
            acceleration_time: 0.0,
            deceleration_time: 0.0,
            acceleration: f64::INFINITY,
            deceleration: f64::INFINITY,
            displacement_reach_max_vel: 0.0,
            displacement_reach_min_vel: 0.0,
        };
        p.recompute();
        p
    }
}

impl MotionParameters {
    pub fn new(
        min_velocity: f64,
        max_velocity: f64,
        acceleration_time: f64,
        deceleration_time: f64,
    ) -> Result<Self> {
        let mut p = Self::default();
        p.set_min_velocity(min_velocity)?;
        p.set_max_velocity(max_velocity)?;
        p.set_acceleration_time(acceleration_time)?;
        p.set_deceleration_time(deceleration_time)?;
        Ok(p)
    }

    /// Build parameters by querying a motor-like device through its
    /// capability interface.
    pub fn from_source<S: KinematicSource + ?Sized>(source: &S) -> Result<Self> {
        let min_velocity = source
            .min_velocity()
            .map_err(|e| eyre::eyre!(e))
            .wrap_err("reading minimum velocity")?;
        let max_velocity = source
            .max_velocity()
            .map_err(|e| eyre::eyre!(e))
            .wrap_err("reading maximum velocity")?;
        let acceleration_time = source
            .acceleration_time()
            .map_err(|e| eyre::eyre!(e))
            .wrap_err("reading acceleration time")?;
        let deceleration_time = source
            .deceleration_time()
            .map_err(|e| eyre::eyre!(e))
            .wrap_err("reading deceleration time")?;
        Self::new(
            min_velocity,
            max_velocity,
            acceleration_time,
            deceleration_time,
        )
    }

    /// Base (starting) velocity.
    pub fn min_velocity(&self) -> f64 {
        self.min_velocity
    }

    /// Velocity ceiling for the constant-velocity phase.
    pub fn max_velocity(&self) -> f64 {
        self.max_velocity
    }

    /// Time to go from minimum to maximum velocity, in seconds.
    pub fn acceleration_time(&self) -> f64 {
        self.acceleration_time
    }

    /// Time to go from maximum to minimum velocity, in seconds.
    pub fn deceleration_time(&self) -> f64 {
        self.deceleration_time
    }

    /// Signed acceleration for a positive-direction move; `+inf` when
    /// the acceleration time is 0.
    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    /// Deceleration for a positive-direction move (<= 0 for sane
    /// configurations); `+inf` when the deceleration time is 0.
    pub fn deceleration(&self) -> f64 {
        self.deceleration
    }

    /// Distance consumed ramping from minimum to maximum velocity.
    pub fn displacement_reach_max_vel(&self) -> f64 {
        self.displacement_reach_max_vel
    }

    /// Distance consumed ramping from maximum to minimum velocity.
    pub fn displacement_reach_min_vel(&self) -> f64 {
        self.displacement_reach_min_vel
    }

    pub fn set_min_velocity(&mut self, v: f64) -> Result<()> {
        if v.is_nan() || v < 0.0 {
            return Err(Report::new(ConfigError::NegativeMinVelocity));
        }
        self.min_velocity = v;
        self.recompute();
        Ok(())
    }

    pub fn set_max_velocity(&mut self, v: f64) -> Result<()> {
        if v.is_nan() || v <= 0.0 {
            return Err(Report::new(ConfigError::NonPositiveMaxVelocity));
        }
        self.max_velocity = v;
        self.recompute();
        Ok(())
    }

    pub fn set_acceleration_time(&mut self, t: f64) -> Result<()> {
        if t.is_nan() || t < 0.0 {
            return Err(Report::new(ConfigError::NegativeAccelerationTime));
        }
        self.acceleration_time = t;
        self.recompute();
        Ok(())
    }

    pub fn set_deceleration_time(&mut self, t: f64) -> Result<()> {
        if t.is_nan() || t < 0.0 {
            return Err(Report::new(ConfigError::NegativeDecelerationTime));
        }
        self.deceleration_time = t;
        self.recompute();
        Ok(())
    }

    /// Recompute every derived constant from the four base parameters.
    ///
    /// Zero ramp times are guarded explicitly: the acceleration becomes
    /// `+inf` and the corresponding ramp distance 0.
    fn recompute(&mut self) {
        self.acceleration = if self.acceleration_time == 0.0 {
            f64::INFINITY
        } else {
            (self.max_velocity - self.min_velocity) / self.acceleration_time
        };
        self.deceleration = if self.deceleration_time == 0.0 {
            f64::INFINITY
        } else {
            (self.min_velocity - self.max_velocity) / self.deceleration_time
        };

        // Constant-acceleration kinematics, assuming top velocity is
        // reachable in the motion.
        self.displacement_reach_max_vel = if self.acceleration_time == 0.0 {
            0.0
        } else {
            0.5 * self.acceleration * self.acceleration_time * self.acceleration_time
                + self.min_velocity * self.acceleration_time
        };
        self.displacement_reach_min_vel = if self.deceleration_time == 0.0 {
            0.0
        } else {
            0.5 * self.deceleration * self.deceleration_time * self.deceleration_time
                + self.max_velocity * self.deceleration_time
        };
    }
}

impl KinematicSource for MotionParameters {
    fn min_velocity(&self) -> std::result::Result<f64, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.min_velocity)
    }

    fn max_velocity(&self) -> std::result::Result<f64, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.max_velocity)
    }

    fn acceleration_time(&self) -> std::result::Result<f64, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.acceleration_time)
    }

    fn deceleration_time(&self) -> std::result::Result<f64, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.deceleration_time)
    }
}
