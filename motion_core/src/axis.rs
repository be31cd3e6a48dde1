//! Simulated axis: a motor-like entity that answers position queries
//! as a pure function of elapsed time against a precomputed profile.

use std::sync::Arc;
use std::time::{Duration, Instant};

use motion_traits::clock::{Clock, MonotonicClock};

use crate::error::{AxisError, ConfigError, Report, Result};
use crate::params::MotionParameters;
use crate::profile::MotionProfile;

/// Convert a phase duration in seconds to a `Duration`, treating
/// non-finite or negative values as zero (infinite velocities yield
/// zero-length phases).
fn phase_duration(secs: f64) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        Duration::from_secs_f64(secs)
    } else {
        Duration::ZERO
    }
}

/// A profile stamped with absolute phase-boundary instants.
#[derive(Debug, Clone)]
pub struct ActiveMotion {
    profile: MotionProfile,
    start_instant: Instant,
    max_vel_instant: Instant,
    min_vel_instant: Instant,
    final_instant: Instant,
}

impl ActiveMotion {
    pub fn new(profile: MotionProfile, start_instant: Instant) -> Self {
        let max_vel_instant = start_instant + phase_duration(profile.max_vel_time);
        let min_vel_instant = max_vel_instant + phase_duration(profile.at_max_vel_time);
        let final_instant = start_instant + phase_duration(profile.duration);

        debug_assert!(final_instant >= start_instant);
        debug_assert!(start_instant <= max_vel_instant);
        debug_assert!(max_vel_instant <= min_vel_instant);
        if profile.small_motion {
            debug_assert_eq!(max_vel_instant, min_vel_instant);
        }

        Self {
            profile,
            start_instant,
            max_vel_instant,
            min_vel_instant,
            final_instant,
        }
    }

    pub fn profile(&self) -> &MotionProfile {
        &self.profile
    }

    pub fn start_instant(&self) -> Instant {
        self.start_instant
    }

    /// Instant at which the ramp-up phase ends.
    pub fn max_vel_instant(&self) -> Instant {
        self.max_vel_instant
    }

    /// Instant at which the ramp-down phase begins.
    pub fn min_vel_instant(&self) -> Instant {
        self.min_vel_instant
    }

    pub fn final_instant(&self) -> Instant {
        self.final_instant
    }

    /// Instantaneous raw position at `at`, evaluating the phase the
    /// instant falls in. Queries before the start return the initial
    /// position; queries at or after `final_instant` return the final
    /// position.
    pub fn position_at(&self, at: Instant) -> f64 {
        let p = &self.profile;
        if at >= self.final_instant {
            return p.final_pos;
        }

        let sign = if p.positive_displacement { 1.0 } else { -1.0 };
        let mut pos = p.initial_pos;

        if at > self.min_vel_instant {
            // Ramp-down phase.
            pos += sign * (p.displacement_reach_max_vel + p.at_max_vel_displacement);
            let dt = at.duration_since(self.min_vel_instant).as_secs_f64();
            pos += sign * p.max_vel * dt + 0.5 * p.decel * dt * dt;
        } else if at > self.max_vel_instant {
            // Constant-velocity phase.
            pos += sign * p.displacement_reach_max_vel;
            let dt = at.duration_since(self.max_vel_instant).as_secs_f64();
            pos += sign * p.max_vel * dt;
        } else {
            // Ramp-up phase. dt == 0 with an instantaneous ramp would
            // evaluate 0.5·inf·0², so skip the kinematic terms there.
            let dt = at
                .saturating_duration_since(self.start_instant)
                .as_secs_f64();
            if dt > 0.0 {
                pos += sign * p.min_vel * dt + 0.5 * p.accel * dt * dt;
            }
        }

        pos
    }
}

/// A simulated motor axis.
///
/// Positions handed to and returned from the `*_user_*` methods are in
/// user units; `current_position` and the soft-limit clamping operate
/// in raw steps (`user position × steps_per_unit`).
///
/// Every time-dependent operation takes an optional instant; `None`
/// reads the injected clock. The axis holds no locks: callers sharing
/// one axis across threads must serialize access themselves.
pub struct SimulatedAxis {
    params: MotionParameters,
    steps_per_unit: f64,
    /// Soft limits, user units.
    lower_limit: f64,
    upper_limit: f64,
    /// Raw steps.
    current_position: f64,
    current_motion: Option<ActiveMotion>,
    power: bool,
    enabled: bool,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl core::fmt::Debug for SimulatedAxis {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SimulatedAxis")
            .field("params", &self.params)
            .field("steps_per_unit", &self.steps_per_unit)
            .field("current_position", &self.current_position)
            .field("in_motion", &self.current_motion.is_some())
            .field("power", &self.power)
            .finish()
    }
}

impl Default for SimulatedAxis {
    fn default() -> Self {
        Self::new(MotionParameters::default())
    }
}

impl SimulatedAxis {
    pub fn new(params: MotionParameters) -> Self {
        Self {
            params,
            steps_per_unit: 1.0,
            lower_limit: f64::NEG_INFINITY,
            upper_limit: f64::INFINITY,
            current_position: 0.0,
            current_motion: None,
            power: true,
            enabled: true,
            clock: Arc::new(MonotonicClock::new()),
        }
    }

    /// Start building an axis.
    pub fn builder() -> AxisBuilder {
        AxisBuilder::default()
    }

    /// Demonstration axis: base velocity 2, top velocity 100, 2 s
    /// ramps, parked at position 0.
    pub fn demo() -> Self {
        #[allow(clippy::unwrap_used)] // constants are valid
        let params = MotionParameters::new(2.0, 100.0, 2.0, 2.0).unwrap();
        Self::new(params)
    }

    // ── Configuration ────────────────────────────────────────────────

    /// Replace the whole kinematic configuration at once.
    pub fn configure(
        &mut self,
        min_velocity: f64,
        max_velocity: f64,
        acceleration_time: f64,
        deceleration_time: f64,
        steps_per_unit: f64,
    ) -> Result<()> {
        let params = MotionParameters::new(
            min_velocity,
            max_velocity,
            acceleration_time,
            deceleration_time,
        )?;
        Self::validate_steps_per_unit(steps_per_unit)?;
        self.params = params;
        self.steps_per_unit = steps_per_unit;
        Ok(())
    }

    pub fn params(&self) -> &MotionParameters {
        &self.params
    }

    pub fn set_min_velocity(&mut self, v: f64) -> Result<()> {
        self.params.set_min_velocity(v)
    }

    pub fn set_max_velocity(&mut self, v: f64) -> Result<()> {
        self.params.set_max_velocity(v)
    }

    pub fn set_acceleration_time(&mut self, t: f64) -> Result<()> {
        self.params.set_acceleration_time(t)
    }

    pub fn set_deceleration_time(&mut self, t: f64) -> Result<()> {
        self.params.set_deceleration_time(t)
    }

    pub fn steps_per_unit(&self) -> f64 {
        self.steps_per_unit
    }

    pub fn set_steps_per_unit(&mut self, spu: f64) -> Result<()> {
        Self::validate_steps_per_unit(spu)?;
        self.steps_per_unit = spu;
        Ok(())
    }

    fn validate_steps_per_unit(spu: f64) -> Result<()> {
        if spu.is_nan() || spu <= 0.0 {
            return Err(Report::new(ConfigError::NonPositiveStepsPerUnit));
        }
        Ok(())
    }

    /// Configure both soft limits, in user units.
    pub fn set_soft_limits(&mut self, lower: f64, upper: f64) {
        self.lower_limit = lower;
        self.upper_limit = upper;
    }

    /// Lower soft limit, user units.
    pub fn lower_limit(&self) -> f64 {
        self.lower_limit
    }

    /// Upper soft limit, user units.
    pub fn upper_limit(&self) -> f64 {
        self.upper_limit
    }

    // ── Power / enable ───────────────────────────────────────────────

    pub fn turn_on(&mut self) {
        self.power = true;
    }

    pub fn turn_off(&mut self) {
        self.power = false;
    }

    pub fn is_turned_on(&self) -> bool {
        self.power
    }

    pub fn set_power(&mut self, power: bool) {
        self.power = power;
    }

    /// Advisory enable flag; not consulted by the motion logic.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // ── Motion ───────────────────────────────────────────────────────

    /// Start a move from `initial_user_pos` to `final_user_pos` at
    /// `at` (clock time when `None`).
    ///
    /// Fails with `AxisError::PoweredOff` when powered off and with
    /// `AxisError::AlreadyMoving` when a motion is still active at
    /// `at`; the axis is left unchanged on failure. A zero-displacement
    /// request is a successful no-op.
    pub fn start_motion(
        &mut self,
        initial_user_pos: f64,
        final_user_pos: f64,
        at: Option<Instant>,
    ) -> Result<()> {
        if !self.power {
            return Err(Report::new(AxisError::PoweredOff));
        }
        let at = at.unwrap_or_else(|| self.clock.now());
        if self.is_in_motion(Some(at)) {
            return Err(Report::new(AxisError::AlreadyMoving));
        }

        let initial_pos = initial_user_pos * self.steps_per_unit;
        let final_pos = final_user_pos * self.steps_per_unit;
        if initial_pos == final_pos {
            tracing::debug!(position = initial_user_pos, "zero displacement, nothing to do");
            return Ok(());
        }

        let profile = MotionProfile::compute(
            &self.params,
            self.steps_per_unit,
            initial_user_pos,
            final_user_pos,
            None,
        )?;
        let motion = ActiveMotion::new(profile, at);
        tracing::debug!(
            from = initial_user_pos,
            to = final_user_pos,
            duration_s = motion.profile().duration,
            small_motion = motion.profile().small_motion,
            "motion started"
        );
        self.current_position = motion.profile().initial_pos;
        self.current_motion = Some(motion);
        Ok(())
    }

    /// Instantaneous raw position at `at`, with lazy completion
    /// detection and soft-limit clamping. A clamped query aborts the
    /// active motion, as a hardware limit switch would.
    pub fn current_position(&mut self, at: Option<Instant>) -> f64 {
        let at = at.unwrap_or_else(|| self.clock.now());

        let mut pos = match &self.current_motion {
            Some(motion) => {
                if at >= motion.final_instant() {
                    let final_pos = motion.profile().final_pos;
                    tracing::debug!(position = final_pos, "motion complete");
                    self.current_motion = None;
                    final_pos
                } else {
                    motion.position_at(at)
                }
            }
            None => self.current_position,
        };

        let lower = self.lower_limit * self.steps_per_unit;
        let upper = self.upper_limit * self.steps_per_unit;
        if pos <= lower {
            pos = lower;
            if self.current_motion.take().is_some() {
                tracing::warn!(position = pos, "lower limit switch hit, motion aborted");
            }
        } else if pos >= upper {
            pos = upper;
            if self.current_motion.take().is_some() {
                tracing::warn!(position = pos, "upper limit switch hit, motion aborted");
            }
        }

        self.current_position = pos;
        pos
    }

    /// Instantaneous position in user units.
    pub fn current_user_position(&mut self, at: Option<Instant>) -> f64 {
        self.current_position(at) / self.steps_per_unit
    }

    /// Abort the active motion, if any, resolving the position the
    /// axis stops at. Returns the (raw) position.
    pub fn abort_motion(&mut self, at: Option<Instant>) -> f64 {
        if self.current_motion.is_none() {
            return self.current_position;
        }
        let pos = self.current_position(at);
        if self.current_motion.take().is_some() {
            tracing::debug!(position = pos, "motion aborted");
        }
        pos
    }

    /// Whether a motion is active at `at`. Side-effecting: evaluates
    /// the position first so a finished motion is detected and
    /// cleared.
    pub fn is_in_motion(&mut self, at: Option<Instant>) -> bool {
        self.current_position(at);
        self.current_motion.is_some()
    }

    /// Overwrite the current position, raw steps.
    pub fn set_current_position(&mut self, pos: f64) {
        self.current_position = pos;
    }

    /// Overwrite the current position, user units.
    pub fn set_current_user_position(&mut self, user_pos: f64) {
        self.set_current_position(user_pos * self.steps_per_unit);
    }

    /// Whether the last resolved position sits at or below the lower
    /// soft limit.
    pub fn hit_lower_limit(&self) -> bool {
        self.current_position / self.steps_per_unit <= self.lower_limit
    }

    /// Whether the last resolved position sits at or above the upper
    /// soft limit.
    pub fn hit_upper_limit(&self) -> bool {
        self.current_position / self.steps_per_unit >= self.upper_limit
    }
}

// ── Builder ──────────────────────────────────────────────────────────

/// Builder for `SimulatedAxis`. Every field has a valid default, so
/// `build()` only fails on invalid kinematic values.
pub struct AxisBuilder {
    min_velocity: f64,
    max_velocity: f64,
    acceleration_time: f64,
    deceleration_time: f64,
    steps_per_unit: f64,
    lower_limit: f64,
    upper_limit: f64,
    initial_user_pos: f64,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl Default for AxisBuilder {
    fn default() -> Self {
        Self {
            min_velocity: 0.0,
            max_velocity: f64::INFINITY,
            acceleration_time: 0.0,
            deceleration_time: 0.0,
            steps_per_unit: 1.0,
            lower_limit: f64::NEG_INFINITY,
            upper_limit: f64::INFINITY,
            initial_user_pos: 0.0,
            clock: Arc::new(MonotonicClock::new()),
        }
    }
}

impl AxisBuilder {
    pub fn with_min_velocity(mut self, v: f64) -> Self {
        self.min_velocity = v;
        self
    }

    pub fn with_max_velocity(mut self, v: f64) -> Self {
        self.max_velocity = v;
        self
    }

    pub fn with_acceleration_time(mut self, t: f64) -> Self {
        self.acceleration_time = t;
        self
    }

    pub fn with_deceleration_time(mut self, t: f64) -> Self {
        self.deceleration_time = t;
        self
    }

    pub fn with_steps_per_unit(mut self, spu: f64) -> Self {
        self.steps_per_unit = spu;
        self
    }

    pub fn with_soft_limits(mut self, lower: f64, upper: f64) -> Self {
        self.lower_limit = lower;
        self.upper_limit = upper;
        self
    }

    pub fn with_initial_user_position(mut self, pos: f64) -> Self {
        self.initial_user_pos = pos;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn build(self) -> Result<SimulatedAxis> {
        let params = MotionParameters::new(
            self.min_velocity,
            self.max_velocity,
            self.acceleration_time,
            self.deceleration_time,
        )?;
        SimulatedAxis::validate_steps_per_unit(self.steps_per_unit)?;
        let mut axis = SimulatedAxis::new(params);
        axis.steps_per_unit = self.steps_per_unit;
        axis.lower_limit = self.lower_limit;
        axis.upper_limit = self.upper_limit;
        axis.clock = self.clock;
        axis.set_current_user_position(self.initial_user_pos);
        Ok(axis)
    }
}
