//! Pure trapezoidal / triangular motion-profile computation.

use crate::error::Result;
use crate::params::MotionParameters;

/// Immutable kinematic plan for a single move, in raw step units
/// (user position times steps-per-unit).
///
/// `max_vel` and `min_vel` are stored as magnitudes; `accel` and
/// `decel` carry the direction sign of the move.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionProfile {
    /// Start position of the move.
    pub initial_pos: f64,
    /// End position of the move.
    pub final_pos: f64,
    /// Absolute distance travelled.
    pub displacement: f64,
    /// True for a move in the positive direction.
    pub positive_displacement: bool,
    /// True when the displacement is too short to sustain the
    /// maximum velocity.
    pub small_motion: bool,
    /// Signed acceleration during the ramp-up phase.
    pub accel: f64,
    /// Signed deceleration during the ramp-down phase.
    pub decel: f64,
    /// Distance consumed ramping up to peak velocity.
    pub displacement_reach_max_vel: f64,
    /// Distance consumed ramping down to base velocity.
    pub displacement_reach_min_vel: f64,
    /// Peak velocity magnitude actually reached.
    pub max_vel: f64,
    /// Base velocity magnitude.
    pub min_vel: f64,
    /// Position at which the peak velocity is reached.
    pub max_vel_pos: f64,
    /// Distance travelled at constant peak velocity (0 for small
    /// motions).
    pub at_max_vel_displacement: f64,
    /// Duration of the ramp-up phase, seconds.
    pub max_vel_time: f64,
    /// Duration of the ramp-down phase, seconds.
    pub min_vel_time: f64,
    /// Duration of the constant-velocity phase, seconds.
    pub at_max_vel_time: f64,
    /// Total duration of the move, seconds.
    pub duration: f64,
}

impl MotionProfile {
    /// Plan a move between two user positions.
    ///
    /// With `fixed_duration`, the cruise velocity is derived as
    /// `displacement / fixed_duration` (overriding the configured
    /// maximum velocity for this profile only) and the endpoints are
    /// widened outward by the ramp displacements, so that the
    /// *requested* positions become the points where cruise velocity
    /// is entered and left. The returned profile's `initial_pos` and
    /// `final_pos` then lie outside the caller's range; the total
    /// duration exceeds `fixed_duration` by the ramp times.
    ///
    /// A zero-displacement request yields a degenerate profile with
    /// `duration == 0` (`fixed_duration` is ignored in that case).
    pub fn compute(
        params: &MotionParameters,
        steps_per_unit: f64,
        initial_user_pos: f64,
        final_user_pos: f64,
        fixed_duration: Option<f64>,
    ) -> Result<Self> {
        let mut params = params.clone();
        let mut initial_pos = initial_user_pos * steps_per_unit;
        let mut final_pos = final_user_pos * steps_per_unit;
        let mut displacement = (final_pos - initial_pos).abs();

        if let Some(duration) = fixed_duration
            && displacement > 0.0
        {
            let velocity = displacement / duration;
            params.set_max_velocity(velocity)?;
            let sign = if final_pos > initial_pos { 1.0 } else { -1.0 };
            let base_vel = params.min_velocity();
            let accel_displacement = params.acceleration_time() * 0.5 * (velocity + base_vel);
            let decel_displacement = params.deceleration_time() * 0.5 * (velocity + base_vel);
            initial_pos -= sign * accel_displacement;
            final_pos += sign * decel_displacement;
            displacement = (final_pos - initial_pos).abs();
        }

        if displacement == 0.0 {
            return Ok(Self::degenerate(initial_pos));
        }

        let positive_displacement = final_pos > initial_pos;

        let ramp_displacement =
            params.displacement_reach_max_vel() + params.displacement_reach_min_vel();
        let small_motion = displacement < ramp_displacement;

        let (accel, decel) = if positive_displacement {
            (params.acceleration(), params.deceleration())
        } else {
            (-params.acceleration(), -params.deceleration())
        };

        let max_vel;
        let min_vel;
        let max_vel_pos;
        let displacement_reach_max_vel;
        let displacement_reach_min_vel;
        let at_max_vel_displacement;

        if !small_motion {
            displacement_reach_max_vel = params.displacement_reach_max_vel();
            displacement_reach_min_vel = params.displacement_reach_min_vel();

            if positive_displacement {
                max_vel = params.max_velocity();
                min_vel = params.min_velocity();
                max_vel_pos = initial_pos + displacement_reach_max_vel;
            } else {
                max_vel = -params.max_velocity();
                min_vel = -params.min_velocity();
                max_vel_pos = initial_pos - displacement_reach_max_vel;
            }

            at_max_vel_displacement = displacement - ramp_displacement;
        } else {
            // Triangular profile: the peak is where the ramp-up and
            // ramp-down segments intersect.
            max_vel_pos = (initial_pos * accel - final_pos * decel) / (accel - decel);

            displacement_reach_max_vel = (max_vel_pos - initial_pos).abs();
            displacement_reach_min_vel = (final_pos - max_vel_pos).abs();

            // Reduced peak velocity from the kinematic equations:
            // v² = v_min² + 2·a·d·displacement/(d − a)
            let cnst = 2.0 * accel * decel * displacement / (decel - accel);
            let peak = (params.min_velocity() * params.min_velocity() + cnst)
                .abs()
                .sqrt();

            if positive_displacement {
                max_vel = peak;
                min_vel = params.min_velocity();
            } else {
                max_vel = -peak;
                min_vel = -params.min_velocity();
            }

            at_max_vel_displacement = 0.0;
        }

        let delta_vel = (max_vel - min_vel).abs();

        let max_vel_time = if accel == 0.0 || delta_vel.is_infinite() {
            0.0
        } else {
            (delta_vel / accel).abs()
        };
        let min_vel_time = if decel == 0.0 || delta_vel.is_infinite() {
            0.0
        } else {
            (delta_vel / decel).abs()
        };
        let at_max_vel_time = if max_vel.is_infinite() {
            0.0
        } else {
            (at_max_vel_displacement / max_vel).abs()
        };

        let duration = max_vel_time + at_max_vel_time + min_vel_time;

        Ok(Self {
            initial_pos,
            final_pos,
            displacement,
            positive_displacement,
            small_motion,
            accel,
            decel,
            displacement_reach_max_vel,
            displacement_reach_min_vel,
            max_vel: max_vel.abs(),
            min_vel: min_vel.abs(),
            max_vel_pos,
            at_max_vel_displacement,
            max_vel_time,
            min_vel_time,
            at_max_vel_time,
            duration,
        })
    }

    /// Profile for a zero-displacement request: no motion, zero
    /// duration.
    fn degenerate(pos: f64) -> Self {
        Self {
            initial_pos: pos,
            final_pos: pos,
            displacement: 0.0,
            positive_displacement: false,
            small_motion: true,
            accel: 0.0,
            decel: 0.0,
            displacement_reach_max_vel: 0.0,
            displacement_reach_min_vel: 0.0,
            max_vel: 0.0,
            min_vel: 0.0,
            max_vel_pos: pos,
            at_max_vel_displacement: 0.0,
            max_vel_time: 0.0,
            min_vel_time: 0.0,
            at_max_vel_time: 0.0,
            duration: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_params() -> MotionParameters {
        MotionParameters::new(2.0, 100.0, 2.0, 2.0).unwrap()
    }

    #[test]
    fn long_move_is_trapezoidal() {
        let p = MotionProfile::compute(&demo_params(), 1.0, 0.0, 1000.0, None).unwrap();
        assert!(!p.small_motion);
        assert!(p.positive_displacement);
        assert_eq!(p.accel, 49.0);
        assert_eq!(p.decel, -49.0);
        assert_eq!(p.displacement_reach_max_vel, 102.0);
        assert_eq!(p.displacement_reach_min_vel, 102.0);
        assert_eq!(p.max_vel_pos, 102.0);
        assert_eq!(p.at_max_vel_displacement, 796.0);
        assert!((p.max_vel_time - 2.0).abs() < 1e-12);
        assert!((p.min_vel_time - 2.0).abs() < 1e-12);
        assert!((p.at_max_vel_time - 7.96).abs() < 1e-12);
        assert!((p.duration - 11.96).abs() < 1e-12);
    }

    #[test]
    fn short_hop_is_triangular() {
        let p = MotionProfile::compute(&demo_params(), 1.0, 0.0, 5.0, None).unwrap();
        assert!(p.small_motion);
        assert_eq!(p.at_max_vel_time, 0.0);
        assert_eq!(p.at_max_vel_displacement, 0.0);
        assert!(p.max_vel < 100.0);
        // Symmetric ramps meet halfway.
        assert!((p.max_vel_pos - 2.5).abs() < 1e-12);
        // v² = 2² + 2·49·(−49)·5/(−98) = 249
        assert!((p.max_vel - 249.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn zero_displacement_is_degenerate() {
        let p = MotionProfile::compute(&demo_params(), 1.0, 7.5, 7.5, None).unwrap();
        assert_eq!(p.displacement, 0.0);
        assert_eq!(p.duration, 0.0);
        assert_eq!(p.initial_pos, 7.5);
        assert_eq!(p.final_pos, 7.5);
    }

    #[test]
    fn steps_per_unit_scales_raw_positions() {
        let p = MotionProfile::compute(&demo_params(), 10.0, 0.0, 100.0, None).unwrap();
        assert_eq!(p.initial_pos, 0.0);
        assert_eq!(p.final_pos, 1000.0);
        assert_eq!(p.displacement, 1000.0);
    }

    #[test]
    fn negative_move_mirrors_positive_move() {
        let fwd = MotionProfile::compute(&demo_params(), 1.0, 0.0, 1000.0, None).unwrap();
        let back = MotionProfile::compute(&demo_params(), 1.0, 1000.0, 0.0, None).unwrap();
        assert!(!back.positive_displacement);
        assert_eq!(back.accel, -49.0);
        assert_eq!(back.decel, 49.0);
        assert_eq!(back.max_vel_pos, 898.0);
        assert_eq!(fwd.displacement, back.displacement);
        assert_eq!(fwd.duration, back.duration);
    }

    #[test]
    fn fixed_duration_widens_endpoints_outward() {
        // displacement 1000 over 10 s forces cruise velocity 100;
        // ramp displacements are 2·0.5·(100+2) = 102 on each side.
        let p = MotionProfile::compute(&demo_params(), 1.0, 0.0, 1000.0, Some(10.0)).unwrap();
        assert_eq!(p.initial_pos, -102.0);
        assert_eq!(p.final_pos, 1102.0);
        assert!(!p.small_motion);
        // The requested start is exactly where cruise velocity begins.
        assert_eq!(p.max_vel_pos, 0.0);
        assert!((p.at_max_vel_time - 10.0).abs() < 1e-12);
        assert!((p.duration - 14.0).abs() < 1e-12);
    }

    #[test]
    fn fixed_duration_negative_direction() {
        let p = MotionProfile::compute(&demo_params(), 1.0, 1000.0, 0.0, Some(10.0)).unwrap();
        assert_eq!(p.initial_pos, 1102.0);
        assert_eq!(p.final_pos, -102.0);
        assert!(!p.positive_displacement);
        assert_eq!(p.max_vel_pos, 1000.0);
    }

    #[test]
    fn instantaneous_ramps_make_duration_purely_cruise() {
        let params = MotionParameters::new(0.0, 50.0, 0.0, 0.0).unwrap();
        let p = MotionProfile::compute(&params, 1.0, 0.0, 100.0, None).unwrap();
        assert!(!p.small_motion);
        assert_eq!(p.max_vel_time, 0.0);
        assert_eq!(p.min_vel_time, 0.0);
        assert!((p.duration - 2.0).abs() < 1e-12);
    }

    #[test]
    fn unbounded_axis_moves_in_zero_time() {
        let p = MotionProfile::compute(&MotionParameters::default(), 1.0, 0.0, 42.0, None)
            .unwrap();
        assert_eq!(p.duration, 0.0);
        assert_eq!(p.final_pos, 42.0);
    }
}
