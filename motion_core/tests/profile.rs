use motion_core::{MotionParameters, MotionProfile};
use rstest::rstest;

fn demo_params() -> MotionParameters {
    MotionParameters::new(2.0, 100.0, 2.0, 2.0).unwrap()
}

#[rstest]
#[case(0.0, 1000.0)]
#[case(-250.0, 250.0)]
#[case(3.2, 3.7)]
#[case(1000.0, -1000.0)]
fn duration_and_displacement_are_symmetric(#[case] a: f64, #[case] b: f64) {
    let fwd = MotionProfile::compute(&demo_params(), 1.0, a, b, None).unwrap();
    let back = MotionProfile::compute(&demo_params(), 1.0, b, a, None).unwrap();
    assert!(
        (fwd.duration - back.duration).abs() < 1e-9,
        "duration {} vs {}",
        fwd.duration,
        back.duration
    );
    assert_eq!(fwd.displacement, back.displacement);
    assert_eq!(fwd.small_motion, back.small_motion);
}

#[rstest]
#[case(0.0, 0.0)]
#[case(-42.0, -42.0)]
#[case(7.25, 7.25)]
fn zero_displacement_yields_zero_duration(#[case] a: f64, #[case] b: f64) {
    let p = MotionProfile::compute(&demo_params(), 1.0, a, b, None).unwrap();
    assert_eq!(p.duration, 0.0);
    assert_eq!(p.displacement, 0.0);
    assert_eq!(p.max_vel_time, 0.0);
    assert_eq!(p.min_vel_time, 0.0);
    assert_eq!(p.at_max_vel_time, 0.0);
}

// Demo parameters need 102 steps to ramp up and 102 to ramp down, so
// 204 is the shortest displacement with a cruise phase.
#[rstest]
#[case(203.9, true)]
#[case(204.0, false)]
#[case(205.0, false)]
fn small_motion_classification_boundary(#[case] target: f64, #[case] small: bool) {
    let p = MotionProfile::compute(&demo_params(), 1.0, 0.0, target, None).unwrap();
    assert_eq!(p.small_motion, small);
    if small {
        assert_eq!(p.at_max_vel_time, 0.0);
        assert!(p.max_vel < 100.0);
    } else {
        assert_eq!(p.max_vel, 100.0);
    }
}

#[test]
fn long_move_plans_a_trapezoid() {
    let p = MotionProfile::compute(&demo_params(), 1.0, 0.0, 1000.0, None).unwrap();
    assert_eq!(p.accel, 49.0);
    assert_eq!(p.displacement_reach_max_vel, 102.0);
    assert!(!p.small_motion);
}

#[test]
fn short_hop_plans_a_triangle() {
    let p = MotionProfile::compute(&demo_params(), 1.0, 0.0, 5.0, None).unwrap();
    assert!(p.small_motion);
    assert_eq!(p.at_max_vel_time, 0.0);
    assert!(p.max_vel < 100.0);
    assert!(p.max_vel > p.min_vel);
}

#[test]
fn ramp_distances_cover_the_whole_small_motion() {
    let p = MotionProfile::compute(&demo_params(), 1.0, 0.0, 5.0, None).unwrap();
    assert!(
        (p.displacement_reach_max_vel + p.displacement_reach_min_vel - p.displacement).abs()
            < 1e-9
    );
}

#[test]
fn fixed_duration_profile_keeps_requested_range_at_cruise_velocity() {
    // The widened endpoints are the documented surprise: the caller's
    // positions become the cruise-entry/exit points.
    let p = MotionProfile::compute(&demo_params(), 1.0, 100.0, 600.0, Some(5.0)).unwrap();
    assert!((p.max_vel - 100.0).abs() < 1e-9);
    assert!(p.initial_pos < 100.0);
    assert!(p.final_pos > 600.0);
    assert!((p.max_vel_pos - 100.0).abs() < 1e-9);
    assert!((p.at_max_vel_time - 5.0).abs() < 1e-9);
    assert!((p.duration - (5.0 + p.max_vel_time + p.min_vel_time)).abs() < 1e-9);
}
