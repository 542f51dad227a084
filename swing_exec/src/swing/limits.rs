//! Joint angle limits

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::dynamics::LinkState;
use util::maths::{next_down, next_up};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Angle limits on the two joints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JointLimits {
    /// Maximum absolute proximal angle.
    ///
    /// Units: radians
    pub max_shoulder_rad: f64,

    /// Maximum lag of the distal link behind the proximal one.
    ///
    /// Units: radians
    pub max_wrist_lag_rad: f64,

    /// Maximum release of the distal link ahead of the proximal one.
    ///
    /// Units: radians
    pub max_wrist_release_rad: f64,
}

/// Which limits were enforced on a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LimitReport {
    pub shoulder: bool,
    pub wrist_lag: bool,
    pub wrist_release: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for JointLimits {
    fn default() -> Self {
        Self {
            max_shoulder_rad: 2.0 * PI,
            max_wrist_lag_rad: PI / 2.0,
            max_wrist_release_rad: 0.15 * PI,
        }
    }
}

impl LimitReport {
    pub fn any(&self) -> bool {
        self.shoulder || self.wrist_lag || self.wrist_release
    }
}

/// Clamp the state onto the joint limits.
///
/// At a limit the angle is set onto the bound and any rate carrying the joint
/// further past it is removed. For the wrist this means the distal rate is
/// limited to the proximal rate.
///
/// The clamped relative angle never lies past the bound, even by rounding.
pub fn enforce_joint_limits(state: &mut LinkState, limits: &JointLimits) -> LimitReport {
    let mut report = LimitReport::default();

    if state.theta1_rad > limits.max_shoulder_rad {
        state.theta1_rad = limits.max_shoulder_rad;
        state.omega1_rads = state.omega1_rads.min(0.0);
        report.shoulder = true;
    } else if state.theta1_rad < -limits.max_shoulder_rad {
        state.theta1_rad = -limits.max_shoulder_rad;
        state.omega1_rads = state.omega1_rads.max(0.0);
        report.shoulder = true;
    }

    let rel = state.relative_rad();

    if rel > limits.max_wrist_release_rad {
        state.theta2_rad = state.theta1_rad + limits.max_wrist_release_rad;
        while state.relative_rad() > limits.max_wrist_release_rad {
            state.theta2_rad = next_down(state.theta2_rad);
        }
        state.omega2_rads = state.omega2_rads.min(state.omega1_rads);
        report.wrist_release = true;
    } else if rel < -limits.max_wrist_lag_rad {
        state.theta2_rad = state.theta1_rad - limits.max_wrist_lag_rad;
        while state.relative_rad() < -limits.max_wrist_lag_rad {
            state.theta2_rad = next_up(state.theta2_rad);
        }
        state.omega2_rads = state.omega2_rads.max(state.omega1_rads);
        report.wrist_lag = true;
    }

    report
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_within_limits_untouched() {
        let limits = JointLimits::default();
        let mut state = LinkState {
            theta1_rad: -1.0,
            omega1_rads: 5.0,
            theta2_rad: -1.5,
            omega2_rads: 8.0,
        };
        let before = state;

        let report = enforce_joint_limits(&mut state, &limits);

        assert!(!report.any());
        assert_eq!(state, before);
    }

    #[test]
    fn test_wrist_lag_clamped() {
        let limits = JointLimits::default();
        let mut state = LinkState {
            theta1_rad: -1.0,
            omega1_rads: 5.0,
            theta2_rad: -3.0,
            omega2_rads: 2.0,
        };

        let report = enforce_joint_limits(&mut state, &limits);

        assert!(report.wrist_lag);
        assert!(!report.wrist_release);
        assert!(state.relative_rad() >= -limits.max_wrist_lag_rad);
        assert!((state.relative_rad() + limits.max_wrist_lag_rad).abs() < 1e-12);
        assert_eq!(state.omega2_rads, 5.0);
    }

    #[test]
    fn test_wrist_release_clamped() {
        let limits = JointLimits::default();
        let mut state = LinkState {
            theta1_rad: 0.5,
            omega1_rads: 10.0,
            theta2_rad: 1.5,
            omega2_rads: 30.0,
        };

        let report = enforce_joint_limits(&mut state, &limits);

        assert!(report.wrist_release);
        assert!(state.relative_rad() <= limits.max_wrist_release_rad);
        assert!((state.relative_rad() - limits.max_wrist_release_rad).abs() < 1e-12);
        assert_eq!(state.omega2_rads, 10.0);
    }

    #[test]
    fn test_wrist_clamp_never_overshoots() {
        let limits = JointLimits::default();

        // Sweep proximal angles whose sums with the bounds do not round trip
        for i in 0..2000 {
            let theta1 = -4.0 + 0.00371 * i as f64;

            let mut lagged = LinkState {
                theta1_rad: theta1,
                omega1_rads: 0.0,
                theta2_rad: theta1 - 2.0,
                omega2_rads: 0.0,
            };
            assert!(enforce_joint_limits(&mut lagged, &limits).wrist_lag);
            assert!(lagged.relative_rad() >= -limits.max_wrist_lag_rad);
            assert!(lagged.relative_rad() + limits.max_wrist_lag_rad < 1e-12);

            let mut released = LinkState {
                theta1_rad: theta1,
                omega1_rads: 0.0,
                theta2_rad: theta1 + 1.0,
                omega2_rads: 0.0,
            };
            assert!(enforce_joint_limits(&mut released, &limits).wrist_release);
            assert!(released.relative_rad() <= limits.max_wrist_release_rad);
            assert!(limits.max_wrist_release_rad - released.relative_rad() < 1e-12);
        }
    }

    #[test]
    fn test_shoulder_clamped_both_ways() {
        let limits = JointLimits {
            max_shoulder_rad: 1.0,
            ..Default::default()
        };

        let mut state = LinkState {
            theta1_rad: 1.2,
            omega1_rads: 4.0,
            theta2_rad: 1.2,
            omega2_rads: 4.0,
        };
        let report = enforce_joint_limits(&mut state, &limits);
        assert!(report.shoulder);
        assert_eq!(state.theta1_rad, 1.0);
        assert_eq!(state.omega1_rads, 0.0);

        let mut state = LinkState {
            theta1_rad: -1.2,
            omega1_rads: -4.0,
            theta2_rad: -1.4,
            omega2_rads: -4.0,
        };
        let report = enforce_joint_limits(&mut state, &limits);
        assert!(report.shoulder);
        assert_eq!(state.theta1_rad, -1.0);
        assert_eq!(state.omega1_rads, 0.0);
    }
}
