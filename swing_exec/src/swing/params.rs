//! Parameters structure for the swing simulator

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::{JointLimits, SwingParamRanges};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the swing simulator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    // ---- TIMING ----
    /// Maximum simulated swing time.
    ///
    /// Units: seconds
    pub max_time_s: f64,

    // ---- POSTURE ----
    /// Proximal angle at the top of the backswing.
    ///
    /// Units: radians
    pub init_theta1_rad: f64,

    /// Angle the distal link trails the proximal link by at the top of the
    /// backswing.
    ///
    /// Units: radians
    pub init_wrist_cock_rad: f64,

    /// The swing ends once the proximal angle reaches this value.
    ///
    /// Units: radians
    pub stop_theta1_rad: f64,

    pub limits: JointLimits,

    // ---- BALL ----
    /// Horizontal offset of the ball from the proximal joint. The ball rests
    /// on the floor, one linkage reach below the joint.
    ///
    /// Units: meters
    pub ball_x_offset_m: f64,

    /// Units: meters
    pub ball_radius_m: f64,

    /// Extra distance beyond the ball radius at which the club head counts as
    /// touching the ball.
    ///
    /// Units: meters
    pub hit_allowance_m: f64,

    /// Depth the club head may go below the floor before it is a ground
    /// strike.
    ///
    /// Units: meters
    pub ground_tolerance_m: f64,

    /// Contacts where the head is descending more steeply than this are
    /// treated as ground strikes.
    ///
    /// Units: degrees
    pub max_descent_deg: f64,

    // ---- SEARCH SPACE ----
    pub ranges: SwingParamRanges,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            max_time_s: 1.0,
            init_theta1_rad: -2.0 * PI / 3.0,
            init_wrist_cock_rad: PI / 4.0,
            stop_theta1_rad: PI / 3.0,
            limits: JointLimits::default(),
            ball_x_offset_m: 0.05,
            ball_radius_m: 0.021,
            hit_allowance_m: 0.08,
            ground_tolerance_m: 0.03,
            max_descent_deg: 40.0,
            ranges: SwingParamRanges::default(),
        }
    }
}

impl Params {
    /// Distance from the ball centre at which contact is registered.
    ///
    /// Units: meters
    pub fn hit_radius_m(&self) -> f64 {
        self.ball_radius_m + self.hit_allowance_m
    }
}
